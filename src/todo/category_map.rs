use super::change::Change;
use super::error::{TodoError, TodoResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Addresses an existing item by category and position within that category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditTarget {
    pub category: String,
    pub position: usize,
}

impl EditTarget {
    pub fn new(category: impl Into<String>, position: usize) -> Self {
        Self {
            category: category.into(),
            position,
        }
    }
}

/// Rejects empty item text. Whitespace is kept as typed.
pub fn validate_text(text: &str) -> TodoResult<()> {
    if text.is_empty() {
        return Err(TodoError::EmptyText);
    }
    Ok(())
}

/// Category names are stored trimmed so "Shop" and "Shop " are one category.
fn normalize_category(category: &str) -> TodoResult<&str> {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        return Err(TodoError::EmptyCategory);
    }
    Ok(trimmed)
}

/// Category name -> ordered item texts, with categories kept in first-use order.
///
/// `categories` and the keys of `items` are always the same set and no category
/// is ever left with an empty sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMap {
    categories: Vec<String>,
    items: HashMap<String, Vec<String>>,
}

impl CategoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from ordered sections, repairing anything that would break
    /// the invariant: repeated names are merged into their first occurrence
    /// (after trimming), empty sections and empty texts are dropped.
    pub fn from_sections<I>(sections: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut map = Self::new();
        for (category, texts) in sections {
            let texts: Vec<String> = texts.into_iter().filter(|t| validate_text(t).is_ok()).collect();
            let Ok(category) = normalize_category(&category) else {
                continue;
            };
            if texts.is_empty() {
                continue;
            }
            match map.items.get_mut(category) {
                Some(existing) => existing.extend(texts),
                None => {
                    map.categories.push(category.to_string());
                    map.items.insert(category.to_string(), texts);
                }
            }
        }
        map
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn items(&self, category: &str) -> Option<&[String]> {
        self.items.get(category).map(Vec::as_slice)
    }

    pub fn get(&self, target: &EditTarget) -> Option<&str> {
        self.items
            .get(&target.category)
            .and_then(|texts| texts.get(target.position))
            .map(String::as_str)
    }

    pub fn section_index(&self, category: &str) -> Option<usize> {
        self.categories.iter().position(|c| c == category)
    }

    /// Sections in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories.iter().map(|category| {
            let texts = self.items.get(category).map(Vec::as_slice).unwrap_or(&[]);
            (category.as_str(), texts)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.items.values().map(Vec::len).sum()
    }

    /// True when the order list and the mapping agree and nothing is empty.
    pub fn is_consistent(&self) -> bool {
        let ordered: HashSet<&String> = self.categories.iter().collect();
        ordered.len() == self.categories.len()
            && ordered.len() == self.items.len()
            && self.items.keys().all(|k| ordered.contains(k))
            && self.items.values().all(|texts| !texts.is_empty())
    }

    /// Append `text` to `category`, creating the category at the end if needed.
    pub fn add(&mut self, category: &str, text: &str) -> TodoResult<Vec<Change>> {
        validate_text(text)?;
        let category = normalize_category(category)?;

        let mut changes = Vec::with_capacity(2);
        let section = match self.section_index(category) {
            Some(section) => section,
            None => {
                self.categories.push(category.to_string());
                self.items.insert(category.to_string(), Vec::new());
                let section = self.categories.len() - 1;
                changes.push(Change::InsertSection {
                    section,
                    title: category.to_string(),
                });
                section
            }
        };

        let texts = self.items.entry(category.to_string()).or_default();
        texts.push(text.to_string());
        changes.push(Change::InsertRow {
            section,
            row: texts.len() - 1,
            text: text.to_string(),
        });

        trace!(category, section, "added item");
        Ok(changes)
    }

    /// Replace in place when the category is unchanged, otherwise move the
    /// item to the end of `new_category`.
    pub fn edit(
        &mut self,
        target: &EditTarget,
        new_text: &str,
        new_category: &str,
    ) -> TodoResult<Vec<Change>> {
        validate_text(new_text)?;
        let new_category = normalize_category(new_category)?;
        if self.get(target).is_none() {
            return Err(TodoError::stale(&target.category, target.position));
        }

        if target.category == new_category {
            let section = self
                .section_index(new_category)
                .ok_or_else(|| TodoError::stale(&target.category, target.position))?;
            if let Some(slot) = self
                .items
                .get_mut(new_category)
                .and_then(|texts| texts.get_mut(target.position))
            {
                *slot = new_text.to_string();
            }
            return Ok(vec![Change::ReloadRow {
                section,
                row: target.position,
                text: new_text.to_string(),
            }]);
        }

        let (_, mut changes) = self.remove(&target.category, target.position)?;
        changes.extend(self.add(new_category, new_text)?);
        Ok(changes)
    }

    /// Remove and return the item at `position`, pruning the category when it
    /// becomes empty.
    pub fn remove(&mut self, category: &str, position: usize) -> TodoResult<(String, Vec<Change>)> {
        let section = self
            .section_index(category)
            .ok_or_else(|| TodoError::stale(category, position))?;
        let texts = self
            .items
            .get_mut(category)
            .filter(|texts| position < texts.len())
            .ok_or_else(|| TodoError::stale(category, position))?;

        let removed = texts.remove(position);
        let mut changes = vec![Change::DeleteRow {
            section,
            row: position,
        }];

        if texts.is_empty() {
            self.items.remove(category);
            self.categories.remove(section);
            changes.push(Change::DeleteSection { section });
            trace!(category, section, "pruned empty category");
        }

        Ok((removed, changes))
    }
}
