use super::category_map::CategoryMap;
use super::change::Change;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("change does not fit the current layout: {0:?}")]
    OutOfRange(Change),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub rows: Vec<String>,
}

/// Grouped section/row view of a category map, as a list widget draws it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListLayout {
    sections: Vec<Section>,
}

impl ListLayout {
    pub fn from_map(map: &CategoryMap) -> Self {
        let sections = map
            .iter()
            .map(|(title, rows)| Section {
                title: title.to_string(),
                rows: rows.to_vec(),
            })
            .collect();
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.sections.iter().map(|s| s.rows.len()).sum()
    }

    /// Replay a batch of changes in order. Stops at the first change that
    /// does not fit; the layout is then only partially updated and should be
    /// rebuilt from the map.
    pub fn apply(&mut self, changes: &[Change]) -> Result<(), LayoutError> {
        for change in changes {
            self.apply_one(change)
                .ok_or_else(|| LayoutError::OutOfRange(change.clone()))?;
        }
        Ok(())
    }

    fn apply_one(&mut self, change: &Change) -> Option<()> {
        match change {
            Change::InsertSection { section, title } => {
                if *section > self.sections.len() {
                    return None;
                }
                self.sections.insert(
                    *section,
                    Section {
                        title: title.clone(),
                        rows: Vec::new(),
                    },
                );
            }
            Change::DeleteSection { section } => {
                if *section >= self.sections.len() {
                    return None;
                }
                self.sections.remove(*section);
            }
            Change::InsertRow { section, row, text } => {
                let rows = &mut self.sections.get_mut(*section)?.rows;
                if *row > rows.len() {
                    return None;
                }
                rows.insert(*row, text.clone());
            }
            Change::DeleteRow { section, row } => {
                let rows = &mut self.sections.get_mut(*section)?.rows;
                if *row >= rows.len() {
                    return None;
                }
                rows.remove(*row);
            }
            Change::ReloadRow { section, row, text } => {
                let slot = self.sections.get_mut(*section)?.rows.get_mut(*row)?;
                *slot = text.clone();
            }
        }
        Some(())
    }

    /// (section, row) of the n-th item counting across sections.
    pub fn item_at(&self, index: usize) -> Option<(usize, usize)> {
        let mut remaining = index;
        for (section_idx, section) in self.sections.iter().enumerate() {
            if remaining < section.rows.len() {
                return Some((section_idx, remaining));
            }
            remaining -= section.rows.len();
        }
        None
    }

    /// Inverse of [`ListLayout::item_at`].
    pub fn index_of(&self, section: usize, row: usize) -> Option<usize> {
        let target = self.sections.get(section)?;
        if row >= target.rows.len() {
            return None;
        }
        let before: usize = self.sections[..section].iter().map(|s| s.rows.len()).sum();
        Some(before + row)
    }

    /// Line index of an item when every section is drawn with a header line.
    pub fn display_line(&self, section: usize, row: usize) -> Option<usize> {
        self.index_of(section, row).map(|index| index + section + 1)
    }

    pub fn title(&self, section: usize) -> Option<&str> {
        self.sections.get(section).map(|s| s.title.as_str())
    }

    pub fn text(&self, section: usize, row: usize) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|s| s.rows.get(row))
            .map(String::as_str)
    }
}
