//! Case-insensitive search over a [`CategoryMap`].
//!
//! Filtering never touches the live map. The filtered view remembers where
//! each visible item lives in the live map so edits issued from search results
//! land on the right item.

use super::category_map::{CategoryMap, EditTarget};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView {
    query: String,
    map: CategoryMap,
    origins: HashMap<String, Vec<usize>>,
}

impl FilteredView {
    pub fn query(&self) -> &str {
        &self.query
    }

    /// An empty query means filtering is off.
    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn map(&self) -> &CategoryMap {
        &self.map
    }

    pub fn into_map(self) -> CategoryMap {
        self.map
    }

    /// Translate a position in the filtered view into the live map.
    pub fn origin(&self, category: &str, position: usize) -> Option<EditTarget> {
        self.origins
            .get(category)
            .and_then(|positions| positions.get(position))
            .map(|&live| EditTarget::new(category, live))
    }
}

/// Items whose text contains `query`, ignoring case. Categories without a
/// match are left out; order follows the live map.
pub fn filter(map: &CategoryMap, query: &str) -> CategoryMap {
    filter_view(map, query).into_map()
}

pub fn filter_view(map: &CategoryMap, query: &str) -> FilteredView {
    let needle = query.to_lowercase();
    let mut sections = Vec::new();
    let mut origins = HashMap::new();

    for (category, texts) in map.iter() {
        let (positions, matches): (Vec<usize>, Vec<String>) = texts
            .iter()
            .enumerate()
            .filter(|(_, text)| text.to_lowercase().contains(&needle))
            .map(|(position, text)| (position, text.clone()))
            .unzip();

        if matches.is_empty() {
            continue;
        }
        origins.insert(category.to_string(), positions);
        sections.push((category.to_string(), matches));
    }

    FilteredView {
        query: query.to_string(),
        map: CategoryMap::from_sections(sections),
        origins,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> CategoryMap {
        let mut map = CategoryMap::new();
        map.add("General", "Buy milk").unwrap();
        map.add("Shop", "Oat MILK").unwrap();
        map.add("General", "Call mom").unwrap();
        map.add("Health", "Run 5k").unwrap();
        map.add("General", "milkshake").unwrap();
        map
    }

    #[test]
    fn test_empty_query_is_identity() {
        let map = sample();
        assert_eq!(filter(&map, ""), map);
        assert!(!filter_view(&map, "").is_active());
    }

    #[test]
    fn test_view_keeps_query_as_typed() {
        let view = filter_view(&sample(), "MiLk");
        assert!(view.is_active());
        assert_eq!(view.query(), "MiLk");
    }

    #[test]
    fn test_matches_case_insensitively() {
        let filtered = filter(&sample(), "Milk");
        assert_eq!(
            filtered.categories(),
            &["General".to_string(), "Shop".to_string()]
        );
        assert_eq!(
            filtered.items("General").unwrap(),
            &["Buy milk".to_string(), "milkshake".to_string()]
        );
        assert_eq!(filtered.items("Shop").unwrap(), &["Oat MILK".to_string()]);
        assert!(filtered.items("Health").is_none());
    }

    #[test]
    fn test_no_match_yields_empty_map() {
        let filtered = filter(&sample(), "zebra");
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_origin_points_into_live_map() {
        let map = sample();
        let view = filter_view(&map, "milk");

        let target = view.origin("General", 1).unwrap();
        assert_eq!(target, EditTarget::new("General", 2));
        assert_eq!(map.get(&target), Some("milkshake"));
        assert!(view.origin("General", 2).is_none());
        assert!(view.origin("Health", 0).is_none());
    }

    #[test]
    fn test_filter_does_not_mutate_source() {
        let map = sample();
        let before = map.clone();
        let _ = filter(&map, "call");
        assert_eq!(map, before);
    }
}
