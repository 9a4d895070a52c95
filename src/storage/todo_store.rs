//! Typed persistence for the active items and the completed log.
//!
//! Both structures are stored as JSON under fixed keys and always written
//! whole. Reading never fails: a missing or unreadable value loads as empty.

use super::error::StorageError;
use super::kv::KeyValueStore;
use crate::todo::{CategoryMap, CompletedLog};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const TODO_ITEMS_KEY: &str = "todoItems";
pub const COMPLETED_ITEMS_KEY: &str = "completedItems";

/// On-disk shape of the active items. Category order is kept in its own
/// field because object key order is not something JSON guarantees.
#[derive(Debug, Serialize, Deserialize)]
struct StoredItems {
    categories: Vec<String>,
    items: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredItemsFormat {
    Ordered(StoredItems),
    /// Bare `{category: [items]}` mapping without explicit order.
    Unordered(BTreeMap<String, Vec<String>>),
}

impl From<&CategoryMap> for StoredItems {
    fn from(map: &CategoryMap) -> Self {
        Self {
            categories: map.categories().to_vec(),
            items: map
                .iter()
                .map(|(category, texts)| (category.to_string(), texts.to_vec()))
                .collect(),
        }
    }
}

impl StoredItemsFormat {
    fn into_map(self) -> CategoryMap {
        match self {
            StoredItemsFormat::Ordered(StoredItems {
                categories,
                mut items,
            }) => {
                let mut sections: Vec<(String, Vec<String>)> = categories
                    .into_iter()
                    .filter_map(|category| {
                        let texts = items.remove(&category)?;
                        Some((category, texts))
                    })
                    .collect();
                if !items.is_empty() {
                    warn!(
                        orphaned = items.len(),
                        "stored items list categories missing from the order, appending them"
                    );
                    sections.extend(items);
                }
                CategoryMap::from_sections(sections)
            }
            StoredItemsFormat::Unordered(items) => CategoryMap::from_sections(items),
        }
    }
}

/// Persistence facade over any [`KeyValueStore`].
pub struct TodoStore<S> {
    kv: S,
}

impl<S: KeyValueStore> TodoStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn backend(&self) -> &S {
        &self.kv
    }

    pub fn load_items(&self) -> CategoryMap {
        let map = self
            .read::<StoredItemsFormat>(TODO_ITEMS_KEY)
            .map(StoredItemsFormat::into_map)
            .unwrap_or_default();
        debug!(
            categories = map.categories().len(),
            items = map.item_count(),
            "loaded active items"
        );
        map
    }

    pub fn save_items(&self, map: &CategoryMap) -> Result<(), StorageError> {
        let encoded = encode_items(map)?;
        self.kv.set(TODO_ITEMS_KEY, &encoded)
    }

    pub fn load_completed(&self) -> CompletedLog {
        self.read::<CompletedLog>(COMPLETED_ITEMS_KEY)
            .unwrap_or_default()
    }

    /// Persist a completion: the grown log and the shrunk map land together
    /// or not at all.
    pub fn save_completion(&self, map: &CategoryMap, log: &CompletedLog) -> Result<(), StorageError> {
        let entries = [
            (COMPLETED_ITEMS_KEY, encode_completed(log)?),
            (TODO_ITEMS_KEY, encode_items(map)?),
        ];
        self.kv.set_many(&entries)
    }

    fn read<T: DeserializeOwned>(&self, key: &'static str) -> Option<T> {
        let raw = match self.kv.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "could not read stored value, starting empty");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "stored value is unreadable, starting empty");
                None
            }
        }
    }
}

fn encode_items(map: &CategoryMap) -> Result<String, StorageError> {
    serde_json::to_string(&StoredItems::from(map)).map_err(|source| StorageError::Encode {
        key: TODO_ITEMS_KEY,
        source,
    })
}

fn encode_completed(log: &CompletedLog) -> Result<String, StorageError> {
    serde_json::to_string(log).map_err(|source| StorageError::Encode {
        key: COMPLETED_ITEMS_KEY,
        source,
    })
}
