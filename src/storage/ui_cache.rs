use crate::todo::EditTarget;
use crate::utils::paths::get_ui_cache_path;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

/// Small piece of UI state restored on the next launch.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiCache {
    /// Item the cursor was on when the app closed
    pub selected: Option<EditTarget>,
}

impl UiCache {
    pub fn load() -> Result<Self> {
        let path = get_ui_cache_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let cache: UiCache = serde_json::from_str(&content)?;
        Ok(cache)
    }

    pub fn save(&self) -> Result<()> {
        let path = get_ui_cache_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cache() {
        let cache = UiCache::default();
        assert!(cache.selected.is_none());
    }

    #[test]
    fn test_serialize_deserialize() {
        let cache = UiCache {
            selected: Some(EditTarget::new("Shop", 2)),
        };

        let json = serde_json::to_string(&cache).unwrap();
        let loaded: UiCache = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded, cache);
    }

    #[test]
    fn test_serialize_none() {
        let json = serde_json::to_string(&UiCache::default()).unwrap();
        let loaded: UiCache = serde_json::from_str(&json).unwrap();
        assert!(loaded.selected.is_none());
    }
}
