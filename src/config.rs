use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::todo::{CategoryMap, DEFAULT_CATEGORIES, DEFAULT_CATEGORY};
use crate::utils::paths::get_config_path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Categories offered by the picker, in picker order
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    /// Category preselected when adding an item
    #[serde(default = "default_category")]
    pub default_category: String,
}

fn default_theme() -> String {
    "default".to_string()
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            categories: default_categories(),
            default_category: default_category(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&content)?;

        Ok(config)
    }

    /// Picker entries: configured categories first, then any category that
    /// only exists in the stored items.
    pub fn picker_categories(&self, map: &CategoryMap) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        let configured = self.categories.iter();
        for category in configured.chain(map.categories()) {
            let category = category.trim();
            if !category.is_empty() && !categories.iter().any(|c| c == category) {
                categories.push(category.to_string());
            }
        }
        if categories.is_empty() {
            categories.push(default_category());
        }
        categories
    }

    /// The configured default, falling back when it is blank.
    pub fn default_category(&self) -> &str {
        let trimmed = self.default_category.trim();
        if trimmed.is_empty() { DEFAULT_CATEGORY } else { trimmed }
    }
}
