use anyhow::{anyhow, Result};
use std::path::PathBuf;

pub fn get_catlist_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    Ok(home.join(".catlist"))
}

pub fn get_config_path() -> Result<PathBuf> {
    let dir = get_catlist_dir()?;
    Ok(dir.join("config.toml"))
}

pub fn get_database_path() -> Result<PathBuf> {
    let dir = get_catlist_dir()?;
    Ok(dir.join("catlist.db"))
}

pub fn get_ui_cache_path() -> Result<PathBuf> {
    let dir = get_catlist_dir()?;
    Ok(dir.join("ui_cache.json"))
}

pub fn get_crash_log_path() -> Result<PathBuf> {
    let dir = get_catlist_dir()?;
    Ok(dir.join("crash.log"))
}

pub fn get_logs_dir() -> Result<PathBuf> {
    let dir = get_catlist_dir()?;
    Ok(dir.join("logs"))
}
