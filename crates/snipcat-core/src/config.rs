use crate::error::Result;
use std::env;
use std::fs;
use std::path::PathBuf;

pub const CATALOG_FILENAME: &str = "catalog.json";
pub const PROFILE_FILENAME: &str = "profile.json";
pub const DEPARTMENTS_FILENAME: &str = "departments.json";

/// Get the snipcat configuration directory
pub fn get_config_dir() -> PathBuf {
    env::var("HOME")
        .map(|home| PathBuf::from(home).join(".snipcat"))
        .unwrap_or_else(|_| PathBuf::from(".snipcat"))
}

/// Ensure the configuration directory exists
pub fn ensure_config_dir() -> Result<PathBuf> {
    let config_dir = get_config_dir();
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }
    Ok(config_dir)
}

/// Get the path to the persisted catalog
pub fn get_catalog_file_path() -> PathBuf {
    get_config_dir().join(CATALOG_FILENAME)
}

/// Get the path to the member profile supplied by the directory lookup
pub fn get_profile_file_path() -> PathBuf {
    get_config_dir().join(PROFILE_FILENAME)
}

/// Get the path to the department locator map
pub fn get_departments_file_path() -> PathBuf {
    get_config_dir().join(DEPARTMENTS_FILENAME)
}
