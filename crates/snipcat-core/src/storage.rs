//! Catalog persistence: pretty-printed JSON, load-modify-save.

use std::fs;
use std::path::Path;

use crate::config::{ensure_config_dir, get_catalog_file_path, CATALOG_FILENAME};
use crate::error::{Result, SnipcatError};
use crate::models::Catalog;

/// Load the catalog from the default location.
pub fn load_catalog() -> Result<Catalog> {
    load_catalog_from(&get_catalog_file_path())
}

/// Load a catalog from an explicit path. A missing file is an error; an
/// empty file is an empty catalog.
pub fn load_catalog_from(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        return Err(SnipcatError::CatalogNotFound(
            path.to_string_lossy().to_string(),
        ));
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Catalog::new());
    }

    serde_json::from_str(&content).map_err(|e| e.into())
}

/// Load the catalog, falling back to an empty one on first run.
pub fn load_or_default() -> Result<Catalog> {
    match load_catalog() {
        Ok(catalog) => Ok(catalog),
        Err(SnipcatError::CatalogNotFound(_)) => Ok(Catalog::new()),
        Err(e) => Err(e),
    }
}

/// Save the catalog to the default location.
pub fn save_catalog(catalog: &Catalog) -> Result<()> {
    let config_dir = ensure_config_dir()?;
    save_catalog_to(&config_dir.join(CATALOG_FILENAME), catalog)
}

/// Save a catalog to an explicit path.
pub fn save_catalog_to(path: &Path, catalog: &Catalog) -> Result<()> {
    let serialized = serde_json::to_string_pretty(catalog)?;
    fs::write(path, serialized)?;
    Ok(())
}

/// Add a personal snippet and persist the catalog. Returns the new id.
pub fn add_personal_snippet(
    folder: &str,
    title: String,
    content: String,
    description: Option<String>,
) -> Result<String> {
    let mut catalog = load_or_default()?;
    let id = catalog.add_personal(folder, title, content, description);
    save_catalog(&catalog)?;
    Ok(id)
}

/// Update a personal snippet in place and persist the catalog.
pub fn update_personal_snippet(
    id: &str,
    title: Option<String>,
    content: Option<String>,
    description: Option<String>,
) -> Result<()> {
    let mut catalog = load_catalog()?;
    catalog.update_personal(id, title, content, description)?;
    save_catalog(&catalog)
}

/// Delete a personal snippet and persist the catalog.
pub fn delete_personal_snippet(id: &str) -> Result<()> {
    let mut catalog = load_catalog()?;
    catalog.remove_personal(id)?;
    save_catalog(&catalog)
}
