use thiserror::Error;

use crate::models::Role;

#[derive(Debug, Error)]
pub enum SnipcatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog not found at: {0}")]
    CatalogNotFound(String),

    #[error("missing configuration file: {0}")]
    ConfigMissing(String),

    #[error("snippet not found: {0}")]
    SnippetNotFound(String),

    #[error("master snippets are read-only: {0}")]
    MasterReadOnly(String),

    #[error("{role} member is not authorized for department '{department}'")]
    Unauthorized { department: String, role: Role },
}

pub type Result<T> = std::result::Result<T, SnipcatError>;
