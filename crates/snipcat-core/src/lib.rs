pub mod codec;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod models;
pub mod reconcile;
pub mod storage;
pub mod template;

// Re-export common items for convenience
pub use codec::{decode, encode};
pub use config::get_config_dir;
pub use error::{Result, SnipcatError};
pub use fingerprint::fingerprint;
pub use models::{Catalog, Department, Member, Role, Snippet, SnippetFolder, SnippetKind};
pub use reconcile::{can_read_master, can_write_master, reconcile, syncable_departments};
pub use storage::{load_catalog, save_catalog};
pub use template::{expand, ExpandContext};
