use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{Result, SnipcatError};

/// Origin of a snippet: distributed with a department master document, or
/// authored locally by the user.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SnippetKind {
    Master,
    Personal,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Snippet {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Name of the folder that owns this snippet.
    pub folder: String,
    pub kind: SnippetKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display position within the folder. Ties keep original sequence.
    pub order: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Snippet {
    /// Create a locally-authored snippet. The id is random rather than
    /// content-derived: a user may keep two personal snippets with
    /// identical text.
    pub fn new_personal(
        folder: &str,
        title: String,
        content: String,
        description: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: format!("snippet_{}", Uuid::new_v4().simple()),
            title,
            content,
            folder: folder.to_string(),
            kind: SnippetKind::Personal,
            description,
            order: 0,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SnippetFolder {
    pub id: String,
    pub name: String,
    pub snippets: Vec<Snippet>,
    pub order: usize,
}

impl SnippetFolder {
    pub fn new_personal(name: &str, order: usize) -> Self {
        Self {
            id: format!("folder_{}", Uuid::new_v4().simple()),
            name: name.to_string(),
            snippets: Vec::new(),
            order,
        }
    }

    /// A folder is personal when every snippet in it is personal. An empty
    /// folder counts as personal: it can only have been created locally.
    pub fn is_personal(&self) -> bool {
        self.snippets.iter().all(|s| s.kind == SnippetKind::Personal)
    }

    /// Restamp every snippet with the given kind and this folder's name.
    pub fn stamp(&mut self, kind: SnippetKind) {
        for snippet in &mut self.snippets {
            snippet.kind = kind;
            snippet.folder = self.name.clone();
        }
    }

    pub(crate) fn renumber(&mut self) {
        for (position, snippet) in self.snippets.iter_mut().enumerate() {
            snippet.order = position;
        }
    }
}

/// The full ordered folder sequence held by a client. Created empty at
/// first run, then grown by master syncs, personal edits and imports.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub folders: Vec<SnippetFolder>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_snippet(&self, id: &str) -> Option<&Snippet> {
        self.folders
            .iter()
            .flat_map(|f| f.snippets.iter())
            .find(|s| s.id == id)
    }

    /// Create a personal snippet, creating its personal folder on first
    /// use. Returns the id of the new snippet.
    pub fn add_personal(
        &mut self,
        folder_name: &str,
        title: String,
        content: String,
        description: Option<String>,
    ) -> String {
        let name = folder_name.trim().to_string();
        let folder = self.personal_folder_mut(&name);
        let mut snippet = Snippet::new_personal(&name, title, content, description);
        snippet.order = folder.snippets.len();
        let id = snippet.id.clone();
        folder.snippets.push(snippet);
        id
    }

    /// Update a personal snippet in place. Master snippets are read-only
    /// through this path.
    pub fn update_personal(
        &mut self,
        id: &str,
        title: Option<String>,
        content: Option<String>,
        description: Option<String>,
    ) -> Result<()> {
        let snippet = self
            .folders
            .iter_mut()
            .flat_map(|f| f.snippets.iter_mut())
            .find(|s| s.id == id)
            .ok_or_else(|| SnipcatError::SnippetNotFound(id.to_string()))?;

        if snippet.kind == SnippetKind::Master {
            return Err(SnipcatError::MasterReadOnly(id.to_string()));
        }

        if let Some(title) = title {
            snippet.title = title;
        }
        if let Some(content) = content {
            snippet.content = content;
        }
        if let Some(description) = description {
            snippet.description = if description.is_empty() {
                None
            } else {
                Some(description)
            };
        }
        snippet.updated_at = Some(Utc::now());
        Ok(())
    }

    /// Remove a personal snippet. The folder stays, even when it ends up
    /// empty.
    pub fn remove_personal(&mut self, id: &str) -> Result<()> {
        for folder in &mut self.folders {
            if let Some(position) = folder.snippets.iter().position(|s| s.id == id) {
                if folder.snippets[position].kind == SnippetKind::Master {
                    return Err(SnipcatError::MasterReadOnly(id.to_string()));
                }
                folder.snippets.remove(position);
                folder.renumber();
                return Ok(());
            }
        }
        Err(SnipcatError::SnippetNotFound(id.to_string()))
    }

    /// Merge a decoded personal export into the catalog. Folders merge
    /// into existing personal folders by trimmed name; snippets whose id
    /// is already present are skipped, so re-importing the same export
    /// does not duplicate. Returns the number of snippets imported.
    pub fn import_personal(&mut self, folders: Vec<SnippetFolder>) -> usize {
        let mut imported = 0;
        for mut incoming in folders {
            incoming.name = incoming.name.trim().to_string();
            incoming.stamp(SnippetKind::Personal);

            match self
                .folders
                .iter()
                .position(|f| f.name == incoming.name && f.is_personal())
            {
                Some(found) => {
                    let target = &mut self.folders[found];
                    for mut snippet in incoming.snippets {
                        if target.snippets.iter().any(|s| s.id == snippet.id) {
                            continue;
                        }
                        snippet.folder = target.name.clone();
                        snippet.order = target.snippets.len();
                        target.snippets.push(snippet);
                        imported += 1;
                    }
                }
                None => {
                    incoming.order = self.folders.len();
                    incoming.renumber();
                    imported += incoming.snippets.len();
                    self.folders.push(incoming);
                }
            }
        }
        imported
    }

    fn personal_folder_mut(&mut self, name: &str) -> &mut SnippetFolder {
        match self
            .folders
            .iter()
            .position(|f| f.name == name && f.is_personal())
        {
            Some(found) => &mut self.folders[found],
            None => {
                let order = self.folders.len();
                self.folders.push(SnippetFolder::new_personal(name, order));
                let last = self.folders.len() - 1;
                &mut self.folders[last]
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    General,
    Admin,
    SuperAdmin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::General => write!(f, "general"),
            Role::Admin => write!(f, "admin"),
            Role::SuperAdmin => write!(f, "superAdmin"),
        }
    }
}

/// Directory record for the acting user. Supplied by the caller and
/// consulted for access decisions only, never persisted by the core.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub departments: Vec<String>,
    pub role: Role,
}

impl Member {
    pub fn belongs_to(&self, department: &str) -> bool {
        self.departments.iter().any(|d| d == department)
    }
}

/// Locator for a department's master XML document. What `xml_file_id`
/// points at is up to the shell that does the fetching.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Department {
    pub name: String,
    pub xml_file_id: String,
}
