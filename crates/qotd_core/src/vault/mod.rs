//! Document store abstractions for the note vault.
//!
//! # Responsibility
//! - Define the vault-relative file operations quote use-cases need.
//! - Provide folder assurance on top of the primitive operations.
//!
//! # Invariants
//! - Paths are vault-relative and `/` separated.
//! - `create` never overwrites an existing document.
//! - `ensure_folder` is idempotent and creates missing segments root to leaf.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::SystemTime;

mod fs_vault;

pub use fs_vault::FsVault;

pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors.
#[derive(Debug)]
pub enum StoreError {
    /// Path is absolute or escapes the vault root.
    InvalidPath(String),
    /// Document does not exist.
    NotFound(String),
    /// Document or folder already exists at the target path.
    AlreadyExists(String),
    /// A path segment exists but is not a folder.
    NotAFolder(String),
    /// Underlying I/O failure.
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPath(path) => write!(f, "invalid vault path: `{path}`"),
            Self::NotFound(path) => write!(f, "document not found: {path}"),
            Self::AlreadyExists(path) => write!(f, "file already exists: {path}"),
            Self::NotAFolder(path) => write!(f, "path exists but is not a folder: {path}"),
            Self::Io { path, source } => write!(f, "vault i/o failed at `{path}`: {source}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Vault document operations used by quote use-cases.
pub trait DocumentStore {
    /// Returns `Ok(false)` when nothing exists at `path`.
    fn folder_exists(&self, path: &str) -> StoreResult<bool>;
    fn create_folder(&self, path: &str) -> StoreResult<()>;
    /// Lists every file in the vault as sorted vault-relative paths.
    fn list_files(&self) -> StoreResult<Vec<String>>;
    fn read(&self, path: &str) -> StoreResult<String>;
    fn create(&self, path: &str, content: &str) -> StoreResult<()>;
    fn modify(&self, path: &str, content: &str) -> StoreResult<()>;
    /// Creation time of a document; stores without one report last modification.
    fn created_at(&self, path: &str) -> StoreResult<SystemTime>;

    /// Ensures every segment of `path` exists as a folder.
    fn ensure_folder(&self, path: &str) -> StoreResult<()> {
        let mut current = String::new();
        for segment in path.split('/').filter(|s| !s.trim().is_empty()) {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(segment);
            if !self.folder_exists(&current)? {
                self.create_folder(&current)?;
            }
        }
        Ok(())
    }
}

/// Joins a vault folder and a file name; an empty folder means vault root.
pub fn join_vault_path(folder: &str, name: &str) -> String {
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{folder}/{name}")
    }
}

/// Returns the last `/` separated segment of a vault path.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::{file_name, join_vault_path};

    #[test]
    fn joins_root_and_nested_folders() {
        assert_eq!(join_vault_path("", "a.md"), "a.md");
        assert_eq!(join_vault_path("Quotes/2024", "a.md"), "Quotes/2024/a.md");
    }

    #[test]
    fn file_name_returns_last_segment() {
        assert_eq!(file_name("Quotes/2024-01-05-1-x.md"), "2024-01-05-1-x.md");
        assert_eq!(file_name("root.md"), "root.md");
    }
}
