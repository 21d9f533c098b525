//! Filesystem-backed document store.

use super::{DocumentStore, StoreError, StoreResult};
use log::{debug, info, warn};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};
use std::time::SystemTime;
use walkdir::{DirEntry, WalkDir};

/// Vault rooted at one directory on disk.
///
/// Hidden entries (names starting with `.`) are skipped by `list_files`, so
/// host state such as `.qotd/` never shows up as notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a vault-relative path to an absolute location under `root`.
    pub fn resolve(&self, path: &str) -> StoreResult<PathBuf> {
        let relative = Path::new(path);
        if path.trim().is_empty() || relative.is_absolute() || path.contains('\\') {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        let escapes = relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_)));
        if escapes {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

fn io_error(path: &str, source: std::io::Error) -> StoreError {
    match source.kind() {
        ErrorKind::NotFound => StoreError::NotFound(path.to_string()),
        ErrorKind::AlreadyExists => StoreError::AlreadyExists(path.to_string()),
        _ => StoreError::Io {
            path: path.to_string(),
            source,
        },
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

impl DocumentStore for FsVault {
    fn folder_exists(&self, path: &str) -> StoreResult<bool> {
        let absolute = self.resolve(path)?;
        match fs::metadata(&absolute) {
            Ok(metadata) if metadata.is_dir() => Ok(true),
            Ok(_) => Err(StoreError::NotAFolder(path.to_string())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(io_error(path, err)),
        }
    }

    fn create_folder(&self, path: &str) -> StoreResult<()> {
        let absolute = self.resolve(path)?;
        fs::create_dir(&absolute).map_err(|err| io_error(path, err))?;
        info!("event=folder_create module=vault status=ok path={path}");
        Ok(())
    }

    fn list_files(&self) -> StoreResult<Vec<String>> {
        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !is_hidden(entry));
        for entry in walker {
            let entry = entry.map_err(|err| StoreError::Io {
                path: self.root.display().to_string(),
                source: err.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let Some(relative) = relative.to_str() else {
                warn!(
                    "event=vault_list module=vault status=skipped reason=non_utf8 path={}",
                    entry.path().display()
                );
                continue;
            };
            files.push(relative.replace(MAIN_SEPARATOR, "/"));
        }
        files.sort();
        debug!(
            "event=vault_list module=vault status=ok file_count={}",
            files.len()
        );
        Ok(files)
    }

    fn read(&self, path: &str) -> StoreResult<String> {
        let absolute = self.resolve(path)?;
        fs::read_to_string(&absolute).map_err(|err| io_error(path, err))
    }

    fn create(&self, path: &str, content: &str) -> StoreResult<()> {
        let absolute = self.resolve(path)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&absolute)
            .map_err(|err| io_error(path, err))?;
        file.write_all(content.as_bytes())
            .map_err(|err| io_error(path, err))?;
        info!(
            "event=note_create module=vault status=ok path={path} bytes={}",
            content.len()
        );
        Ok(())
    }

    fn modify(&self, path: &str, content: &str) -> StoreResult<()> {
        let absolute = self.resolve(path)?;
        if !absolute.is_file() {
            return Err(StoreError::NotFound(path.to_string()));
        }
        fs::write(&absolute, content).map_err(|err| io_error(path, err))?;
        info!(
            "event=note_modify module=vault status=ok path={path} bytes={}",
            content.len()
        );
        Ok(())
    }

    fn created_at(&self, path: &str) -> StoreResult<SystemTime> {
        let absolute = self.resolve(path)?;
        let metadata = fs::metadata(&absolute).map_err(|err| io_error(path, err))?;
        metadata
            .created()
            .or_else(|_| metadata.modified())
            .map_err(|err| io_error(path, err))
    }
}

#[cfg(test)]
mod tests {
    use super::FsVault;
    use crate::vault::{DocumentStore, StoreError};

    #[test]
    fn resolve_rejects_paths_outside_the_vault() {
        let vault = FsVault::new("/tmp/vault");
        for path in ["/etc/passwd", "../x.md", "a/../../b", "a\\b", "", "./a"] {
            assert!(
                matches!(vault.resolve(path), Err(StoreError::InvalidPath(_))),
                "path should be rejected: {path}"
            );
        }
        assert!(vault.resolve("Quotes/a.md").is_ok());
    }

    #[test]
    fn ensure_folder_creates_nested_segments_idempotently() {
        let dir = tempfile::tempdir().expect("tempdir");
        let vault = FsVault::new(dir.path());
        vault
            .ensure_folder("05_references//Quotes/")
            .expect("first ensure");
        vault.ensure_folder("05_references/Quotes").expect("second ensure");
        vault.ensure_folder("").expect("empty path is a no-op");
        assert!(dir.path().join("05_references/Quotes").is_dir());
    }

    #[test]
    fn ensure_folder_fails_when_segment_is_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let vault = FsVault::new(dir.path());
        vault.create("Quotes", "not a folder").expect("create file");
        let err = vault
            .ensure_folder("Quotes/2024")
            .expect_err("file segment must fail");
        assert!(matches!(err, StoreError::NotAFolder(_)));
    }

    #[test]
    fn create_never_overwrites_and_modify_requires_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let vault = FsVault::new(dir.path());
        vault.create("a.md", "one").expect("create");
        let err = vault.create("a.md", "two").expect_err("second create fails");
        assert!(matches!(err, StoreError::AlreadyExists(_)));
        assert_eq!(vault.read("a.md").expect("read"), "one");

        let err = vault.modify("b.md", "x").expect_err("missing file");
        assert!(matches!(err, StoreError::NotFound(_)));
        vault.modify("a.md", "three").expect("modify");
        assert_eq!(vault.read("a.md").expect("read"), "three");
    }

    #[test]
    fn list_files_skips_hidden_entries_and_sorts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let vault = FsVault::new(dir.path());
        vault.ensure_folder("Quotes").expect("folder");
        vault.ensure_folder(".qotd").expect("hidden folder");
        vault.create("Quotes/b.md", "").expect("b");
        vault.create("Quotes/a.md", "").expect("a");
        vault.create(".qotd/data.json", "{}").expect("hidden");
        vault.create("root.md", "").expect("root");

        let files = vault.list_files().expect("list");
        assert_eq!(files, vec!["Quotes/a.md", "Quotes/b.md", "root.md"]);
    }

    #[cfg(unix)]
    #[test]
    fn list_files_skips_entries_with_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let vault = FsVault::new(dir.path());
        let bad_folder = dir.path().join(OsStr::from_bytes(b"Quotes\xff"));
        if std::fs::create_dir(&bad_folder).is_err() {
            // Filesystem refuses non-UTF-8 names; nothing to list.
            return;
        }
        std::fs::write(bad_folder.join("a.md"), "x").expect("write nested note");
        vault.create("a.md", "y").expect("root note");

        let files = vault.list_files().expect("list");
        assert_eq!(files, vec!["a.md"]);
    }

    #[test]
    fn created_at_reports_missing_documents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let vault = FsVault::new(dir.path());
        vault.create("a.md", "one").expect("create");
        assert!(vault.created_at("a.md").is_ok());
        assert!(matches!(
            vault.created_at("b.md"),
            Err(StoreError::NotFound(_))
        ));
    }
}
