//! Plugin settings and their key-value persistence.
//!
//! # Responsibility
//! - Hold the quotes folder and API URL used by every use-case.
//! - Merge persisted values over built-in defaults on load.
//!
//! # Invariants
//! - Missing or non-string persisted keys fall back to defaults.
//! - `quotes_folder` never carries leading/trailing slashes or whitespace.
//! - Save writes the settings object verbatim (camelCase JSON keys).

use log::{info, warn};
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Default vault-relative folder for quote notes.
pub const DEFAULT_QUOTES_FOLDER: &str = "05_references/Quotes";
/// Default random-quote endpoint.
pub const DEFAULT_API_URL: &str = "https://thequoteshub.com/api/random";
/// Hidden per-vault directory holding host state (settings, logs).
pub const STATE_DIR_NAME: &str = ".qotd";
/// Settings file name inside `STATE_DIR_NAME`.
pub const SETTINGS_FILE_NAME: &str = "data.json";

const KEY_QUOTES_FOLDER: &str = "quotesFolder";
const KEY_API_URL: &str = "apiUrl";

/// Settings persistence errors.
#[derive(Debug)]
pub enum SettingsError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Malformed {
        path: PathBuf,
        message: String,
    },
    Serialize(String),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "settings i/o failed at `{}`: {source}", path.display())
            }
            Self::Malformed { path, message } => write!(
                f,
                "settings file `{}` is not valid JSON: {message}",
                path.display()
            ),
            Self::Serialize(message) => write!(f, "failed to serialize settings: {message}"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Host key-value persistence for the settings object.
pub trait SettingsStore {
    /// Returns `None` when nothing has been saved yet.
    fn load_data(&self) -> Result<Option<Value>, SettingsError>;
    fn save_data(&self, data: &Value) -> Result<(), SettingsError>;
}

/// Settings persisted as one JSON document on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<vault>/.qotd/data.json`.
    pub fn for_vault(vault_root: impl AsRef<Path>) -> Self {
        Self::new(
            vault_root
                .as_ref()
                .join(STATE_DIR_NAME)
                .join(SETTINGS_FILE_NAME),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonFileSettingsStore {
    fn load_data(&self) -> Result<Option<Value>, SettingsError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| SettingsError::Malformed {
                path: self.path.clone(),
                message: err.to_string(),
            })
    }

    fn save_data(&self, data: &Value) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let raw = serde_json::to_string_pretty(data)
            .map_err(|err| SettingsError::Serialize(err.to_string()))?;
        fs::write(&self.path, raw).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Quote plugin settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Vault-relative folder, no leading/trailing slashes.
    pub quotes_folder: String,
    /// Remote quote endpoint.
    pub api_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quotes_folder: DEFAULT_QUOTES_FOLDER.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Settings {
    /// Merges a persisted object over defaults.
    pub fn from_stored(data: Option<&Value>) -> Self {
        let mut settings = Self::default();
        let Some(data) = data else {
            return settings;
        };
        let Some(object) = data.as_object() else {
            warn!("event=settings_load module=settings status=degraded reason=not_an_object");
            return settings;
        };
        if let Some(folder) = object.get(KEY_QUOTES_FOLDER).and_then(Value::as_str) {
            settings.set_quotes_folder(folder);
        }
        if let Some(api_url) = object.get(KEY_API_URL).and_then(Value::as_str) {
            settings.set_api_url(api_url);
        }
        settings
    }

    pub fn load(store: &impl SettingsStore) -> Result<Self, SettingsError> {
        let data = store.load_data()?;
        let settings = Self::from_stored(data.as_ref());
        info!(
            "event=settings_load module=settings status=ok stored={} quotes_folder={}",
            data.is_some(),
            settings.quotes_folder
        );
        Ok(settings)
    }

    pub fn save(&self, store: &impl SettingsStore) -> Result<(), SettingsError> {
        let data =
            serde_json::to_value(self).map_err(|err| SettingsError::Serialize(err.to_string()))?;
        store.save_data(&data)?;
        info!("event=settings_save module=settings status=ok");
        Ok(())
    }

    pub fn set_quotes_folder(&mut self, value: &str) {
        self.quotes_folder = normalize_folder(value);
    }

    pub fn set_api_url(&mut self, value: &str) {
        self.api_url = value.trim().to_string();
    }
}

/// Trims whitespace and leading/trailing slashes from a folder path.
pub fn normalize_folder(value: &str) -> String {
    value.trim().trim_matches('/').to_string()
}
