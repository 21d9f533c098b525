//! Plugin manifest: the UI surfaces the quote plugin declares to a host.

use crate::embed::CODE_BLOCK_LANGUAGE;
use crate::plugin::commands::{parse_command, QuoteCommand};
use log::error;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable plugin identifier.
pub const PLUGIN_ID: &str = "quote-of-the-day";
/// Status bar label shown while the plugin is loaded.
pub const STATUS_BAR_TEXT: &str = "QOTD ready";

/// One command palette entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDeclaration {
    pub id: String,
    pub name: String,
}

impl From<QuoteCommand> for CommandDeclaration {
    fn from(value: QuoteCommand) -> Self {
        Self {
            id: value.as_str().to_string(),
            name: value.name().to_string(),
        }
    }
}

/// Ribbon button bound to one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RibbonAction {
    pub icon: String,
    pub tooltip: String,
    pub command_id: String,
}

/// Declarative plugin manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginManifest {
    /// Stable plugin identifier, e.g. `quote-of-the-day`.
    pub id: String,
    /// Semantic version string (`major.minor.patch`).
    pub version: String,
    pub commands: Vec<CommandDeclaration>,
    pub ribbon: Option<RibbonAction>,
    pub status_bar_text: Option<String>,
    /// Fenced code block language handled by the plugin renderer.
    pub code_block_language: Option<String>,
}

impl PluginManifest {
    /// Manifest for the built-in quote plugin.
    pub fn builtin() -> Self {
        Self {
            id: PLUGIN_ID.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            commands: QuoteCommand::all()
                .iter()
                .copied()
                .map(CommandDeclaration::from)
                .collect(),
            ribbon: Some(RibbonAction {
                icon: "star".to_string(),
                tooltip: "Fetch Alternative Quote".to_string(),
                command_id: QuoteCommand::FetchAlternative.as_str().to_string(),
            }),
            status_bar_text: Some(STATUS_BAR_TEXT.to_string()),
            code_block_language: Some(CODE_BLOCK_LANGUAGE.to_string()),
        }
    }

    /// Built-in manifest, validated before a host registers anything from it.
    pub fn checked_builtin() -> Result<Self, ManifestValidationError> {
        let manifest = Self::builtin();
        manifest.validate().map_err(|err| {
            error!("event=manifest_validate module=plugin status=error error={err}");
            err
        })?;
        Ok(manifest)
    }

    /// Validates declaration-level manifest invariants.
    pub fn validate(&self) -> Result<(), ManifestValidationError> {
        if self.id.trim().is_empty() {
            return Err(ManifestValidationError::EmptyId);
        }
        if !is_valid_identifier(self.id.trim()) {
            return Err(ManifestValidationError::InvalidId(self.id.clone()));
        }
        if !is_semver_triplet(self.version.trim()) {
            return Err(ManifestValidationError::InvalidVersion(
                self.version.clone(),
            ));
        }
        if self.commands.is_empty() {
            return Err(ManifestValidationError::MissingCommands);
        }

        let mut declared = BTreeSet::<&str>::new();
        for command in &self.commands {
            let id = command.id.trim();
            parse_command(id)
                .map_err(|_| ManifestValidationError::UnsupportedCommand(id.to_string()))?;
            if command.name.trim().is_empty() {
                return Err(ManifestValidationError::EmptyCommandName(id.to_string()));
            }
            if !declared.insert(id) {
                return Err(ManifestValidationError::DuplicateCommand(id.to_string()));
            }
        }

        if let Some(ribbon) = &self.ribbon {
            if !declared.contains(ribbon.command_id.trim()) {
                return Err(ManifestValidationError::UndeclaredRibbonCommand(
                    ribbon.command_id.clone(),
                ));
            }
        }
        if let Some(language) = &self.code_block_language {
            if !is_valid_identifier(language) {
                return Err(ManifestValidationError::InvalidCodeBlockLanguage(
                    language.clone(),
                ));
            }
        }
        Ok(())
    }

    pub fn command(&self, id: &str) -> Option<&CommandDeclaration> {
        self.commands.iter().find(|command| command.id == id.trim())
    }
}

static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]+(?:[-_.][a-z0-9]+)*$").expect("valid identifier regex")
});

static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("valid version regex"));

fn is_valid_identifier(value: &str) -> bool {
    IDENTIFIER_RE.is_match(value)
}

fn is_semver_triplet(value: &str) -> bool {
    VERSION_RE.is_match(value)
}

/// Manifest validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestValidationError {
    EmptyId,
    InvalidId(String),
    InvalidVersion(String),
    MissingCommands,
    UnsupportedCommand(String),
    EmptyCommandName(String),
    DuplicateCommand(String),
    UndeclaredRibbonCommand(String),
    InvalidCodeBlockLanguage(String),
}

impl Display for ManifestValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "manifest id must not be empty"),
            Self::InvalidId(value) => write!(f, "manifest id is invalid: {value}"),
            Self::InvalidVersion(value) => write!(
                f,
                "manifest version is invalid: {value} (expected major.minor.patch)"
            ),
            Self::MissingCommands => write!(f, "manifest commands must not be empty"),
            Self::UnsupportedCommand(value) => {
                write!(f, "manifest command is unsupported: {value}")
            }
            Self::EmptyCommandName(value) => write!(f, "manifest command has no name: {value}"),
            Self::DuplicateCommand(value) => write!(f, "manifest command is duplicated: {value}"),
            Self::UndeclaredRibbonCommand(value) => {
                write!(f, "ribbon targets an undeclared command: {value}")
            }
            Self::InvalidCodeBlockLanguage(value) => {
                write!(f, "code block language is invalid: {value}")
            }
        }
    }
}

impl Error for ManifestValidationError {}
