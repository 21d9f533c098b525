//! Core domain logic for the quote of the day plugin.
//! This crate is the single source of truth for quote note invariants.

pub mod clock;
pub mod embed;
pub mod fetch;
pub mod host;
pub mod logging;
pub mod model;
pub mod note;
pub mod plugin;
pub mod presentation;
pub mod service;
pub mod settings;
pub mod vault;

pub use clock::{format_date, Clock, FixedClock, SystemClock};
pub use embed::{copy_snippet, expand_qotd_blocks, EmbedBlock, QOTD_SNIPPET};
pub use fetch::{
    FetchError, HttpResponse, QuoteTransport, ReqwestTransport, TransportError, TransportErrorKind,
};
pub use host::{ActiveEditor, Clipboard};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::quote::{Rating, RatingInput, RatingInputError, Ratings, RemoteQuote};
pub use note::header::{QuoteHeader, QuoteNote, QuoteSummary};
pub use plugin::commands::{parse_command, QuoteCommand};
pub use plugin::manifest::{PluginManifest, STATUS_BAR_TEXT};
pub use presentation::UserMessage;
pub use service::quote_service::{
    BrowseEntry, FetchIfAbsent, QuoteService, QuoteServiceError, RatingForm, SavedQuote,
};
pub use service::{open_vault_service, VaultQuoteService};
pub use settings::{JsonFileSettingsStore, Settings, SettingsError, SettingsStore};
pub use vault::{DocumentStore, FsVault, StoreError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
