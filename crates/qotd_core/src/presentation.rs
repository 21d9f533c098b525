//! User-facing wording for use-case results.
//!
//! Hosts render `UserMessage::Notice` as a transient notification and
//! `UserMessage::Dialog` as a modal with a preformatted body.

use crate::fetch::{FetchError, TransportErrorKind};
use crate::plugin::commands::QuoteCommand;
use crate::service::quote_service::{FetchIfAbsent, QuoteServiceError, SavedQuote};

/// Footer shown under dialog bodies.
pub const DIALOG_COPY_HINT: &str = "You can copy this information for reporting.";
/// Notice when today's note already exists.
pub const QUOTE_ALREADY_EXISTS: &str =
    "Quote for today already exists. Use 'Fetch Alternative Quote' to get a different one.";
pub const RATINGS_SAVED: &str = "Quote ratings saved!";
pub const SNIPPET_COPIED: &str = "Copied QotD snippet to clipboard.";
pub const BROWSE_EMPTY: &str = "No saved quotes found.";
pub const BROWSE_HINT: &str = "Click a quote to open its file.";

/// One message for the host to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserMessage {
    Notice(String),
    Dialog { title: String, body: String },
}

impl UserMessage {
    pub fn notice(text: impl Into<String>) -> Self {
        Self::Notice(text.into())
    }

    pub fn dialog(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Dialog {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Notices for a newly created quote note.
pub fn fetch_success_messages(saved: &SavedQuote) -> Vec<UserMessage> {
    vec![
        UserMessage::notice(format!("✅ Created new quote: {}", saved.file_name)),
        UserMessage::notice(format!(
            "Today's Quote:\n\"{}\" — {}",
            saved.quote.text, saved.quote.author
        )),
    ]
}

/// Message for a failed fetch.
pub fn fetch_failure_message(err: &FetchError) -> UserMessage {
    match err {
        FetchError::Transport(transport) if transport.kind == TransportErrorKind::Network => {
            UserMessage::notice("❌ Network error while fetching quote. Are you offline?")
        }
        FetchError::Status(code) => UserMessage::notice(format!(
            "❌ Quote API returned status {code}. Check your API URL in Settings."
        )),
        FetchError::InvalidJson { raw } => {
            UserMessage::dialog("Failed to parse JSON from Quote API", raw.clone())
        }
        FetchError::UnexpectedShape { pretty } => {
            UserMessage::dialog("Quote API returned unexpected JSON", pretty.clone())
        }
        other => UserMessage::notice(format!("❌ Error fetching quote: {other}")),
    }
}

/// Messages for the fetch-if-absent command.
///
/// `silent_when_present` suppresses the "already exists" notice, as on
/// startup.
pub fn fetch_if_absent_messages(
    result: &Result<FetchIfAbsent, FetchError>,
    silent_when_present: bool,
) -> Vec<UserMessage> {
    match result {
        Ok(FetchIfAbsent::Created(saved)) => fetch_success_messages(saved),
        Ok(FetchIfAbsent::AlreadyPresent(_)) if silent_when_present => Vec::new(),
        Ok(FetchIfAbsent::AlreadyPresent(_)) => vec![UserMessage::notice(QUOTE_ALREADY_EXISTS)],
        Err(err) => vec![fetch_failure_message(err)],
    }
}

/// Message for a failed non-fetch command.
pub fn service_failure_message(command: QuoteCommand, err: &QuoteServiceError) -> UserMessage {
    match (command, err) {
        (QuoteCommand::Rate, QuoteServiceError::NoQuoteToday) => {
            UserMessage::notice("No quote file found for today. Please fetch it first.")
        }
        (_, QuoteServiceError::NoQuoteToday) => {
            UserMessage::notice("No quote for today exists. Please fetch it first.")
        }
        (_, QuoteServiceError::MissingHeader(_)) => {
            UserMessage::notice("Unexpected file format (no frontmatter).")
        }
        (_, QuoteServiceError::InvalidRating(input)) => {
            UserMessage::notice(format!("Ratings not saved: {input}."))
        }
        (_, QuoteServiceError::NoActiveEditor) => {
            UserMessage::notice("No active editor to insert into.")
        }
        (_, other) => UserMessage::notice(format!("❌ {}: {other}", command.name())),
    }
}

/// Message for a failed clipboard write.
pub fn clipboard_failure_message() -> UserMessage {
    UserMessage::notice("Failed to copy snippet. Try again.")
}
