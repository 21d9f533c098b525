//! Command palette declarations.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// User-invocable quote commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QuoteCommand {
    /// Fetch only when today's note is missing.
    FetchIfAbsent,
    /// Always fetch a new quote.
    FetchAlternative,
    Rate,
    Insert,
    CopySnippet,
    Browse,
}

/// Command id for fetch-if-absent.
pub const COMMAND_FETCH: &str = "fetch-quote-of-the-day";
/// Command id for forced fetch.
pub const COMMAND_FETCH_ALTERNATIVE: &str = "fetch-alternative-quote";
/// Command id for rating today's quote.
pub const COMMAND_RATE: &str = "rate-quote-of-the-day";
/// Command id for inserting today's quote into the active note.
pub const COMMAND_INSERT: &str = "insert-quote-of-the-day";
/// Command id for copying the embed snippet.
pub const COMMAND_COPY_SNIPPET: &str = "copy-qotd-snippet";
/// Command id for browsing saved quotes.
pub const COMMAND_BROWSE: &str = "browse-saved-quotes";

const ALL_COMMANDS: [QuoteCommand; 6] = [
    QuoteCommand::FetchIfAbsent,
    QuoteCommand::FetchAlternative,
    QuoteCommand::Rate,
    QuoteCommand::Insert,
    QuoteCommand::CopySnippet,
    QuoteCommand::Browse,
];

impl QuoteCommand {
    /// Every command in palette order.
    pub fn all() -> &'static [QuoteCommand] {
        &ALL_COMMANDS
    }

    /// Stable command id.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FetchIfAbsent => COMMAND_FETCH,
            Self::FetchAlternative => COMMAND_FETCH_ALTERNATIVE,
            Self::Rate => COMMAND_RATE,
            Self::Insert => COMMAND_INSERT,
            Self::CopySnippet => COMMAND_COPY_SNIPPET,
            Self::Browse => COMMAND_BROWSE,
        }
    }

    /// Palette display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::FetchIfAbsent => "Fetch / Refresh Quote of the Day",
            Self::FetchAlternative => "Fetch Alternative Quote of the Day",
            Self::Rate => "Rate Current Quote",
            Self::Insert => "Insert Quote of the Day",
            Self::CopySnippet => "Copy QotD Snippet",
            Self::Browse => "Browse Saved Quotes",
        }
    }
}

impl Display for QuoteCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses one command id.
pub fn parse_command(value: &str) -> Result<QuoteCommand, CommandParseError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(CommandParseError::EmptyCommand);
    }
    QuoteCommand::all()
        .iter()
        .copied()
        .find(|command| command.as_str() == normalized)
        .ok_or_else(|| CommandParseError::UnknownCommand(normalized.to_string()))
}

/// Command id parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    EmptyCommand,
    UnknownCommand(String),
}

impl Display for CommandParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCommand => write!(f, "command id must not be empty"),
            Self::UnknownCommand(value) => write!(f, "unknown command: {value}"),
        }
    }
}

impl Error for CommandParseError {}
