//! Quote note header model.
//!
//! # Responsibility
//! - Split note text into header YAML and body.
//! - Expose typed accessors for `quote`, `author`, `date_added` and ratings.
//! - Rewrite ratings while keeping every other header key and value.
//!
//! # Invariants
//! - A header exists only when the first line is `---` and a later line is
//!   `---`; everything after the closing line is body, untouched.
//! - Header keys keep their original order on rewrite; rating keys are
//!   always written last, exactly once each.

use crate::model::quote::{Rating, Ratings, RemoteQuote, RATING_KEYS};
use log::warn;
use serde_yaml::{Mapping, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Line delimiting the metadata header block.
pub const HEADER_DELIMITER: &str = "---";
/// Header key holding the quote text.
pub const KEY_QUOTE: &str = "quote";
/// Header key holding the author.
pub const KEY_AUTHOR: &str = "author";
/// Header key holding the `YYYY-MM-DD` creation date.
pub const KEY_DATE_ADDED: &str = "date_added";

/// Header parse/serialize errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// Content has no `---` delimited header block.
    MissingHeader,
    /// Header block is not valid YAML.
    Yaml(String),
    /// Header YAML is valid but not a key/value mapping.
    NotAMapping,
}

impl Display for HeaderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "note has no metadata header"),
            Self::Yaml(message) => write!(f, "note header is not valid YAML: {message}"),
            Self::NotAMapping => write!(f, "note header is not a key/value mapping"),
        }
    }
}

impl Error for HeaderError {}

/// Splits `content` into `(header_yaml, body)`.
///
/// Returns `None` when there is no complete header block. A leading BOM is
/// ignored and `\r\n` line endings are accepted for the delimiter lines.
pub fn split_header(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != HEADER_DELIMITER || !first.ends_with('\n') {
        return None;
    }

    let header_start = first.len();
    let mut offset = header_start;
    for line in lines {
        if line.trim_end() == HEADER_DELIMITER {
            let header = &content[header_start..offset];
            let body = &content[offset + line.len()..];
            return Some((header, body));
        }
        offset += line.len();
    }
    None
}

/// Structured view over one note header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteHeader {
    fields: Mapping,
}

impl QuoteHeader {
    /// Parses header YAML; an empty header yields an empty mapping.
    pub fn parse(yaml: &str) -> Result<Self, HeaderError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value =
            serde_yaml::from_str(yaml).map_err(|err| HeaderError::Yaml(err.to_string()))?;
        match value {
            Value::Mapping(fields) => Ok(Self { fields }),
            Value::Null => Ok(Self::default()),
            _ => Err(HeaderError::NotAMapping),
        }
    }

    /// Returns a scalar header value rendered as text.
    pub fn get_text(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(value) => Some(value.clone()),
            Value::Number(value) => Some(value.to_string()),
            Value::Bool(value) => Some(value.to_string()),
            _ => None,
        }
    }

    pub fn quote(&self) -> String {
        self.get_text(KEY_QUOTE).unwrap_or_default()
    }

    pub fn author(&self) -> String {
        self.get_text(KEY_AUTHOR).unwrap_or_default()
    }

    pub fn date_added(&self) -> Option<String> {
        self.get_text(KEY_DATE_ADDED)
    }

    /// Reads rating keys; empty or invalid values read as unset.
    pub fn ratings(&self) -> Ratings {
        let read = |key: &str| {
            self.fields
                .get(key)
                .and_then(Value::as_u64)
                .and_then(|value| u8::try_from(value).ok())
                .and_then(Rating::new)
        };
        let [inspiration, wisdom, style] = RATING_KEYS.map(read);
        Ratings {
            inspiration,
            wisdom,
            style,
        }
    }

    /// Replaces the three rating keys.
    ///
    /// All other keys keep value and order; rating keys are appended last.
    pub fn set_ratings(&mut self, ratings: &Ratings) {
        let mut fields = Mapping::new();
        for (key, value) in &self.fields {
            let is_rating = key
                .as_str()
                .is_some_and(|name| RATING_KEYS.contains(&name));
            if !is_rating {
                fields.insert(key.clone(), value.clone());
            }
        }
        for (key, rating) in ratings.entries() {
            let value = rating
                .map(|score| Value::Number(u64::from(score.value()).into()))
                .unwrap_or(Value::Null);
            fields.insert(Value::String(key.to_string()), value);
        }
        self.fields = fields;
    }

    #[cfg(test)]
    fn keys(&self) -> Vec<String> {
        self.fields
            .keys()
            .filter_map(|key| key.as_str().map(str::to_string))
            .collect()
    }

    /// Serializes the header mapping back to YAML (trailing newline included).
    pub fn to_yaml(&self) -> Result<String, HeaderError> {
        if self.fields.is_empty() {
            return Ok(String::new());
        }
        serde_yaml::to_string(&self.fields).map_err(|err| HeaderError::Yaml(err.to_string()))
    }
}

/// A parsed quote note: header plus untouched body.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteNote {
    pub header: QuoteHeader,
    pub body: String,
}

impl QuoteNote {
    /// Parses full note text. Missing header is an error.
    pub fn parse(content: &str) -> Result<Self, HeaderError> {
        let (yaml, body) = split_header(content).ok_or(HeaderError::MissingHeader)?;
        Ok(Self {
            header: QuoteHeader::parse(yaml)?,
            body: body.to_string(),
        })
    }

    /// Renders `---\n<yaml>---\n<body>`.
    pub fn render(&self) -> Result<String, HeaderError> {
        let yaml = self.header.to_yaml()?;
        Ok(format!(
            "{HEADER_DELIMITER}\n{yaml}{HEADER_DELIMITER}\n{}",
            self.body
        ))
    }
}

/// Quote text and author read from a note, for display purposes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteSummary {
    pub quote: String,
    pub author: String,
}

impl QuoteSummary {
    /// Extracts quote/author leniently.
    ///
    /// Missing or malformed headers degrade to empty strings.
    pub fn from_content(content: &str) -> Self {
        match QuoteNote::parse(content) {
            Ok(note) => Self {
                quote: note.header.quote(),
                author: note.header.author(),
            },
            Err(err) => {
                warn!("event=header_parse module=note status=degraded error={err}");
                Self::default()
            }
        }
    }

    /// Renders the quote as a markdown block quote with attribution.
    pub fn block_quote(&self) -> String {
        let quoted = self
            .quote
            .lines()
            .map(|line| format!("> {line}"))
            .collect::<Vec<_>>();
        let quoted = if quoted.is_empty() {
            "> ".to_string()
        } else {
            quoted.join("\n")
        };
        format!("{quoted}\n>\n> — {}", self.author)
    }
}

/// Renders the full text of a freshly fetched quote note.
///
/// Quote and author are written as JSON strings, which YAML reads as
/// double-quoted scalars.
pub fn render_new_note(quote: &RemoteQuote, date: &str) -> String {
    let mut lines = vec![
        HEADER_DELIMITER.to_string(),
        format!("{KEY_QUOTE}: {}", double_quoted(&quote.text)),
        format!("{KEY_AUTHOR}: {}", double_quoted(&quote.author)),
        format!("{KEY_DATE_ADDED}: {date}"),
    ];
    lines.extend(RATING_KEYS.iter().map(|key| format!("{key}:")));
    lines.push(HEADER_DELIMITER.to_string());
    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}

fn double_quoted(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}
