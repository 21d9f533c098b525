//! Remote quote record and rating values.
//!
//! # Responsibility
//! - Carry the quote fields accepted from the remote API.
//! - Parse and validate the three 1..=5 rating scores.
//! - Treat a blank score as unset.
//!
//! # Invariants
//! - `RemoteQuote` fields are trimmed at construction.
//! - `Rating` can only be constructed inside `MIN_RATING..=MAX_RATING`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lowest accepted rating score.
pub const MIN_RATING: u8 = 1;
/// Highest accepted rating score.
pub const MAX_RATING: u8 = 5;

/// Header key for the inspiration score.
pub const RATING_KEY_INSPIRATION: &str = "inspiration";
/// Header key for the wisdom score.
pub const RATING_KEY_WISDOM: &str = "wisdom";
/// Header key for the style score.
pub const RATING_KEY_STYLE: &str = "style";

/// Rating keys in the order they are written to the note header.
pub const RATING_KEYS: [&str; 3] = [RATING_KEY_INSPIRATION, RATING_KEY_WISDOM, RATING_KEY_STYLE];

/// Quote accepted from the remote API after shape validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteQuote {
    /// Quote body text.
    pub text: String,
    /// Attributed author.
    pub author: String,
    /// External identifier rendered as text (`id` number or `_id` string).
    pub id: String,
}

impl RemoteQuote {
    /// Creates a quote record with trimmed fields.
    pub fn new(
        text: impl Into<String>,
        author: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into().trim().to_string(),
            author: author.into().trim().to_string(),
            id: id.into().trim().to_string(),
        }
    }
}

/// One validated rating score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Returns a rating when `value` is within `1..=5`.
    pub fn new(value: u8) -> Option<Self> {
        if (MIN_RATING..=MAX_RATING).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Parses user-entered text for the rating named `field`; blank text is `None`.
    pub fn parse(field: &'static str, input: &str) -> Result<Option<Self>, RatingInputError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let value: i64 = trimmed
            .parse()
            .map_err(|_| RatingInputError::NotANumber {
                field,
                value: trimmed.to_string(),
            })?;
        u8::try_from(value)
            .ok()
            .and_then(Self::new)
            .map(Some)
            .ok_or(RatingInputError::OutOfRange { field, value })
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("rating {value} is outside 1..=5"))
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three rating scores stored on a quote note.
///
/// `None` means the score has not been set yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratings {
    pub inspiration: Option<Rating>,
    pub wisdom: Option<Rating>,
    pub style: Option<Rating>,
}

impl Ratings {
    /// Returns `(key, score)` pairs in header order.
    pub fn entries(&self) -> [(&'static str, Option<Rating>); 3] {
        [
            (RATING_KEY_INSPIRATION, self.inspiration),
            (RATING_KEY_WISDOM, self.wisdom),
            (RATING_KEY_STYLE, self.style),
        ]
    }

    pub fn is_complete(&self) -> bool {
        self.inspiration.is_some() && self.wisdom.is_some() && self.style.is_some()
    }
}

/// Raw rating text as typed by the user in a rating form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingInput {
    pub inspiration: String,
    pub wisdom: String,
    pub style: String,
}

impl RatingInput {
    pub fn new(
        inspiration: impl Into<String>,
        wisdom: impl Into<String>,
        style: impl Into<String>,
    ) -> Self {
        Self {
            inspiration: inspiration.into(),
            wisdom: wisdom.into(),
            style: style.into(),
        }
    }

    /// Validates all three fields; the first invalid field is reported.
    ///
    /// Blank fields come back unset.
    pub fn parse(&self) -> Result<Ratings, RatingInputError> {
        Ok(Ratings {
            inspiration: Rating::parse(RATING_KEY_INSPIRATION, &self.inspiration)?,
            wisdom: Rating::parse(RATING_KEY_WISDOM, &self.wisdom)?,
            style: Rating::parse(RATING_KEY_STYLE, &self.style)?,
        })
    }
}

/// Rating form input errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatingInputError {
    NotANumber { field: &'static str, value: String },
    OutOfRange { field: &'static str, value: i64 },
}

impl Display for RatingInputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotANumber { field, value } => {
                write!(f, "{field} rating is not a number: `{value}`")
            }
            Self::OutOfRange { field, value } => write!(
                f,
                "{field} rating {value} is outside {MIN_RATING}..={MAX_RATING}"
            ),
        }
    }
}

impl Error for RatingInputError {}
