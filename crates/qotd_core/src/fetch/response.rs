//! Quote API response validation.

use crate::model::quote::RemoteQuote;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Response body validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteResponseError {
    InvalidJson { raw: String },
    UnexpectedShape { pretty: String },
}

impl Display for QuoteResponseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson { .. } => write!(f, "response body is not valid json"),
            Self::UnexpectedShape { .. } => {
                write!(f, "response json lacks text/author/id fields")
            }
        }
    }
}

impl Error for QuoteResponseError {}

/// Parses and validates one quote API body.
///
/// Required shape: `text` string, `author` string, and an identifier given
/// as `id` (number) or `_id` (string). A numeric `id` wins when both exist.
pub fn parse_quote_response(body: &str) -> Result<RemoteQuote, QuoteResponseError> {
    let value: Value =
        serde_json::from_str(body).map_err(|_| QuoteResponseError::InvalidJson {
            raw: body.to_string(),
        })?;

    let text = value.get("text").and_then(Value::as_str);
    let author = value.get("author").and_then(Value::as_str);
    let id = match (value.get("id"), value.get("_id")) {
        (Some(Value::Number(id)), _) => Some(id.to_string()),
        (_, Some(Value::String(id))) => Some(id.clone()),
        _ => None,
    };

    match (text, author, id) {
        (Some(text), Some(author), Some(id)) => Ok(RemoteQuote::new(text, author, id)),
        _ => Err(QuoteResponseError::UnexpectedShape {
            pretty: serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_quote_response, QuoteResponseError};

    #[test]
    fn accepts_numeric_id() {
        let quote = parse_quote_response(r#"{"id": 42, "text": " Hi ", "author": "Ann"}"#)
            .expect("valid body");
        assert_eq!(quote.id, "42");
        assert_eq!(quote.text, "Hi");
    }

    #[test]
    fn accepts_string_underscore_id() {
        let quote =
            parse_quote_response(r#"{"_id": "abc123", "text": "Hi", "author": "Ann", "tags": []}"#)
                .expect("valid body");
        assert_eq!(quote.id, "abc123");
    }

    #[test]
    fn rejects_string_id_without_underscore_id() {
        let err = parse_quote_response(r#"{"id": "42", "text": "Hi", "author": "Ann"}"#)
            .expect_err("string id is not accepted");
        match err {
            QuoteResponseError::UnexpectedShape { pretty } => {
                assert!(pretty.contains("\n  \"id\": \"42\""));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_json_with_raw_text() {
        let err = parse_quote_response("<html>down</html>").expect_err("not json");
        assert_eq!(
            err,
            QuoteResponseError::InvalidJson {
                raw: "<html>down</html>".to_string()
            }
        );
    }

    #[test]
    fn rejects_non_object_json() {
        assert!(matches!(
            parse_quote_response("[1, 2]"),
            Err(QuoteResponseError::UnexpectedShape { .. })
        ));
    }
}
