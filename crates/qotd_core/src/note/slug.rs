//! Slug and file name derivation for new quote notes.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum slug length in characters.
pub const MAX_SLUG_CHARS: usize = 30;
/// Extension used for every quote note.
pub const NOTE_EXTENSION: &str = ".md";

static NON_SLUG_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// Derives a lowercase, hyphen-separated slug from quote text.
///
/// Rules:
/// - lowercase, then collapse every run outside `[a-z0-9]` to one `-`
/// - trim leading/trailing `-`
/// - keep the first 30 chars, then trim a trailing `-` left by truncation
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let hyphenated = NON_SLUG_RUN_RE.replace_all(&lowered, "-");
    let truncated = hyphenated
        .trim_matches('-')
        .chars()
        .take(MAX_SLUG_CHARS)
        .collect::<String>();
    truncated.trim_end_matches('-').to_string()
}

/// Builds `<date>-<id>-<slug>.md`.
///
/// Path separators inside the external id are replaced so the id can never
/// introduce extra folders.
pub fn quote_file_name(date: &str, id: &str, slug: &str) -> String {
    let safe_id = id.replace(['/', '\\'], "-");
    format!("{date}-{safe_id}-{slug}{NOTE_EXTENSION}")
}
