//! Embeddable `qotd` code block.
//!
//! # Responsibility
//! - Provide the snippet users paste into notes.
//! - Expand `qotd` fenced blocks into the rendered quote of the day.
//!
//! # Invariants
//! - Only fences tagged exactly `qotd` are expanded; other fences are left
//!   untouched.

use crate::host::Clipboard;
use log::{error, info};
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

/// Fenced block language tag handled by the renderer.
pub const CODE_BLOCK_LANGUAGE: &str = "qotd";
/// Snippet copied to the clipboard.
pub const QOTD_SNIPPET: &str = "```qotd\n```";
/// Rendered text when no note exists for today.
pub const EMBED_UNAVAILABLE_TEXT: &str = "No Quote of the Day available. Fetch one first.";

static QOTD_FENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?ms)^```qotd[ \t]*\r?\n.*?^```[ \t]*$").expect("valid qotd fence regex")
});

/// Result of rendering one `qotd` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedBlock {
    /// Markdown block quote plus the note it was read from.
    Quote { markdown: String, source_path: String },
    /// No note for today.
    Unavailable,
}

impl EmbedBlock {
    /// Markdown shown in place of the fenced block.
    pub fn markdown(&self) -> &str {
        match self {
            Self::Quote { markdown, .. } => markdown,
            Self::Unavailable => EMBED_UNAVAILABLE_TEXT,
        }
    }
}

/// Replaces every `qotd` fenced block in `markdown` with `rendered`.
pub fn expand_qotd_blocks(markdown: &str, rendered: &str) -> String {
    QOTD_FENCE_RE
        .replace_all(markdown, NoExpand(rendered))
        .into_owned()
}

/// Copies the embed snippet through the host clipboard.
pub fn copy_snippet(clipboard: &mut dyn Clipboard) -> Result<(), String> {
    match clipboard.write_text(QOTD_SNIPPET) {
        Ok(()) => {
            info!("event=snippet_copy module=embed status=ok");
            Ok(())
        }
        Err(err) => {
            error!("event=snippet_copy module=embed status=error error={err}");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{copy_snippet, expand_qotd_blocks, EmbedBlock, QOTD_SNIPPET};
    use crate::host::Clipboard;

    struct RecordingClipboard {
        text: Option<String>,
        fail: bool,
    }

    impl Clipboard for RecordingClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), String> {
            if self.fail {
                return Err("clipboard locked".to_string());
            }
            self.text = Some(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn expands_only_qotd_fences() {
        let doc = "# Daily\n\n```qotd\n```\n\n```rust\nfn main() {}\n```\n\n```qotd\nignored\n```\n";
        let expanded = expand_qotd_blocks(doc, "> $1 costs\n>\n> — Ann");
        assert_eq!(
            expanded,
            "# Daily\n\n> $1 costs\n>\n> — Ann\n\n```rust\nfn main() {}\n```\n\n> $1 costs\n>\n> — Ann\n"
        );
    }

    #[test]
    fn snippet_expands_to_rendered_text() {
        let block = EmbedBlock::Unavailable;
        assert_eq!(expand_qotd_blocks(QOTD_SNIPPET, block.markdown()), block.markdown());
    }

    #[test]
    fn copy_snippet_reports_clipboard_failure() {
        let mut ok = RecordingClipboard {
            text: None,
            fail: false,
        };
        copy_snippet(&mut ok).expect("copy succeeds");
        assert_eq!(ok.text.as_deref(), Some(QOTD_SNIPPET));

        let mut failing = RecordingClipboard {
            text: None,
            fail: true,
        };
        assert!(copy_snippet(&mut failing).is_err());
    }
}
