//! Host surfaces the core hands text to.
//!
//! Implemented by each host (terminal, embedding UI); failures are reported
//! as plain messages.

/// Editor holding the user's current selection.
pub trait ActiveEditor {
    /// Replaces the current selection (or inserts at the cursor).
    fn replace_selection(&mut self, text: &str) -> Result<(), String>;
}

/// System clipboard.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), String>;
}
