//! Terminal implementations of the host surfaces.

use base64::Engine;
use qotd_core::{ActiveEditor, Clipboard, DocumentStore};
use std::io::Write;

/// Clipboard reached through the OSC 52 terminal escape sequence.
pub struct TerminalClipboard<W: Write> {
    out: W,
}

impl<W: Write> TerminalClipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Clipboard for TerminalClipboard<W> {
    fn write_text(&mut self, text: &str) -> Result<(), String> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(text);
        write!(self.out, "\x1b]52;c;{encoded}\x07")
            .and_then(|()| self.out.flush())
            .map_err(|err| err.to_string())
    }
}

/// Editor whose "selection" is the end of an existing vault note.
pub struct NoteEditor<'a, S: DocumentStore> {
    store: &'a S,
    path: String,
}

impl<'a, S: DocumentStore> NoteEditor<'a, S> {
    pub fn new(store: &'a S, path: impl Into<String>) -> Self {
        Self {
            store,
            path: path.into(),
        }
    }
}

impl<S: DocumentStore> ActiveEditor for NoteEditor<'_, S> {
    fn replace_selection(&mut self, text: &str) -> Result<(), String> {
        let mut content = self.store.read(&self.path).map_err(|err| err.to_string())?;
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(text);
        self.store
            .modify(&self.path, &content)
            .map_err(|err| err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteEditor, TerminalClipboard};
    use qotd_core::{ActiveEditor, Clipboard, DocumentStore, FsVault};

    #[test]
    fn clipboard_emits_osc52_sequence() {
        let mut clipboard = TerminalClipboard::new(Vec::new());
        clipboard.write_text("hi").expect("write to buffer");
        let written = String::from_utf8(clipboard.into_inner()).expect("utf-8 output");
        assert_eq!(written, "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn note_editor_appends_on_a_new_line() {
        let dir = tempfile::tempdir().expect("create temp vault");
        let vault = FsVault::new(dir.path());
        vault.create("Daily.md", "# Today").expect("seed note");

        let mut editor = NoteEditor::new(&vault, "Daily.md");
        editor.replace_selection("> quote\n").expect("append");
        assert_eq!(
            vault.read("Daily.md").expect("read note"),
            "# Today\n> quote\n"
        );
    }

    #[test]
    fn note_editor_reports_missing_note() {
        let dir = tempfile::tempdir().expect("create temp vault");
        let vault = FsVault::new(dir.path());
        let mut editor = NoteEditor::new(&vault, "Missing.md");
        assert!(editor.replace_selection("text").is_err());
    }
}
