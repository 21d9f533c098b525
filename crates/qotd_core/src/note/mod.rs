//! Quote note text format.
//!
//! # Responsibility
//! - Parse and serialize the `---` delimited metadata header of quote notes.
//! - Derive file-system safe names for new quote notes.
//!
//! # Invariants
//! - Header content is handled as structured YAML, never by line prefixes.
//! - Note bodies are carried through rewrites unchanged.

pub mod header;
pub mod slug;
