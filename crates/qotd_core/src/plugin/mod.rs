//! Plugin surface declarations.
//!
//! Declares the commands, ribbon action, status bar label and code block
//! language a host wires up. Hosts dispatch by command id.

pub mod commands;
pub mod manifest;
