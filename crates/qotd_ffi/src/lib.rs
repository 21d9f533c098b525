//! Host bridge crate for embedding UIs.

pub mod api;
