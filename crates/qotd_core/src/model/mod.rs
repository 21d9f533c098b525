//! Quote domain model.
//!
//! # Responsibility
//! - Define the validated remote quote record and rating value types.
//! - Keep user-entered rating text parsing in one place.
//!
//! # Invariants
//! - A `RemoteQuote` always carries trimmed text fields.
//! - A `Rating` is always within `1..=5`.

pub mod quote;
