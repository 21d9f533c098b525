//! Quote use-case services.
//!
//! # Responsibility
//! - Orchestrate document store, transport and clock into quote use-cases.
//! - Keep hosts decoupled from storage and HTTP details.

pub mod quote_service;

use crate::clock::SystemClock;
use crate::fetch::ReqwestTransport;
use crate::settings::{JsonFileSettingsStore, Settings};
use crate::vault::FsVault;
use quote_service::{QuoteService, QuoteServiceError};
use std::path::Path;

/// Service wired to an on-disk vault, live HTTP and the system clock.
pub type VaultQuoteService = QuoteService<FsVault, ReqwestTransport, SystemClock>;

/// Opens the production service for `vault_root`, loading its settings.
pub fn open_vault_service(
    vault_root: impl AsRef<Path>,
) -> Result<VaultQuoteService, QuoteServiceError> {
    let vault_root = vault_root.as_ref();
    let settings = Settings::load(&JsonFileSettingsStore::for_vault(vault_root))?;
    let transport = ReqwestTransport::new()?;
    Ok(QuoteService::new(
        FsVault::new(vault_root),
        transport,
        SystemClock,
        settings,
    ))
}
