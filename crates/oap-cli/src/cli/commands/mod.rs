//! Command handlers.

pub mod access;
pub mod config;
pub mod session;

use anyhow::{Context, Result};
use oap_core::client::AccessClient;
use oap_core::config::Config;

/// Builds the access client from the resolved configuration.
pub(crate) fn access_client() -> Result<AccessClient> {
    let config = Config::load().context("load config")?;
    Ok(AccessClient::new(config.resolve_backend()))
}
