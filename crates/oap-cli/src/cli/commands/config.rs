//! Config command handlers.

use anyhow::{Context, Result};
use oap_core::config::{Config, paths};

pub fn path() {
    println!("{}", paths::config_path().display());
}

pub fn init() -> Result<()> {
    let config_path = paths::config_path();
    Config::init(&config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    Ok(())
}

pub fn show(env: bool) -> Result<()> {
    let config = Config::load().context("load config")?;
    let backend = config.resolve_backend();

    if env {
        for (name, value) in backend.export_env() {
            println!("export {name}=\"{value}\"");
        }
        return Ok(());
    }

    println!("base_url           {}", backend.base_url);
    println!("functions_base_url {}", backend.functions_base_url);
    println!("email_worker_url   {}", backend.email_worker_url);
    println!("account_setup_url  {}", backend.account_setup_url);
    println!("anon_key           {}", mask_key(&backend.anon_key));
    Ok(())
}

/// Returns a masked version of the key for display (first 12 chars + ...).
fn mask_key(key: &str) -> String {
    if key.len() <= 16 {
        return "***".to_string();
    }
    format!("{}...", &key[..12])
}
