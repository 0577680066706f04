//! Session gate and auth hooks.
//!
//! A convenience gate only: the flag lives in client-side session state and
//! is trivially bypassed by writing it directly. Real authorization is
//! enforced by the backend's row-level policy, never here. What the gate
//! buys is a consistent redirect to the login page before a protected page
//! renders.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::paths;

/// Session flag key.
pub const AUTH_FLAG_KEY: &str = "auth";
/// Flag value that opens the gate; anything else counts as unauthenticated.
pub const AUTH_FLAG_TRUE: &str = "true";

/// Pages reachable without an authenticated session.
pub const PUBLIC_PAGES: &[&str] = &["/Login.html", "/joining.html"];
/// Gate redirect target and logout destination.
pub const LOGIN_PAGE: &str = "/Login.html";
/// Destination after a successful login.
pub const HOME_PAGE: &str = "/index.html";
/// Last-resort target when the primary destination fails.
pub const ROOT_PAGE: &str = "/";

/// Session-scoped string storage.
///
/// Implementations may fail (blocked storage, unreadable state file); the
/// gate and the auth hooks treat every failure as "not authenticated" and
/// never let it escape to the page.
pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store for tests and embedding shells that manage their own
/// lifetime.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: HashMap<String, String>,
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// File-backed store at `<OAP_HOME>/session.json`.
///
/// Unlike a browser tab session this survives process restarts; `logout`
/// is what ends it.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Creates a store at the default session path.
    pub fn new() -> Self {
        Self {
            path: paths::session_path(),
        }
    }

    /// Creates a store at a specific path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session state from {}", self.path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session state from {}", self.path.display()))
    }

    fn save(&self, values: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(values).context("Failed to serialize session state")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write session state to {}", self.path.display()))?;

        Ok(())
    }
}

impl Default for FileSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut values = self.load()?;
        values.remove(key);
        self.save(&values)
    }
}

/// Outcome of the page gate for one load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Render the page.
    Open,
    /// Send the visitor to the login page before anything else runs.
    RedirectToLogin,
}

impl GateDecision {
    /// Returns the redirect target, if any.
    pub fn redirect_target(self) -> Option<&'static str> {
        match self {
            GateDecision::Open => None,
            GateDecision::RedirectToLogin => Some(LOGIN_PAGE),
        }
    }
}

/// Evaluates the gate for a page path.
///
/// Public pages always pass. Everything else requires the session flag to
/// be exactly `"true"`; a missing flag, any other value, or a failing store
/// closes the gate.
pub fn evaluate_gate(path: &str, store: &dyn SessionStore) -> GateDecision {
    if PUBLIC_PAGES.contains(&path) {
        return GateDecision::Open;
    }

    match store.get(AUTH_FLAG_KEY) {
        Ok(Some(value)) if value == AUTH_FLAG_TRUE => GateDecision::Open,
        Ok(_) => GateDecision::RedirectToLogin,
        Err(err) => {
            // Blocked storage must not crash the page; treat as signed out.
            tracing::warn!("session storage unavailable: {err:#}");
            GateDecision::RedirectToLogin
        }
    }
}

/// Navigation seam for the embedding shell.
pub trait Navigator {
    fn navigate(&mut self, target: &str) -> Result<()>;
}

/// Marks the session authenticated and moves to the home page.
///
/// Storage failures are absorbed: this hook must never take down the page
/// that just completed a login. Falls back to the root path when the home
/// navigation fails.
pub fn login_success(store: &mut dyn SessionStore, nav: &mut dyn Navigator) {
    if let Err(err) = store.set(AUTH_FLAG_KEY, AUTH_FLAG_TRUE) {
        tracing::warn!("failed to persist session flag: {err:#}");
    }

    if nav.navigate(HOME_PAGE).is_err() {
        let _ = nav.navigate(ROOT_PAGE);
    }
}

/// Clears the session flag and returns to the login page.
///
/// Same failure policy as [`login_success`]: storage errors are absorbed
/// and navigation falls back to the root path.
pub fn logout(store: &mut dyn SessionStore, nav: &mut dyn Navigator) {
    if let Err(err) = store.remove(AUTH_FLAG_KEY) {
        tracing::warn!("failed to clear session flag: {err:#}");
    }

    if nav.navigate(LOGIN_PAGE).is_err() {
        let _ = nav.navigate(ROOT_PAGE);
    }
}
