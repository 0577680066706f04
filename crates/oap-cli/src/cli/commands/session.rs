//! Session command handlers.
//!
//! The printed `navigate <path>` lines are the navigation an embedding
//! shell would perform; the CLI itself has nowhere to go.

use anyhow::Result;
use oap_core::session::{self, FileSessionStore, GateDecision, Navigator};

struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&mut self, target: &str) -> Result<()> {
        println!("navigate {target}");
        Ok(())
    }
}

pub fn login() -> Result<()> {
    let mut store = FileSessionStore::new();
    let mut nav = PrintNavigator;
    session::login_success(&mut store, &mut nav);
    Ok(())
}

pub fn logout() -> Result<()> {
    let mut store = FileSessionStore::new();
    let mut nav = PrintNavigator;
    session::logout(&mut store, &mut nav);
    Ok(())
}

pub fn gate(path: &str) -> Result<()> {
    let store = FileSessionStore::new();
    match session::evaluate_gate(path, &store) {
        GateDecision::Open => println!("open"),
        GateDecision::RedirectToLogin => println!("redirect {}", session::LOGIN_PAGE),
    }
    Ok(())
}
