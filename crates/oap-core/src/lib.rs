//! Core OAP access library (config, backend client, session gate).

pub mod client;
pub mod config;
pub mod error;
pub mod session;
