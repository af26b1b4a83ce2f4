//! `QResto` server library.
//!
//! The binary in `main.rs` wires these modules into an axum app. The
//! library surface exists so the integration tests can drive the menu
//! resolver and the provisioning saga with in-memory backends.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
