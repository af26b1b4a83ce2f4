//! QResto Core - Shared domain types.
//!
//! This crate provides the types used across all QResto components:
//! - `server` - Public menu, owner dashboard and super-admin panel
//! - `cli` - Command-line tools for migrations and tenant bootstrap
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. Database codecs are available behind the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Typed ids, slugs, prices, emails, brand colors and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
