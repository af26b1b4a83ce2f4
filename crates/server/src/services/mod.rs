//! Business logic services.

pub mod auth;
pub mod menu;
pub mod provisioning;
pub mod storage;
