//! Core types for QResto.
//!
//! Each type validates on construction so handlers can rely on the value
//! being well-formed.

pub mod color;
pub mod email;
pub mod id;
pub mod price;
pub mod role;
pub mod slug;

pub use color::{BrandColor, BrandColorError};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use role::{Role, RoleError};
pub use slug::{Slug, SlugError};
