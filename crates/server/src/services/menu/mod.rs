//! Public menu pipeline.
//!
//! [`resolver`] turns a slug into a [`Menu`] (or a uniform "unavailable"
//! result), and [`navigator`] holds the client-side view state the rendered
//! page starts from.

pub mod navigator;
pub mod resolver;

pub use navigator::{CategoryNavigator, ProductOverlay, WifiBubble};
pub use resolver::{Menu, MenuResolution, MenuSection, MenuSource, resolve_menu};
