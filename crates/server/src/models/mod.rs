//! Domain models for the server.

pub mod catalog;
pub mod profile;
pub mod restaurant;
pub mod session;

pub use catalog::{Category, NewProduct, Product, ProductFilter};
pub use profile::Profile;
pub use restaurant::{NewRestaurant, Restaurant, RestaurantSettings, ShopSummary, WifiDetails};
pub use session::{CurrentUser, keys as session_keys};
