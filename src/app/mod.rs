pub mod bootstrap;

pub use bootstrap::{build_cart_store, settings_from};
