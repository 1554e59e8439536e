//! Static quiz content.

pub mod catalog;

pub use catalog::{Catalog, CatalogError, CurrencyPack};
