//! Input catalogs.

/// Catalog, chat and request types plus structural validation.
pub mod model;
