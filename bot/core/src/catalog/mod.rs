//! Catalog Access
//!
//! Everything the engine knows about the third-party movie catalog:
//! - [`query`]: immutable search queries and the pure request builders
//! - [`types`]: typed view of the catalog's JSON responses
//! - [`client`]: the reqwest-backed [`CatalogBackend`] implementation and
//!   its failure taxonomy

pub mod client;
pub mod query;
pub mod types;

pub use client::{CatalogBackend, CatalogClient, CatalogError};
pub use query::{CatalogRequest, SearchQuery, FILTER_PAGE_SIZE, NAME_PAGE_SIZE};
pub use types::{BudgetInfo, CatalogPage, MovieRecord, PosterInfo, RatingInfo};
