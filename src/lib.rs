//! Similar-title recommendations over a precomputed similarity matrix.
//!
//! A catalog of titles and a pairwise similarity table are loaded once at
//! startup. Each query picks a title, reads its row, and returns the top-K
//! most similar other titles, optionally decorated with provider metadata.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use routes::{create_router, AppState, RankSettings};
pub use store::Dataset;
