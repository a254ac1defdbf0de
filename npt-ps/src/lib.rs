//! npt-ps library - research paper search over the sentence index
//!
//! Four search modes against the backing Solr instance: sentence phrase
//! search, title search, author search (AND semantics), and cited
//! paper/author search through the references collection. Every hit is
//! enriched with paper metadata and normalized for display.

pub mod api;
pub mod error;
pub mod search;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;
