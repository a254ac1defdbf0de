//! npt-viz library - frequency dashboard over the phrase index
//!
//! Serves a small single-page dashboard plus a JSON API that turns
//! comma-separated search terms into per-period percentage series,
//! normalized against the period-totals files.

pub mod api;
pub mod error;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;
