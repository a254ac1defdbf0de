//! HTTP API for the frequency dashboard

pub mod frequencies;
pub mod server;

pub use server::{build_router, run};
