//! HTTP API for the paper search service

pub mod handlers;
pub mod server;

pub use server::{build_router, run};
