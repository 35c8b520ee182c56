//! # CRM API
//!
//! HTTP handlers, authentication extractor, router and response envelope.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::{AppState, Repositories};
