//! HTTP server module.
//!
//! An axum-based REST API over the repository and service layers. Handlers
//! parse and validate query parameters, delegate to the service layer, and
//! serialize the versioned response envelopes from [`crate::api`].

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
