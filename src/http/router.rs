//! Router configuration for the HTTP API.
//!
//! Sets up all routes and middleware (CORS, compression, tracing) and
//! creates the axum router ready for serving.

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Geo catalog
        .route("/locations", get(handlers::list_locations))
        .route("/filters", get(handlers::list_filters))
        .route("/filters/{filter_id}", get(handlers::get_filter))
        .route("/boundaries", get(handlers::list_boundaries))
        .route("/maps", get(handlers::list_maps))
        .route("/region", get(handlers::get_region))
        // Time series catalog
        .route("/parameters", get(handlers::list_parameters))
        .route("/parameter-groups", get(handlers::list_parameter_groups))
        .route("/module-instances", get(handlers::list_module_instances))
        // Time series data and calculations
        .route("/timeseries", get(handlers::list_timeseries))
        .route("/timeseries/calculate", get(handlers::calculate_timeseries))
        // Thresholds
        .route(
            "/threshold-value-sets",
            get(handlers::list_threshold_value_sets),
        )
        .route("/threshold-groups", get(handlers::list_threshold_groups));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::HydroRepository;
    use std::sync::Arc;

    #[test]
    fn router_creation() {
        let repo = Arc::new(LocalRepository::new()) as Arc<dyn HydroRepository>;
        let state = AppState::new(repo);
        let _router = create_router(state);
    }
}
