//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to one endpoint and delegates to the repository
//! and the service layer; no business logic lives here.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{
    CalculateQuery, FiltersQuery, HealthResponse, LocationsQuery, ThresholdGroupsQuery,
    TimeseriesDto, TimeseriesQuery,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{
    CalculationResponse, FiltersWithPolygonResponse, LocationWithFilters, LocationsResponse,
    ParameterGroupsResponse, ParametersResponse, ThresholdGroupsResponse,
    ThresholdValueSetsResponse, API_VERSION,
};
use crate::db::repository::RepositoryError;
use crate::models::{Boundary, Filter, FilterListItem};
use crate::services::{calculate, classify, locations, thresholds};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Verifies the service is running and the repository is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let repo_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: API_VERSION.to_string(),
        repository: repo_status,
    }))
}

// =============================================================================
// Locations
// =============================================================================

/// GET /v1/locations
///
/// Lists locations, optionally with their free-form attributes and the
/// filters their series belong to.
pub async fn list_locations(
    State(state): State<AppState>,
    Query(query): Query<LocationsQuery>,
) -> HandlerResult<LocationsResponse> {
    let mut locs = state
        .repository
        .list_locations(query.filter.as_deref())
        .await?;

    if !query.show_attributes() {
        for loc in &mut locs {
            loc.attributes = None;
        }
    }

    let annotated = if query.show_filters() {
        let series = state.repository.list_timeseries(None, None, false).await?;
        let filters = state.repository.list_filters().await?;
        locations::include_filters(locs, &series, &filters)
    } else {
        locs.into_iter()
            .map(|location| LocationWithFilters {
                location,
                filters: None,
            })
            .collect()
    };

    Ok(Json(LocationsResponse::new(annotated)))
}

// =============================================================================
// Filters
// =============================================================================

/// GET /v1/filters
///
/// Lists all filters. Without `includePolygon` the response is a bare array
/// of `{id, name}` items; with it, the full filters are wrapped in the
/// versioned envelope (under its historical `locations` key).
pub async fn list_filters(
    State(state): State<AppState>,
    Query(query): Query<FiltersQuery>,
) -> Result<Response, AppError> {
    let filters = state.repository.list_filters().await?;

    if query.include_polygon() {
        return Ok(Json(FiltersWithPolygonResponse::new(filters)).into_response());
    }

    let items: Vec<FilterListItem> = filters.iter().map(Filter::to_list_item).collect();
    Ok(Json(items).into_response())
}

/// GET /v1/filters/{filter_id}
///
/// Gets a single filter by its id, all information included.
pub async fn get_filter(
    State(state): State<AppState>,
    Path(filter_id): Path<String>,
) -> HandlerResult<Filter> {
    match state.repository.get_filter(&filter_id).await {
        Ok(filter) => Ok(Json(filter)),
        Err(RepositoryError::NotFound(_)) => Err(AppError::NotFound(format!(
            "Filter with id \"{}\" not found.",
            filter_id
        ))),
        Err(e) => Err(e.into()),
    }
}

/// GET /v1/boundaries
///
/// Lists the boundary polygons of every filter that has one.
pub async fn list_boundaries(State(state): State<AppState>) -> HandlerResult<Vec<Boundary>> {
    let filters = state.repository.list_filters().await?;
    let boundaries = filters.into_iter().filter_map(|f| f.boundary).collect();
    Ok(Json(boundaries))
}

// =============================================================================
// Maps and region
// =============================================================================

/// GET /v1/maps
pub async fn list_maps(State(state): State<AppState>) -> HandlerResult<Vec<crate::models::Map>> {
    Ok(Json(state.repository.list_maps().await?))
}

/// GET /v1/region
pub async fn get_region(State(state): State<AppState>) -> HandlerResult<crate::models::Region> {
    Ok(Json(state.repository.region().await?))
}

// =============================================================================
// Parameters and module instances
// =============================================================================

/// GET /v1/parameters
pub async fn list_parameters(State(state): State<AppState>) -> HandlerResult<ParametersResponse> {
    let parameters = state.repository.list_parameters().await?;
    Ok(Json(ParametersResponse::new(parameters)))
}

/// GET /v1/parameter-groups
pub async fn list_parameter_groups(
    State(state): State<AppState>,
) -> HandlerResult<ParameterGroupsResponse> {
    let groups = state.repository.list_parameter_groups().await?;
    Ok(Json(ParameterGroupsResponse::new(groups)))
}

/// GET /v1/module-instances
pub async fn list_module_instances(
    State(state): State<AppState>,
) -> HandlerResult<Vec<crate::models::ModuleInstance>> {
    Ok(Json(state.repository.list_module_instances().await?))
}

// =============================================================================
// Timeseries
// =============================================================================

/// GET /v1/timeseries
///
/// Lists time series scoped by `filter` and/or `location`. `onlyHeaders`
/// drops the event payloads; `showStatistics` adds summary statistics and is
/// only valid together with `onlyHeaders`.
pub async fn list_timeseries(
    State(state): State<AppState>,
    Query(query): Query<TimeseriesQuery>,
) -> HandlerResult<Vec<TimeseriesDto>> {
    let only_headers = query.only_headers();
    let show_statistics = query.show_statistics();

    if show_statistics && !only_headers {
        return Err(AppError::BadRequest(
            "Unexpected 'show_statistics' with no 'only_headers'.".to_string(),
        ));
    }

    // Events are needed to compute statistics even when they are not served.
    let with_events = !only_headers || show_statistics;
    let series = state
        .repository
        .list_timeseries(query.filter.as_deref(), query.location.as_deref(), with_events)
        .await?;

    let items = series
        .into_iter()
        .map(|ts| {
            let statistics = show_statistics.then(|| ts.statistics());
            TimeseriesDto {
                id: ts.id,
                header: ts.header,
                filter_set: ts.filter_set,
                statistics,
                events: (!only_headers).then_some(ts.events),
            }
        })
        .collect();
    Ok(Json(items))
}

/// GET /v1/timeseries/calculate
///
/// Classifies the request into a calculation mode, executes it, and returns
/// the result nested under the mode name.
pub async fn calculate_timeseries(
    State(state): State<AppState>,
    Query(query): Query<CalculateQuery>,
) -> HandlerResult<CalculationResponse> {
    let request = query.into_request();
    let mode = classify::classify(&request).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let data = calculate::run(state.repository.as_ref(), mode, &request).await?;
    Ok(Json(CalculationResponse::new(mode, data)))
}

// =============================================================================
// Thresholds
// =============================================================================

/// GET /v1/threshold-value-sets
pub async fn list_threshold_value_sets(
    State(state): State<AppState>,
) -> HandlerResult<ThresholdValueSetsResponse> {
    let sets = state.repository.list_threshold_value_sets().await?;
    Ok(Json(ThresholdValueSetsResponse::new(sets)))
}

/// GET /v1/threshold-groups
///
/// Lists threshold groups with their level thresholds. With a `filter`, the
/// listing is restricted to the levels referenced by that filter's series:
/// series → value sets → level threshold values → level thresholds → groups.
pub async fn list_threshold_groups(
    State(state): State<AppState>,
    Query(query): Query<ThresholdGroupsQuery>,
) -> HandlerResult<ThresholdGroupsResponse> {
    let all_levels = state.repository.list_level_thresholds().await?;

    let groups = match &query.filter {
        None => thresholds::invert_threshold_levels(&all_levels),
        Some(filter_id) => {
            let series = state.repository.fetch_headers(filter_id).await?;
            let referenced = thresholds::referenced_level_threshold_ids(&series);
            let selected: Vec<_> = all_levels
                .into_iter()
                .filter(|level| referenced.contains(&level.id))
                .collect();
            thresholds::invert_threshold_levels(&selected)
        }
    };

    Ok(Json(ThresholdGroupsResponse::new(groups)))
}
