//! # HydroWeb Rust Backend
//!
//! Backend for serving hydrological time series data and model-skill
//! calculations. The service exposes a REST API over a catalog of locations,
//! filters, parameters and time series, and implements a calculation engine
//! that scores simulated series against observations with registered metrics
//! (RMSE, KGE, MEAN, PEAK) across four modes: evaluation, competition,
//! comparison and matrix-evaluation.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Data Transfer Objects (DTOs) for API responses
//! - [`models`]: Stored entities (locations, filters, time series, thresholds)
//! - [`db`]: Repository pattern and fixture-backed persistence layer
//! - [`services`]: Calculation engine and listing helpers
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod api;

pub mod db;
pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
