//! Wardrobe rotation and outfit recommendation service.
//!
//! Exposes the building blocks (config, state, error handling, models,
//! services, routes) so the binary entrypoint and the integration tests
//! both wire the same application.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
