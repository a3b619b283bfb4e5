//! Flights module
//!
//! Stores flights, guards replacements with optimistic versions and exposes
//! them over a hypermedia REST API.

#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
pub mod local_client;
pub mod module;

pub use config::FlightsConfig;
pub use flights_sdk::{FlightsApi, FlightsError};
pub use module::FlightsModule;
