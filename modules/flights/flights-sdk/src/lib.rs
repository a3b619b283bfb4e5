//! Flights SDK
//!
//! This crate provides the public API for the `flights` module:
//! - `FlightsApi` trait
//! - Model types (`Flight`, `NewFlight`, `Airport`, `FlightStatus`, ...)
//! - Error type (`FlightsError`)
//!
//! The models carry no serde derives; the REST layer owns its DTOs.

#![forbid(unsafe_code)]

pub mod api;
pub mod errors;
pub mod models;

pub use api::FlightsApi;
pub use errors::FlightsError;
pub use models::{
    Airport, DeletionOutcome, Flight, FlightStatus, NewFlight, QueryParams, StatusParseError,
    Violation,
};
