#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Test support utilities for `flights` integration tests.
//!
//! In-memory database, fake downstream ports and sample flight data.

#![allow(dead_code)] // Support module provides utilities that may not all be used

use std::sync::Arc;

use async_trait::async_trait;
use flights::config::FlightsConfig;
use flights::domain::ports::{AircraftCatalog, Notifier};
use flights::FlightsModule;
use flights_sdk::{Airport, Flight, FlightStatus, NewFlight};
use parking_lot::Mutex;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use time::macros::datetime;
use uuid::Uuid;

pub const AIRCRAFT_TYPE: &str = "A320";

/// Create a fresh in-memory `SQLite` database.
///
/// A single pooled connection keeps every query on the same memory database.
///
/// # Panics
/// Panics if the database connection fails.
pub async fn inmem_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    Database::connect(opts)
        .await
        .expect("Failed to connect to in-memory database")
}

/// Aircraft catalog answering every lookup with a fixed type.
#[derive(Default)]
pub struct FixedAircraft {
    pub lookups: Mutex<Vec<Uuid>>,
}

#[async_trait]
impl AircraftCatalog for FixedAircraft {
    async fn aircraft_type(&self, aircraft_id: Uuid) -> String {
        self.lookups.lock().push(aircraft_id);
        AIRCRAFT_TYPE.to_owned()
    }
}

/// Notifier remembering the ids of deleted flights.
#[derive(Default)]
pub struct RecordingNotifier {
    pub deleted: Mutex<Vec<Uuid>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn flight_deleted(&self, flight: &Flight) -> anyhow::Result<()> {
        self.deleted.lock().push(flight.id);
        Ok(())
    }
}

/// Notifier whose gateway is always down.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn flight_deleted(&self, _flight: &Flight) -> anyhow::Result<()> {
        anyhow::bail!("mail gateway unavailable")
    }
}

pub struct TestContext {
    pub module: FlightsModule,
    pub aircraft: Arc<FixedAircraft>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_config(FlightsConfig::default()).await
    }

    pub async fn with_config(cfg: FlightsConfig) -> Self {
        let aircraft = Arc::new(FixedAircraft::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let module = FlightsModule::with_ports(
            inmem_db().await,
            &cfg,
            aircraft.clone(),
            notifier.clone(),
        )
        .await
        .expect("Failed to build flights module");
        Self {
            module,
            aircraft,
            notifier,
        }
    }
}

pub fn atlanta() -> Airport {
    Airport::new("ATL", "Hartsfield-Jackson Atlanta", "United States of America")
}

pub fn frankfurt() -> Airport {
    Airport::new("FRA", "Frankfurt Airport", "Germany")
}

pub fn los_angeles() -> Airport {
    Airport::new("LAX", "Los Angeles International", "United States of America")
}

/// A valid flight far in the future.
pub fn sample_flight(flight_number: &str) -> NewFlight {
    NewFlight {
        flight_number: flight_number.to_owned(),
        departure_airport: atlanta(),
        arrival_airport: frankfurt(),
        departure_time: datetime!(2099-02-27 14:48 UTC),
        arrival_time: datetime!(2099-02-28 05:48 UTC),
        gate: 4,
        aircraft_id: Uuid::from_u128(1),
        airline: "Easy Jet".to_owned(),
        status: Some(FlightStatus::GateOpen),
    }
}

/// JSON body equivalent to [`sample_flight`].
pub fn sample_body(flight_number: &str) -> serde_json::Value {
    serde_json::json!({
        "flightNumber": flight_number,
        "departureAirport": { "iataCode": "ATL", "name": "Hartsfield-Jackson Atlanta", "country": "United States of America" },
        "arrivalAirport": { "iataCode": "FRA", "name": "Frankfurt Airport", "country": "Germany" },
        "departureTime": "2099-02-27T14:48:00Z",
        "arrivalTime": "2099-02-28T05:48:00Z",
        "gate": 4,
        "aircraftId": "00000000-0000-0000-0000-000000000001",
        "airline": "Easy Jet",
        "status": "go"
    })
}
