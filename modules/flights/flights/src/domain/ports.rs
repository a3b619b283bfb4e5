//! Outbound ports implemented by `infra` adapters.

use async_trait::async_trait;
use flights_sdk::Flight;
use uuid::Uuid;

/// Value reported when the aircraft service cannot answer.
pub const FALLBACK_AIRCRAFT_TYPE: &str = "FALLBACK";

/// Resolves an aircraft id to its type designation.
///
/// Implementations never fail: an unreachable or misbehaving downstream
/// yields [`FALLBACK_AIRCRAFT_TYPE`].
#[async_trait]
pub trait AircraftCatalog: Send + Sync {
    async fn aircraft_type(&self, aircraft_id: Uuid) -> String;
}

/// Sends the deletion notice for a removed flight.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn flight_deleted(&self, flight: &Flight) -> anyhow::Result<()>;
}
