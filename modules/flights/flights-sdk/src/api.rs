//! `FlightsApi` trait definition.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::FlightsError;
use crate::models::{DeletionOutcome, Flight, NewFlight, QueryParams};

/// Public API trait for the `flights` module.
///
/// Other in-process components use this instead of the REST surface:
/// ```ignore
/// let flight = client.get_flight(id).await?;
/// ```
#[async_trait]
pub trait FlightsApi: Send + Sync {
    /// Get a flight by ID.
    async fn get_flight(&self, id: Uuid) -> Result<Flight, FlightsError>;

    /// Find flights matching raw query parameters. Malformed parameters
    /// yield an empty list, not an error.
    async fn find_flights(&self, params: &QueryParams) -> Result<Vec<Flight>, FlightsError>;

    /// Create a new flight.
    async fn create_flight(&self, new_flight: NewFlight) -> Result<Flight, FlightsError>;

    /// Replace a flight, guarded by the version token the caller last saw.
    async fn update_flight(
        &self,
        id: Uuid,
        version: &str,
        data: NewFlight,
    ) -> Result<Flight, FlightsError>;

    /// Delete a flight by ID.
    async fn delete_flight(&self, id: Uuid) -> Result<DeletionOutcome, FlightsError>;
}
