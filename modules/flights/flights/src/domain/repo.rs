use async_trait::async_trait;
use flights_sdk::Flight;
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::domain::criteria::FlightPredicate;
use crate::domain::error::DomainError;

/// Repository trait for flight persistence.
///
/// Every method takes a generic connection (`DatabaseConnection` or
/// `DatabaseTransaction`) so the service decides the transactional scope.
#[async_trait]
pub trait FlightsRepository: Send + Sync {
    /// Find a flight by ID.
    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Flight>, DomainError>;

    /// List flights matching all predicates. An empty slice lists everything.
    async fn list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        predicates: &[FlightPredicate],
    ) -> Result<Vec<Flight>, DomainError>;

    /// Read up to `limit` flights ordered by ID, starting after `after`.
    async fn list_after<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        after: Option<Uuid>,
        limit: u64,
    ) -> Result<Vec<Flight>, DomainError>;

    /// Insert a new flight.
    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        flight: Flight,
    ) -> Result<Flight, DomainError>;

    /// Replace the stored flight with `flight` only if its stored version
    /// still equals `expected_version`, incrementing the version in the same
    /// statement. Returns `false` when no row matched.
    async fn replace_if_version<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        flight: &Flight,
        expected_version: i32,
    ) -> Result<bool, DomainError>;

    /// Delete a flight by ID, returning the number of removed rows.
    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<u64, DomainError>;

    /// Check whether a flight with the given ID exists.
    async fn exists<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError>;

    /// Count all stored flights.
    async fn count<C: ConnectionTrait + Send + Sync>(&self, conn: &C) -> Result<u64, DomainError>;
}
