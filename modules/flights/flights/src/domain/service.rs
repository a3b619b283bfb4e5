//! Domain service layer - business logic and rules.
//!
//! The service owns the database connection and the outbound ports. It never
//! keeps cross-request mutable state: concurrent writers are serialized only
//! by the conditional update in storage.

use std::collections::HashMap;
use std::sync::Arc;

use flights_sdk::{DeletionOutcome, Flight, NewFlight, QueryParams};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use sea_orm::DatabaseConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::criteria::{Criteria, build_criteria};
use crate::domain::error::DomainError;
use crate::domain::ports::{AircraftCatalog, Notifier};
use crate::domain::repo::FlightsRepository;
use crate::domain::validation::validate;

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub stream_chunk_size: u64,
    pub require_arrival_after_departure: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            stream_chunk_size: 100,
            require_arrival_after_departure: true,
        }
    }
}

/// Keyset position of `stream_all`.
#[derive(Debug, Clone, Copy)]
enum Cursor {
    Start,
    After(Uuid),
    Done,
}

pub struct FlightsService<R: FlightsRepository> {
    db: DatabaseConnection,
    repo: Arc<R>,
    aircraft: Arc<dyn AircraftCatalog>,
    notifier: Arc<dyn Notifier>,
    config: ServiceConfig,
}

impl<R: FlightsRepository> Clone for FlightsService<R> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            repo: Arc::clone(&self.repo),
            aircraft: Arc::clone(&self.aircraft),
            notifier: Arc::clone(&self.notifier),
            config: self.config.clone(),
        }
    }
}

impl<R: FlightsRepository + 'static> FlightsService<R> {
    pub fn new(
        db: DatabaseConnection,
        repo: R,
        aircraft: Arc<dyn AircraftCatalog>,
        notifier: Arc<dyn Notifier>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            db,
            repo: Arc::new(repo),
            aircraft,
            notifier,
            config,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Flight>, DomainError> {
        tracing::debug!("Getting flight by id");

        let Some(mut flight) = self.repo.get(&self.db, id).await? else {
            tracing::debug!("Flight not found");
            return Ok(None);
        };
        flight.aircraft_type = Some(self.aircraft.aircraft_type(flight.aircraft_id).await);
        Ok(Some(flight))
    }

    /// Find flights matching raw query parameters.
    ///
    /// Malformed parameters produce an empty result without a query.
    #[tracing::instrument(skip(self, params))]
    pub async fn find(&self, params: &QueryParams) -> Result<Vec<Flight>, DomainError> {
        let mut flights = match build_criteria(params) {
            Criteria::NoMatch => {
                tracing::debug!("Query parameters rejected, returning no flights");
                return Ok(Vec::new());
            }
            Criteria::MatchAll => self.repo.list(&self.db, &[]).await?,
            Criteria::Filter(predicates) => self.repo.list(&self.db, &predicates).await?,
        };

        self.resolve_aircraft_types(&mut flights).await;
        tracing::debug!("Found {} flights", flights.len());
        Ok(flights)
    }

    /// Stream every flight, reading storage in chunks.
    pub fn stream_all(&self) -> BoxStream<'static, Result<Flight, DomainError>> {
        let svc = self.clone();
        let chunk_size = self.config.stream_chunk_size.max(1);

        stream::try_unfold(Cursor::Start, move |cursor| {
            let svc = svc.clone();
            async move {
                let after = match cursor {
                    Cursor::Start => None,
                    Cursor::After(id) => Some(id),
                    Cursor::Done => return Ok::<_, DomainError>(None),
                };
                let mut chunk = svc.repo.list_after(&svc.db, after, chunk_size).await?;
                let Some(last) = chunk.last().map(|f| f.id) else {
                    return Ok(None);
                };
                svc.resolve_aircraft_types(&mut chunk).await;

                let read = u64::try_from(chunk.len()).unwrap_or(u64::MAX);
                let next = if read >= chunk_size {
                    Cursor::After(last)
                } else {
                    Cursor::Done
                };
                tracing::debug!(%last, read, "Streamed flight chunk");
                Ok(Some((
                    stream::iter(chunk.into_iter().map(Ok::<_, DomainError>)),
                    next,
                )))
            }
        })
        .try_flatten()
        .boxed()
    }

    #[tracing::instrument(skip(self, new_flight), fields(flight_number = %new_flight.flight_number))]
    pub async fn create(&self, new_flight: NewFlight) -> Result<Flight, DomainError> {
        tracing::info!("Creating new flight");

        let now = OffsetDateTime::now_utc();
        self.check(&new_flight, now)?;

        let flight = Flight::from_new(Uuid::now_v7(), 0, new_flight, now);
        let mut created = self.repo.insert(&self.db, flight).await?;
        created.aircraft_type = Some(self.aircraft.aircraft_type(created.aircraft_id).await);

        tracing::info!(id = %created.id, "Successfully created flight");
        Ok(created)
    }

    /// Replace a flight guarded by the caller's version token.
    ///
    /// Steps run in a fixed order: validation, existence, version parsing,
    /// then the conditional replace. A replace that matches no row is a
    /// `VersionConflict` if the flight still exists, otherwise `NotFound`.
    #[tracing::instrument(skip(self, data), fields(flight_id = %id))]
    pub async fn update(
        &self,
        id: Uuid,
        version: &str,
        data: NewFlight,
    ) -> Result<Flight, DomainError> {
        tracing::info!("Updating flight");

        let now = OffsetDateTime::now_utc();
        self.check(&data, now)?;

        let current = self
            .repo
            .get(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::not_found(id))?;

        let expected: i32 = version.parse().map_err(|_| {
            tracing::debug!(version, "Version token is not an integer");
            DomainError::invalid_version(version)
        })?;

        let mut replacement = Flight::from_new(id, expected, data, now);
        replacement.created_at = current.created_at;

        if !self
            .repo
            .replace_if_version(&self.db, &replacement, expected)
            .await?
        {
            return if self.repo.exists(&self.db, id).await? {
                tracing::info!(expected, "Version conflict on update");
                Err(DomainError::version_conflict(id, expected))
            } else {
                Err(DomainError::not_found(id))
            };
        }

        let mut updated = self
            .repo
            .get(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::not_found(id))?;
        updated.aircraft_type = Some(self.aircraft.aircraft_type(updated.aircraft_id).await);

        tracing::info!(version = updated.version, "Successfully updated flight");
        Ok(updated)
    }

    /// Delete a flight and notify about it. Notification failures are logged
    /// and do not affect the outcome.
    #[tracing::instrument(skip(self), fields(flight_id = %id))]
    pub async fn delete_by_id(&self, id: Uuid) -> Result<DeletionOutcome, DomainError> {
        tracing::info!("Deleting flight");

        let existing = self.repo.get(&self.db, id).await?;
        let deleted_count = self.repo.delete(&self.db, id).await?;

        if let Some(flight) = existing.filter(|_| deleted_count > 0) {
            if let Err(e) = self.notifier.flight_deleted(&flight).await {
                tracing::warn!("Deletion notice failed (continuing): {e:#}");
            }
        }

        tracing::info!(deleted_count, "Delete finished");
        Ok(DeletionOutcome { deleted_count })
    }

    fn check(&self, data: &NewFlight, now: OffsetDateTime) -> Result<(), DomainError> {
        let violations = validate(data, now, self.config.require_arrival_after_departure);
        if violations.is_empty() {
            Ok(())
        } else {
            tracing::debug!(count = violations.len(), "Flight data rejected");
            Err(DomainError::validation(violations))
        }
    }

    /// Look up each distinct aircraft once.
    async fn resolve_aircraft_types(&self, flights: &mut [Flight]) {
        let mut types: HashMap<Uuid, String> = HashMap::new();
        for flight in flights.iter() {
            if !types.contains_key(&flight.aircraft_id) {
                let kind = self.aircraft.aircraft_type(flight.aircraft_id).await;
                types.insert(flight.aircraft_id, kind);
            }
        }
        for flight in flights.iter_mut() {
            flight.aircraft_type = types.get(&flight.aircraft_id).cloned();
        }
    }
}
