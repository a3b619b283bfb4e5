//! Local implementation of `FlightsApi`.
//!
//! Used for in-process callers. Delegates to the domain service and converts
//! errors to SDK error types.

use std::sync::Arc;

use async_trait::async_trait;
use flights_sdk::{
    DeletionOutcome, Flight, FlightsApi, FlightsError, NewFlight, QueryParams,
};
use uuid::Uuid;

use crate::api::rest::handlers::Service;

pub struct FlightsLocalClient {
    service: Arc<Service>,
}

impl FlightsLocalClient {
    #[must_use]
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl FlightsApi for FlightsLocalClient {
    async fn get_flight(&self, id: Uuid) -> Result<Flight, FlightsError> {
        self.service
            .find_by_id(id)
            .await?
            .ok_or_else(|| FlightsError::not_found(id))
    }

    async fn find_flights(&self, params: &QueryParams) -> Result<Vec<Flight>, FlightsError> {
        self.service.find(params).await.map_err(Into::into)
    }

    async fn create_flight(&self, new_flight: NewFlight) -> Result<Flight, FlightsError> {
        self.service.create(new_flight).await.map_err(Into::into)
    }

    async fn update_flight(
        &self,
        id: Uuid,
        version: &str,
        data: NewFlight,
    ) -> Result<Flight, FlightsError> {
        self.service
            .update(id, version, data)
            .await
            .map_err(Into::into)
    }

    async fn delete_flight(&self, id: Uuid) -> Result<DeletionOutcome, FlightsError> {
        self.service.delete_by_id(id).await.map_err(Into::into)
    }
}
