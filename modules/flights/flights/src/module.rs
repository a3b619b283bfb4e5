//! Composition root: wires storage, downstream adapters and the REST router.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use flights_sdk::FlightsApi;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::auth::Authenticator;
use crate::api::rest::handlers::Service;
use crate::api::rest::routes;
use crate::config::FlightsConfig;
use crate::domain::ports::{AircraftCatalog, Notifier};
use crate::domain::service::ServiceConfig;
use crate::infra::aircraft::HttpAircraftCatalog;
use crate::infra::notify::{HttpMailNotifier, LogNotifier};
use crate::infra::storage::FlightsSeaRepo;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::seed::seed_demo_flights;
use crate::local_client::FlightsLocalClient;

/// The flights module, ready to be mounted.
#[derive(Clone)]
pub struct FlightsModule {
    service: Arc<Service>,
    authenticator: Arc<Authenticator>,
}

impl FlightsModule {
    /// Build the module with HTTP adapters for the aircraft service and the
    /// mail gateway (or a log-only notifier when no gateway is configured).
    ///
    /// # Errors
    /// Fails if the adapters cannot be built or migrations fail.
    pub async fn init(db: DatabaseConnection, cfg: &FlightsConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(
                cfg.aircraft.circuit_breaker.call_timeout_ms,
            ))
            .build()
            .context("failed to build HTTP client")?;

        let aircraft: Arc<dyn AircraftCatalog> =
            Arc::new(HttpAircraftCatalog::new(client.clone(), &cfg.aircraft)?);

        let notifier: Arc<dyn Notifier> = match cfg.notifications.url.as_deref() {
            Some(url) => {
                info!(url, "Deletion notices go to the mail gateway");
                Arc::new(HttpMailNotifier::new(client, url, &cfg.notifications)?)
            }
            None => Arc::new(LogNotifier::new(&cfg.notifications)),
        };

        Self::with_ports(db, cfg, aircraft, notifier).await
    }

    /// Build the module around caller-provided downstream ports.
    ///
    /// # Errors
    /// Fails if migrations or demo seeding fail.
    pub async fn with_ports(
        db: DatabaseConnection,
        cfg: &FlightsConfig,
        aircraft: Arc<dyn AircraftCatalog>,
        notifier: Arc<dyn Notifier>,
    ) -> anyhow::Result<Self> {
        info!("Initializing flights module");

        Self::migrate(&db).await?;

        let repo = FlightsSeaRepo::new();
        if cfg.seed_demo_data {
            let inserted = seed_demo_flights(&repo, &db)
                .await
                .context("failed to seed demo flights")?;
            debug!(inserted, "Demo data step finished");
        }

        let service_config = ServiceConfig {
            stream_chunk_size: cfg.stream_chunk_size,
            require_arrival_after_departure: cfg.require_arrival_after_departure,
        };
        let service = Arc::new(Service::new(db, repo, aircraft, notifier, service_config));

        Ok(Self {
            service,
            authenticator: Arc::new(Authenticator::from_config(&cfg.auth)),
        })
    }

    /// Run the flights migrations.
    ///
    /// # Errors
    /// Returns the migration error.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running flights database migrations");
        Migrator::up(db, None)
            .await
            .context("flights migrations failed")?;
        info!("Flights database migrations completed successfully");
        Ok(())
    }

    /// REST routes, relative to wherever the caller nests them.
    #[must_use]
    pub fn router(&self) -> Router {
        routes::router(Arc::clone(&self.service), Arc::clone(&self.authenticator))
    }

    /// Transport-agnostic client for in-process consumers.
    #[must_use]
    pub fn client(&self) -> Arc<dyn FlightsApi> {
        Arc::new(FlightsLocalClient::new(Arc::clone(&self.service)))
    }

    #[must_use]
    pub fn service(&self) -> Arc<Service> {
        Arc::clone(&self.service)
    }
}
