//! Deletion notices.

use anyhow::Context;
use async_trait::async_trait;
use flights_sdk::Flight;
use serde::Serialize;
use tracing::instrument;
use url::Url;

use crate::config::NotificationsConfig;
use crate::domain::ports::Notifier;
use crate::infra::resilience::CircuitBreaker;

/// Mail document accepted by the mail gateway.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Mail {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body: String,
}

impl Mail {
    #[must_use]
    pub fn flight_deleted(from: &str, to: &str, flight: &Flight) -> Self {
        Self {
            to: to.to_owned(),
            from: from.to_owned(),
            subject: format!("Flight {} deleted", flight.id),
            body: render_flight(flight),
        }
    }
}

fn render_flight(f: &Flight) -> String {
    let status = f.status.map_or("-", |s| s.name());
    format!(
        "Flight {number} ({airline}) has been deleted.\n\
         Route: {from} {from_name} -> {to} {to_name}\n\
         Departure: {dep}\n\
         Arrival: {arr}\n\
         Gate: {gate}\n\
         Status: {status}\n\
         Aircraft: {aircraft}\n\
         Version: {version}",
        number = f.flight_number,
        airline = f.airline,
        from = f.departure_airport.iata_code,
        from_name = f.departure_airport.name,
        to = f.arrival_airport.iata_code,
        to_name = f.arrival_airport.name,
        dep = f.departure_time,
        arr = f.arrival_time,
        gate = f.gate,
        aircraft = f.aircraft_id,
        version = f.version,
    )
}

/// Posts deletion mails as JSON to the configured gateway.
pub struct HttpMailNotifier {
    client: reqwest::Client,
    endpoint: Url,
    from: String,
    to: String,
    breaker: CircuitBreaker,
}

impl HttpMailNotifier {
    /// # Errors
    /// Fails if `endpoint` is not a valid URL.
    pub fn new(
        client: reqwest::Client,
        endpoint: &str,
        cfg: &NotificationsConfig,
    ) -> anyhow::Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("invalid notifications url '{endpoint}'"))?;
        Ok(Self {
            client,
            endpoint,
            from: cfg.from.clone(),
            to: cfg.to.clone(),
            breaker: CircuitBreaker::new("mail", cfg.circuit_breaker),
        })
    }

    async fn post(&self, mail: &Mail) -> anyhow::Result<()> {
        self.client
            .post(self.endpoint.as_str())
            .json(mail)
            .send()
            .await
            .with_context(|| format!("POST {}", self.endpoint))?
            .error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for HttpMailNotifier {
    #[instrument(skip_all, fields(flight_id = %flight.id, endpoint = %self.endpoint))]
    async fn flight_deleted(&self, flight: &Flight) -> anyhow::Result<()> {
        let mail = Mail::flight_deleted(&self.from, &self.to, flight);
        self.breaker
            .call(self.post(&mail))
            .await
            .map_err(|e| anyhow::anyhow!("mail delivery failed: {e:#}"))?;
        tracing::debug!("Deletion mail sent");
        Ok(())
    }
}

/// Used when no mail gateway is configured.
pub struct LogNotifier {
    from: String,
    to: String,
}

impl LogNotifier {
    #[must_use]
    pub fn new(cfg: &NotificationsConfig) -> Self {
        Self {
            from: cfg.from.clone(),
            to: cfg.to.clone(),
        }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn flight_deleted(&self, flight: &Flight) -> anyhow::Result<()> {
        let mail = Mail::flight_deleted(&self.from, &self.to, flight);
        tracing::info!(to = %mail.to, subject = %mail.subject, "Deletion notice (no mail gateway)");
        Ok(())
    }
}
