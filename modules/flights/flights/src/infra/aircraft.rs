use anyhow::Context;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;
use url::Url;
use uuid::Uuid;

use crate::config::AircraftConfig;
use crate::domain::ports::{AircraftCatalog, FALLBACK_AIRCRAFT_TYPE};
use crate::infra::resilience::CircuitBreaker;

#[derive(Debug, Deserialize)]
struct AircraftBody {
    #[serde(rename = "type")]
    kind: String,
}

/// HTTP adapter implementing `AircraftCatalog` against the aircraft service.
///
/// `GET {base_url}/{id}` with Basic credentials, guarded by a circuit breaker.
pub struct HttpAircraftCatalog {
    client: reqwest::Client,
    base: Url,
    username: String,
    password: SecretString,
    breaker: CircuitBreaker,
}

impl HttpAircraftCatalog {
    /// # Errors
    /// Fails if `base_url` is not an absolute URL that can carry path segments.
    pub fn new(client: reqwest::Client, cfg: &AircraftConfig) -> anyhow::Result<Self> {
        let base = Url::parse(&cfg.base_url)
            .with_context(|| format!("invalid aircraft base_url '{}'", cfg.base_url))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("aircraft base_url '{}' cannot carry a path", cfg.base_url);
        }

        Ok(Self {
            client,
            base,
            username: cfg.username.clone(),
            password: cfg.password.clone(),
            breaker: CircuitBreaker::new("aircraft", cfg.circuit_breaker),
        })
    }

    #[must_use]
    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    fn url_for(&self, id: Uuid) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&id.to_string());
        }
        url
    }

    async fn fetch(&self, id: Uuid) -> anyhow::Result<String> {
        let url = self.url_for(id);
        let response = self
            .client
            .get(url.as_str())
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()?;

        let body: AircraftBody = response
            .json()
            .await
            .context("aircraft response is not valid JSON")?;
        Ok(body.kind)
    }
}

#[async_trait]
impl AircraftCatalog for HttpAircraftCatalog {
    #[instrument(skip_all, fields(aircraft_id = %aircraft_id))]
    async fn aircraft_type(&self, aircraft_id: Uuid) -> String {
        match self.breaker.call(self.fetch(aircraft_id)).await {
            Ok(kind) => {
                tracing::debug!(kind = %kind, "Resolved aircraft type");
                kind
            }
            Err(e) => {
                tracing::warn!("Aircraft lookup failed, using fallback: {e:#}");
                FALLBACK_AIRCRAFT_TYPE.to_owned()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn catalog(base_url: &str) -> HttpAircraftCatalog {
        let cfg = AircraftConfig {
            base_url: base_url.to_owned(),
            ..AircraftConfig::default()
        };
        HttpAircraftCatalog::new(reqwest::Client::new(), &cfg).unwrap()
    }

    #[test]
    fn url_appends_id_segment() {
        let id = Uuid::from_u128(1);
        assert_eq!(
            catalog("http://aircraft:8081/aircraft").url_for(id).as_str(),
            "http://aircraft:8081/aircraft/00000000-0000-0000-0000-000000000001"
        );
        assert_eq!(
            catalog("http://aircraft:8081/aircraft/").url_for(id).as_str(),
            "http://aircraft:8081/aircraft/00000000-0000-0000-0000-000000000001"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        let cfg = AircraftConfig {
            base_url: "mailto:ops@example.com".to_owned(),
            ..AircraftConfig::default()
        };
        assert!(HttpAircraftCatalog::new(reqwest::Client::new(), &cfg).is_err());
        let cfg = AircraftConfig {
            base_url: "not a url".to_owned(),
            ..AircraftConfig::default()
        };
        assert!(HttpAircraftCatalog::new(reqwest::Client::new(), &cfg).is_err());
    }

    #[tokio::test]
    #[traced_test]
    async fn unreachable_service_falls_back_and_warns() {
        let aircraft = catalog("http://127.0.0.1:1/aircraft");
        assert_eq!(
            aircraft.aircraft_type(Uuid::nil()).await,
            FALLBACK_AIRCRAFT_TYPE
        );
        assert!(logs_contain("using fallback"));
    }
}
