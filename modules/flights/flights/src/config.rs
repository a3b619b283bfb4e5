//! Flights module configuration.

use secrecy::SecretString;
use serde::{Deserialize, Serialize, Serializer};

/// SHA-256 of `p`, the development password of the built-in accounts.
const DEV_PASSWORD_SHA256: &str = "148de9c5a7a44d19e56cd9ae1a554bf67847afb0c58f6e12fa29ac7ddfca9940";

/// Flights module configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlightsConfig {
    /// Remote aircraft service used to resolve `aircraftType`.
    pub aircraft: AircraftConfig,
    /// Outbound mail notifications on delete.
    pub notifications: NotificationsConfig,
    /// HTTP Basic authentication and role policy.
    pub auth: AuthConfig,
    /// Rows read per round trip when streaming all flights.
    pub stream_chunk_size: u64,
    /// Reject flights whose arrival is not after their departure.
    pub require_arrival_after_departure: bool,
    /// Insert the demo flights on startup when the table is empty.
    pub seed_demo_data: bool,
}

impl Default for FlightsConfig {
    fn default() -> Self {
        Self {
            aircraft: AircraftConfig::default(),
            notifications: NotificationsConfig::default(),
            auth: AuthConfig::default(),
            stream_chunk_size: 100,
            require_arrival_after_departure: true,
            seed_demo_data: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AircraftConfig {
    /// Base URL; the aircraft id is appended as the last path segment.
    pub base_url: String,
    pub username: String,
    #[serde(serialize_with = "redact")]
    pub password: SecretString,
    pub circuit_breaker: CircuitBreakerSettings,
}

impl Default for AircraftConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081/aircraft".to_owned(),
            username: "admin".to_owned(),
            password: SecretString::from("p"),
            circuit_breaker: CircuitBreakerSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotificationsConfig {
    /// Mail gateway endpoint. When unset, notifications are only logged.
    pub url: Option<String>,
    pub from: String,
    pub to: String,
    pub circuit_breaker: CircuitBreakerSettings,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            url: None,
            from: "Flights Service <flights@example.com>".to_owned(),
            to: "Flight Supervisor <supervisor@example.com>".to_owned(),
            circuit_breaker: CircuitBreakerSettings::default(),
        }
    }
}

/// Circuit breaker tuning for one downstream dependency.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CircuitBreakerSettings {
    /// Consecutive failures before the circuit opens.
    pub failure_threshold: u32,
    /// How long the circuit stays open before probing again.
    pub reset_timeout_ms: u64,
    /// Probe calls admitted while half-open.
    pub half_open_max_calls: u32,
    /// Upper bound for a single call.
    pub call_timeout_ms: u64,
}

impl Default for CircuitBreakerSettings {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout_ms: 60_000,
            half_open_max_calls: 10,
            call_timeout_ms: 1_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// When false every route is public.
    pub enabled: bool,
    pub realm: String,
    pub users: Vec<UserAccount>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            realm: "flights".to_owned(),
            users: vec![
                UserAccount {
                    username: "admin".to_owned(),
                    password_sha256: DEV_PASSWORD_SHA256.to_owned(),
                    roles: vec!["admin".to_owned(), "employee".to_owned()],
                },
                UserAccount {
                    username: "alpha1".to_owned(),
                    password_sha256: DEV_PASSWORD_SHA256.to_owned(),
                    roles: vec!["employee".to_owned()],
                },
                UserAccount {
                    username: "maxi".to_owned(),
                    password_sha256: DEV_PASSWORD_SHA256.to_owned(),
                    roles: vec!["supervisor".to_owned()],
                },
            ],
        }
    }
}

/// A configured account. The password is stored as a hex SHA-256 digest.
///
/// The digest is unsalted and fast to compute, so it offers much less
/// protection against offline guessing than bcrypt-style hashes. Keep the
/// configuration private and use long random passwords.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UserAccount {
    pub username: String,
    pub password_sha256: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

fn redact<S: Serializer>(_: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str("[REDACTED]")
}
