//! HTTP Basic authentication and the per-route role policy.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{MatchedPath, Request, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::api::rest::problem::Problem;
use crate::config::AuthConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Employee,
    Supervisor,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Employee => "employee",
            Self::Supervisor => "supervisor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "employee" => Ok(Self::Employee),
            "supervisor" => Ok(Self::Supervisor),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

const ADMIN_OR_EMPLOYEE: &[Role] = &[Role::Admin, Role::Employee];
const EMPLOYEE: &[Role] = &[Role::Employee];
const ADMIN: &[Role] = &[Role::Admin];

/// Roles of which the caller needs at least one; `None` for public routes.
#[must_use]
pub fn required_roles(method: &Method, matched_path: &str) -> Option<&'static [Role]> {
    if matched_path.ends_with("/auth/roles") {
        return (method == Method::GET).then_some(EMPLOYEE);
    }

    let item = matched_path.ends_with("/{id}");
    if method == Method::POST && !item {
        None
    } else if method == Method::GET {
        Some(ADMIN_OR_EMPLOYEE)
    } else if method == Method::PUT {
        Some(EMPLOYEE)
    } else {
        Some(ADMIN)
    }
}

/// The authenticated caller, stored as a request extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub roles: Vec<Role>,
}

impl Principal {
    #[must_use]
    pub fn has_any(&self, roles: &[Role]) -> bool {
        self.roles.iter().any(|r| roles.contains(r))
    }
}

#[derive(Debug, Clone)]
struct Account {
    password_sha256: Vec<u8>,
    roles: Vec<Role>,
}

/// Verifies Basic credentials against configured accounts.
#[derive(Debug, Clone)]
pub struct Authenticator {
    enabled: bool,
    realm: String,
    accounts: HashMap<String, Account>,
}

impl Authenticator {
    #[must_use]
    pub fn from_config(cfg: &AuthConfig) -> Self {
        let mut accounts = HashMap::with_capacity(cfg.users.len());
        for user in &cfg.users {
            let Ok(password_sha256) = hex::decode(&user.password_sha256) else {
                tracing::warn!(user = %user.username, "Skipping account with malformed password digest");
                continue;
            };
            let roles = user
                .roles
                .iter()
                .filter_map(|r| {
                    r.parse::<Role>()
                        .inspect_err(|e| tracing::warn!(user = %user.username, "Skipping {e}"))
                        .ok()
                })
                .collect();
            accounts.insert(
                user.username.clone(),
                Account {
                    password_sha256,
                    roles,
                },
            );
        }

        if !cfg.enabled {
            tracing::warn!("Authentication is disabled, all flight routes are public");
        }

        Self {
            enabled: cfg.enabled,
            realm: cfg.realm.clone(),
            accounts,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Resolve an `Authorization` header to a principal.
    #[must_use]
    pub fn authenticate(&self, authorization: Option<&HeaderValue>) -> Option<Principal> {
        let (username, password) = decode_basic(authorization?)?;
        let account = self.accounts.get(&username)?;

        let digest = Sha256::digest(password.as_bytes());
        if !bool::from(digest.as_slice().ct_eq(&account.password_sha256)) {
            tracing::debug!(user = %username, "Password mismatch");
            return None;
        }

        Some(Principal {
            username,
            roles: account.roles.clone(),
        })
    }

    fn challenge(&self) -> Response {
        let mut resp = Problem::new(
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            "Valid credentials are required",
        )
        .into_response();
        if let Ok(value) = HeaderValue::from_str(&format!("Basic realm=\"{}\"", self.realm)) {
            resp.headers_mut().insert(header::WWW_AUTHENTICATE, value);
        }
        resp
    }
}

fn decode_basic(value: &HeaderValue) -> Option<(String, String)> {
    let raw = value.to_str().ok()?;
    let (scheme, encoded) = raw.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_owned(), pass.to_owned()))
}

/// Route-level middleware enforcing [`required_roles`].
pub async fn auth_middleware(
    State(auth): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Response {
    if !auth.enabled() {
        return next.run(req).await;
    }

    let path = req.extensions().get::<MatchedPath>().map_or_else(
        || req.uri().path().to_owned(),
        |m| m.as_str().to_owned(),
    );
    let principal = auth.authenticate(req.headers().get(header::AUTHORIZATION));

    match (required_roles(req.method(), &path), principal) {
        (None, principal) => {
            if let Some(p) = principal {
                req.extensions_mut().insert(p);
            }
            next.run(req).await
        }
        (Some(_), None) => {
            tracing::debug!(path = %path, "Rejecting unauthenticated request");
            auth.challenge()
        }
        (Some(roles), Some(p)) if p.has_any(roles) => {
            req.extensions_mut().insert(p);
            next.run(req).await
        }
        (Some(_), Some(p)) => {
            tracing::debug!(user = %p.username, path = %path, "Missing required role");
            Problem::new(
                StatusCode::FORBIDDEN,
                "Forbidden",
                "The authenticated user lacks the required role",
            )
            .into_response()
        }
    }
}
