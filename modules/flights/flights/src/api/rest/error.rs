use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::api::rest::dto::ViolationDto;
use crate::api::rest::problem::Problem;
use crate::domain::error::DomainError;

/// A domain failure bound to the request path it occurred on.
#[derive(Debug)]
pub struct ApiError {
    error: DomainError,
    instance: String,
}

impl ApiError {
    pub fn new(error: DomainError, instance: impl Into<String>) -> Self {
        Self {
            error,
            instance: instance.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        domain_error_to_response(&self.error, &self.instance)
    }
}

pub type ApiResult<T = Response> = Result<T, ApiError>;

/// Map a domain error to its HTTP response.
///
/// Violations are returned as a bare JSON array and a missing flight as an
/// empty 404; everything else is an RFC 9457 problem.
pub fn domain_error_to_response(e: &DomainError, instance: &str) -> Response {
    let trace_id = tracing::Span::current()
        .id()
        .map(|id| id.into_u64().to_string());

    match e {
        DomainError::Validation { violations } => {
            let body: Vec<ViolationDto> = violations.iter().map(Into::into).collect();
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        }
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND.into_response(),
        DomainError::InvalidVersion { version } => Problem::new(
            StatusCode::PRECONDITION_FAILED,
            "Precondition Failed",
            format!("Version '{version}' is not a valid version number"),
        )
        .with_code("FLIGHT_INVALID_VERSION")
        .with_instance(instance)
        .with_trace_id(trace_id)
        .into_response(),
        DomainError::VersionConflict { expected, .. } => Problem::new(
            StatusCode::PRECONDITION_FAILED,
            "Precondition Failed",
            format!("Version {expected} is outdated"),
        )
        .with_code("FLIGHT_VERSION_CONFLICT")
        .with_instance(instance)
        .with_trace_id(trace_id)
        .into_response(),
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "An internal database error occurred",
            )
            .with_code("FLIGHT_INTERNAL_DATABASE")
            .with_instance(instance)
            .with_trace_id(trace_id)
            .into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use flights_sdk::Violation;
    use uuid::Uuid;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn violations_become_plain_array() {
        let e = DomainError::validation(vec![Violation::new("gate", "must be greater than 0")]);
        let resp = domain_error_to_response(&e, "/flights");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(resp).await,
            serde_json::json!([{ "property": "gate", "message": "must be greater than 0" }])
        );
    }

    #[tokio::test]
    async fn version_failures_are_412_problems() {
        let resp = domain_error_to_response(&DomainError::invalid_version("abc"), "/x");
        assert_eq!(resp.status(), StatusCode::PRECONDITION_FAILED);
        let v = body_json(resp).await;
        assert_eq!(v["code"], "FLIGHT_INVALID_VERSION");
        assert_eq!(v["instance"], "/x");

        let resp =
            domain_error_to_response(&DomainError::version_conflict(Uuid::nil(), 3), "/x");
        assert_eq!(resp.status(), StatusCode::PRECONDITION_FAILED);
        assert_eq!(body_json(resp).await["code"], "FLIGHT_VERSION_CONFLICT");
    }

    #[tokio::test]
    async fn not_found_has_empty_body() {
        let resp = domain_error_to_response(&DomainError::not_found(Uuid::nil()), "/x");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn database_details_stay_internal() {
        let resp = domain_error_to_response(&DomainError::database("secret dsn"), "/x");
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let v = body_json(resp).await;
        assert!(!v.to_string().contains("secret dsn"));
    }
}
