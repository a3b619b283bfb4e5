use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{OriginalUri, Path, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use flights_sdk::QueryParams;
use futures::StreamExt;
use tracing::info;
use uuid::Uuid;

use crate::api::rest::auth::{Principal, Role};
use crate::api::rest::dto::{FlightDto, FlightReq};
use crate::api::rest::error::{ApiError, ApiResult};
use crate::api::rest::hateoas::LinkBuilder;
use crate::api::rest::problem::Problem;
use crate::domain::service::FlightsService;
use crate::infra::storage::FlightsSeaRepo;

pub type Service = FlightsService<FlightsSeaRepo>;

/// Minimal length of a usable `If-Match` value: a quoted version digit.
const MIN_IF_MATCH_LEN: usize = 3;

fn etag(version: i32) -> String {
    format!("\"{version}\"")
}

/// Collect the query string into a multi-valued map.
#[must_use]
pub fn parse_query(query: Option<&str>) -> QueryParams {
    let mut params = QueryParams::new();
    for (k, v) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
        params.entry(k.into_owned()).or_default().push(v.into_owned());
    }
    params
}

fn wants_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/event-stream"))
}

/// The version from `If-Match`, without surrounding quotes.
fn if_match_version(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::IF_MATCH)?.to_str().ok()?;
    if raw.len() < MIN_IF_MATCH_LEN {
        return None;
    }
    let unquoted = raw
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(raw);
    Some(unquoted.to_owned())
}

/// Whether `If-None-Match` names `tag`, using weak comparison.
fn if_none_match_hits(headers: &HeaderMap, tag: &str) -> bool {
    headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .any(|candidate| {
            candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == tag
        })
}

fn malformed_body(rejection: &JsonRejection, instance: &str) -> Response {
    tracing::debug!(error = %rejection, "Rejecting request body");
    Problem::new(StatusCode::BAD_REQUEST, "Bad Request", rejection.body_text())
        .with_code("FLIGHT_MALFORMED_BODY")
        .with_instance(instance)
        .into_response()
}

#[tracing::instrument(skip_all, fields(path = %uri.path()))]
pub async fn list_flights(
    State(svc): State<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> ApiResult {
    let links = LinkBuilder::for_collection(uri.path());

    if wants_event_stream(&headers) {
        info!("Streaming all flights");
        return Ok(stream_flights(&svc, links));
    }

    let params = parse_query(uri.query());
    let flights = svc
        .find(&params)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;

    if flights.is_empty() {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let body: Vec<FlightDto> = flights
        .into_iter()
        .map(|f| {
            let entry_links = links.list_entry_links(f.id);
            FlightDto::new(f, entry_links)
        })
        .collect();
    Ok(Json(body).into_response())
}

fn stream_flights(svc: &Service, links: LinkBuilder) -> Response {
    let events = svc.stream_all().map(move |item| {
        let flight = item.map_err(|e| {
            tracing::error!(error = ?e, "Flight stream aborted");
            axum::Error::new(e)
        })?;
        let id = flight.id;
        Event::default()
            .id(id.to_string())
            .json_data(FlightDto::new(flight, links.list_entry_links(id)))
    });
    Sse::new(events)
        .keep_alive(KeepAlive::default())
        .into_response()
}

#[tracing::instrument(skip_all, fields(flight_id = %id))]
pub async fn get_flight(
    State(svc): State<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let Ok(id) = Uuid::parse_str(&id) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let Some(flight) = svc
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?
    else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let tag = etag(flight.version);
    if if_none_match_hits(&headers, &tag) {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, tag)]).into_response());
    }

    let links = LinkBuilder::for_item(uri.path()).item_links(id);
    Ok(([(header::ETAG, tag)], Json(FlightDto::new(flight, links))).into_response())
}

#[tracing::instrument(skip_all)]
pub async fn create_flight(
    State(svc): State<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
    body: Result<Json<FlightReq>, JsonRejection>,
) -> ApiResult {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return Ok(malformed_body(&rejection, uri.path())),
    };

    let flight = svc
        .create(req.into())
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;

    let links = LinkBuilder::for_collection(uri.path());
    let id = flight.id;
    let location = links.item_href(id);
    let tag = etag(flight.version);
    let dto = FlightDto::new(flight, links.item_links(id));
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location), (header::ETAG, tag)],
        Json(dto),
    )
        .into_response())
}

#[tracing::instrument(skip_all, fields(flight_id = %id))]
pub async fn update_flight(
    State(svc): State<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<FlightReq>, JsonRejection>,
) -> ApiResult {
    let Some(version) = if_match_version(&headers) else {
        return Ok(Problem::new(
            StatusCode::PRECONDITION_FAILED,
            "Precondition Failed",
            "An If-Match header with the current version is required",
        )
        .with_code("FLIGHT_VERSION_REQUIRED")
        .with_instance(uri.path())
        .into_response());
    };

    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return Ok(malformed_body(&rejection, uri.path())),
    };

    let Ok(id) = Uuid::parse_str(&id) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let updated = svc
        .update(id, &version, req.into())
        .await
        .map_err(|e| ApiError::new(e, uri.path()))?;

    Ok((StatusCode::NO_CONTENT, [(header::ETAG, etag(updated.version))]).into_response())
}

#[tracing::instrument(skip_all, fields(flight_id = %id))]
pub async fn delete_flight(
    State(svc): State<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> ApiResult {
    if let Ok(id) = Uuid::parse_str(&id) {
        let outcome = svc
            .delete_by_id(id)
            .await
            .map_err(|e| ApiError::new(e, uri.path()))?;
        info!(deleted = outcome.deleted_count, "Flight delete handled");
    }
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Roles of the authenticated caller.
#[allow(clippy::unused_async)]
pub async fn my_roles(req: Request) -> Response {
    match req.extensions().get::<Principal>() {
        Some(p) => {
            let roles: Vec<&'static str> = p.roles.iter().copied().map(Role::as_str).collect();
            Json(roles).into_response()
        }
        None => StatusCode::UNAUTHORIZED.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn query_keeps_repeated_values() {
        let params = parse_query(Some("airline=Easy%20Jet&gate=4&gate=5&x"));
        assert_eq!(params["airline"], vec!["Easy Jet"]);
        assert_eq!(params["gate"], vec!["4", "5"]);
        assert_eq!(params["x"], vec![""]);
        assert!(parse_query(None).is_empty());
    }

    #[test]
    fn if_match_needs_quoted_version() {
        let mut headers = HeaderMap::new();
        assert_eq!(if_match_version(&headers), None);

        headers.insert(header::IF_MATCH, HeaderValue::from_static("\"\""));
        assert_eq!(if_match_version(&headers), None);

        headers.insert(header::IF_MATCH, HeaderValue::from_static("\"0\""));
        assert_eq!(if_match_version(&headers).as_deref(), Some("0"));

        headers.insert(header::IF_MATCH, HeaderValue::from_static("\"abc\""));
        assert_eq!(if_match_version(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn if_none_match_accepts_lists_weak_tags_and_wildcard() {
        let mut headers = HeaderMap::new();
        assert!(!if_none_match_hits(&headers, "\"1\""));

        headers.insert(header::IF_NONE_MATCH, HeaderValue::from_static("\"0\", W/\"1\""));
        assert!(if_none_match_hits(&headers, "\"1\""));
        assert!(if_none_match_hits(&headers, "\"0\""));
        assert!(!if_none_match_hits(&headers, "\"2\""));

        headers.insert(header::IF_NONE_MATCH, HeaderValue::from_static("*"));
        assert!(if_none_match_hits(&headers, "\"7\""));

        headers.insert(header::IF_NONE_MATCH, HeaderValue::from_static("\"10\""));
        assert!(!if_none_match_hits(&headers, "\"1\""));
    }

    #[test]
    fn event_stream_detection() {
        let mut headers = HeaderMap::new();
        assert!(!wants_event_stream(&headers));
        headers.insert(header::ACCEPT, HeaderValue::from_static("text/event-stream"));
        assert!(wants_event_stream(&headers));
    }
}
