use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;

use crate::api::rest::auth::{Authenticator, auth_middleware};
use crate::api::rest::handlers::{self, Service};

/// Flight routes relative to the mount point.
///
/// The role policy runs as a route layer so it sees the matched path and
/// never fires for unknown routes.
pub fn router(svc: Arc<Service>, auth: Arc<Authenticator>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_flights).post(handlers::create_flight),
        )
        .route(
            "/{id}",
            get(handlers::get_flight)
                .put(handlers::update_flight)
                .delete(handlers::delete_flight),
        )
        .route("/auth/roles", get(handlers::my_roles))
        .route_layer(from_fn_with_state(auth, auth_middleware))
        .with_state(svc)
}
