use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware,
    routing::get,
    Json, Router,
};
use service::user_service::UserService;
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, BoxError, ServiceBuilder};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

use common::types::Health;

pub mod users;

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
}

/// Knobs for the middleware stack wrapped around every route.
#[derive(Clone, Debug)]
pub struct RouterOptions {
    pub request_timeout: Duration,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self { request_timeout: Duration::from_secs(60) }
    }
}

pub async fn home() -> String {
    chrono::Local::now().to_string()
}

pub async fn health() -> Json<Health> {
    Json(Health::OK)
}

/// Errors raised by middleware rather than handlers. A request that runs
/// past the configured timeout answers `504 Gateway Timeout` with no body.
pub async fn handle_middleware_error(err: BoxError) -> StatusCode {
    if err.is::<Elapsed>() {
        tracing::warn!("request timed out");
        StatusCode::GATEWAY_TIMEOUT
    } else {
        tracing::error!(error = %err, "unhandled middleware error");
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Client address as reported by a fronting proxy, if any.
///
/// Checks `True-Client-IP`, then `X-Real-IP`, then the first hop of
/// `X-Forwarded-For`.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };
    header("true-client-ip")
        .or_else(|| header("x-real-ip"))
        .or_else(|| header("x-forwarded-for").and_then(|v| v.split(',').next()).map(str::trim))
        .map(str::to_string)
}

fn make_span(req: &Request) -> Span {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    let client_ip = client_ip(req.headers()).unwrap_or_else(|| "-".to_string());
    tracing::info_span!(
        "request",
        method = %req.method(),
        uri = %req.uri(),
        request_id = %request_id,
        client_ip = %client_ip,
    )
}

/// Build the full application router: diagnostics plus the users API.
pub fn build_router(state: AppState, opts: RouterOptions) -> Router {
    // Routes that address one user run identifier resolution first
    let by_id = Router::new()
        .route(
            "/api/v1/users/:id",
            get(users::get_user).patch(users::update_user).delete(users::delete_user),
        )
        .route(
            "/api/v1/users/:id/",
            get(users::get_user).patch(users::update_user).delete(users::delete_user),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), users::resolve_user));

    let collection = Router::new()
        .route("/api/v1/users", get(users::search_users).post(users::create_user))
        .route("/api/v1/users/", get(users::search_users).post(users::create_user));

    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .merge(collection)
        .merge(by_id)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(make_span)
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .include_headers(false),
                        )
                        .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
                )
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CatchPanicLayer::new())
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(opts.request_timeout))
                .layer(CorsLayer::very_permissive()),
        )
}
