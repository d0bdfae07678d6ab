#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use folio_core::domain_event::{DomainEvent, EventKind};
use folio_events::{
    DispatchContext, EventDispatcher, LogMailer, Subscriber, SubscriberError, SubscriberRegistry,
};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use folio_api::config::ServerConfig;
use folio_api::routes;
use folio_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        notify_address: "developers@folio.local".to_string(),
    }
}

/// Build the full application router with the production subscriber wiring
/// and a log-only mailer.
pub fn build_test_app(pool: PgPool) -> Router {
    let registry = folio_events::default_registry(Arc::new(LogMailer), "developers@folio.local");
    build_test_app_with(pool, registry, CancellationToken::new())
}

/// Build the full application router around `registry`.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app_with(
    pool: PgPool,
    registry: SubscriberRegistry,
    shutdown: CancellationToken,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
        dispatcher: Arc::new(EventDispatcher::new(Arc::new(registry))),
        shutdown,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Subscribers
// ---------------------------------------------------------------------------

/// Subscriber that remembers every event it is handed.
#[derive(Clone, Default)]
pub struct RecordingSubscriber {
    events: Arc<Mutex<Vec<DomainEvent>>>,
}

impl RecordingSubscriber {
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events().iter().map(DomainEvent::kind).collect()
    }
}

#[async_trait]
impl Subscriber for RecordingSubscriber {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn handle(
        &self,
        event: &DomainEvent,
        _ctx: &mut DispatchContext,
    ) -> Result<(), SubscriberError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Subscriber that always fails.
pub struct FailingSubscriber;

#[async_trait]
impl Subscriber for FailingSubscriber {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn handle(
        &self,
        _event: &DomainEvent,
        _ctx: &mut DispatchContext,
    ) -> Result<(), SubscriberError> {
        Err(SubscriberError::Failed("relay down".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, Body::empty()).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, Body::empty()).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Body::from(json.to_string())).await
}

pub async fn put_json(app: Router, uri: &str, json: serde_json::Value) -> Response {
    send(app, Method::PUT, uri, Body::from(json.to_string())).await
}

async fn send(app: Router, method: Method, uri: &str, body: Body) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
