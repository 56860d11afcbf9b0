use std::net::SocketAddr;

use axum::{http::HeaderValue, routing::get, Router};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::response::Envelope;
use crate::state::AppState;
use crate::{auth, thoughts};

const ENDPOINTS: &[(&str, &str)] = &[
    ("GET", "/"),
    ("POST", "/users/signup"),
    ("POST", "/users/login"),
    ("GET", "/thoughts"),
    ("GET", "/thoughts/like"),
    ("GET", "/thoughts/:id"),
    ("POST", "/thoughts"),
    ("PATCH", "/thoughts/:id"),
    ("POST", "/thoughts/:id/like"),
    ("DELETE", "/thoughts/:id"),
];

async fn list_endpoints() -> Envelope {
    let endpoints: Vec<_> = ENDPOINTS
        .iter()
        .map(|(method, path)| json!({ "method": method, "path": path }))
        .collect();
    Envelope::ok(
        endpoints,
        "Welcome to the happy thoughts API. Here is a list of all endpoints",
    )
}

fn cors_layer(state: &AppState) -> CorsLayer {
    match &state.config.cors_allowed_origins {
        Some(origins) => {
            let allowed: Vec<HeaderValue> =
                origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::permissive(),
    }
}

pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state);
    Router::new()
        .route("/", get(list_endpoints))
        .merge(auth::router())
        .merge(thoughts::router())
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, state: &AppState) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", state.config.host, state.config.port).parse()?;
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
