// src/server/backend.rs
// Minimal backend for local development and tests: answers the health
// path and nothing else.
use anyhow::Result;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use serde_json::json;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

async fn handle(
    req: Request<Body>,
    health_path: Arc<String>,
    status: Arc<String>,
) -> Result<Response<Body>, Infallible> {
    let (code, body) = if req.method() == Method::GET && req.uri().path() == health_path.as_str() {
        (StatusCode::OK, json!({ "status": &*status }))
    } else {
        (StatusCode::NOT_FOUND, json!({ "detail": "Not Found" }))
    };

    Ok(Response::builder()
        .status(code)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap())
}

/// Bind the health backend and serve it on a spawned task.
///
/// Returns the bound address, so callers may pass port 0 and probe
/// whatever the OS handed out.
pub async fn start_health_backend(
    addr: SocketAddr,
    health_path: String,
    status: String,
) -> Result<SocketAddr> {
    let health_path = Arc::new(health_path);
    let status = Arc::new(status);

    let make_service = make_service_fn(move |_| {
        let health_path = health_path.clone();
        let status = status.clone();

        async move {
            Ok::<_, Infallible>(service_fn(move |req| {
                handle(req, health_path.clone(), status.clone())
            }))
        }
    });

    let server = Server::try_bind(&addr)?.serve(make_service);
    let local_addr = server.local_addr();

    info!("Health backend listening on http://{}", local_addr);

    tokio::spawn(async move {
        if let Err(e) = server.await {
            error!("Health backend error: {}", e);
        }
    });

    Ok(local_addr)
}
