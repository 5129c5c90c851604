//! demos/dev_backend.rs
//! Run: cargo run --example dev_backend -- <port> [status]
//!
//! Standalone health backend for demoing the probe. Pass a status other
//! than "ok" (or set HEALTH_STATUS) to see the disconnected indicator.

use std::net::SocketAddr;

use status_probe::server::start_health_backend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "8000".into())
        .parse()?;
    let status = std::env::args()
        .nth(2)
        .or_else(|| std::env::var("HEALTH_STATUS").ok())
        .unwrap_or_else(|| "ok".to_string());

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let addr = start_health_backend(addr, "/api/health".to_string(), status.clone()).await?;

    println!("Health backend on http://{}/api/health  [status={}]", addr, status);

    tokio::signal::ctrl_c().await?;
    Ok(())
}
