//! Demo backend that echoes the request body inside a `{"json": ...}` envelope.
//!
//! ```text
//! cargo run --bin echo-backend -- --port 8081 --name server1
//! ```

use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method},
    routing::any,
    Json, Router,
};
use clap::Parser;
use serde_json::{json, Value};

#[derive(Parser, Debug)]
#[command(about = "Echo backend for the round-robin load balancer")]
struct Cli {
    /// Port on which to listen.
    #[arg(short, long, default_value_t = 8081)]
    port: u16,

    /// Name reported in every response.
    #[arg(short, long, default_value = "backend")]
    name: String,
}

async fn echo(
    State(name): State<String>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    let payload = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
    };

    let headers: BTreeMap<String, String> = headers
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
        .collect();

    Json(json!({
        "json": payload,
        "method": method.as_str(),
        "headers": headers,
        "server": name,
    }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "echo_backend=info".into()),
        )
        .init();

    let app = Router::new()
        .route("/", any(echo))
        .fallback(echo)
        .with_state(cli.name.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, name = %cli.name, "Echo backend listening");

    axum::serve(listener, app).await?;
    Ok(())
}
