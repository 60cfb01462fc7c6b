//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → [load balancer picks server]
//!     → request.rs (buffer body, build outbound copy)
//!     → [backend call, bounded by timeout]
//!     → response.rs (unwrap "json" envelope)
//!     → error.rs (503 / 500 on failure)
//!     → Send to client with X-Forwarded-Server
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod server;

pub use error::ProxyError;
pub use request::{X_FORWARDED_SERVER, X_REQUEST_ID};
pub use server::{build_router, AppState, HttpServer};
