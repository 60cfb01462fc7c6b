//! Round-robin HTTP load balancer library.
//!
//! Inbound requests are forwarded to one eligible backend from a fixed pool,
//! chosen in round-robin order. Per-server health checkers keep eligibility
//! current; the backend's `{"json": ...}` envelope is unwrapped before the
//! response reaches the client.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;

pub use config::LbConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
