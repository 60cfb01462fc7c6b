//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     broadcast → HTTP server stops accepting, drains
//!               → health checkers leave their loops
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::{recv_shutdown, Shutdown};
