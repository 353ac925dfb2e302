//! MCP Transport - transport construction for Model Context Protocol clients
//!
//! Turns a declarative [`TransportRequest`] into a ready-to-use [`Channel`]:
//! a spawned stdio server, an SSE stream or a streamable HTTP connection,
//! all built on the official `rmcp` client transports.
//!
//! ## Features
//! - Executable resolution without a shell
//! - Subprocess environment assembly with captured stderr
//! - Mutual TLS from certificate files or inline PEM
//! - One outward error for every construction failure
//! - .env file support for TLS settings

/// Load environment variables from .env file
/// Call this in your main() function before reading TLS settings from the environment
pub fn load_env() {
    dotenv::dotenv().ok();
}

pub mod config;
pub mod error;
pub mod logging;
pub mod transport;

pub use config::TransportRequest;
pub use error::{Error, Result};
pub use transport::{Channel, TransportFactory, TransportKind, create_transport};

pub mod prelude {
    pub use crate::config::TransportRequest;
    pub use crate::error::{Error, Result};
    pub use crate::logging::{LogLevel, init_logging};
    pub use crate::transport::{Channel, TransportFactory, TransportKind, create_transport};
}
