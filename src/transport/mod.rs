/// Transport construction for MCP clients
///
/// Supports three transport types:
/// - Stdio - spawn the server as a subprocess and talk over stdin/stdout
/// - SSE - server-sent events stream
/// - Streamable HTTP
///
/// The network transports share mutual TLS credential loading.

pub mod channel;
pub mod credentials;
pub mod environment;
pub mod executable;
pub mod factory;
pub mod http;
pub mod stdio;

pub use channel::{Channel, ChannelError, TransportKind};
pub use credentials::{CredentialBundle, CredentialReader, FsCredentialReader, load_credentials};
pub use environment::{EnvironmentMap, EnvironmentSnapshot, assemble_environment, default_environment};
pub use executable::{ResolvedExecutable, resolve_executable};
pub use factory::{TransportFactory, create_transport};
pub use http::{HttpRequestConfig, HttpTransportKind, build_http_channel, prepare_request_config};
pub use stdio::build_stdio_channel;
