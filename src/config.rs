/// Transport requests as supplied by the configuration layer
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::time::Duration;

/// Environment variable holding the client certificate (path or PEM content)
pub const CLIENT_CERT_ENV: &str = "MCP_CLIENT_CERT_PATH";
/// Environment variable holding the client private key (path or PEM content)
pub const CLIENT_KEY_ENV: &str = "MCP_CLIENT_KEY_PATH";
/// Environment variable holding the passphrase of an encrypted client key
pub const CLIENT_KEY_PASSPHRASE_ENV: &str = "MCP_CLIENT_KEY_PASSPHRASE";
/// Environment variable holding the CA certificate (path or PEM content)
pub const CA_CERT_ENV: &str = "MCP_CA_CERT_PATH";

/// How long a network transport may take to connect when none is configured
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Declarative description of how to reach an MCP server
///
/// Supports three transport types:
/// - Stdio/subprocess: `transport_type: "stdio"`, `command: "npx"`, `args: ["@playwright/mcp"]`
/// - SSE: `transport_type: "sse"`, `url: "http://localhost:3000/sse"`
/// - Streamable HTTP: `transport_type: "http"`, `url: "https://example.com/mcp"`
///
/// The transport type is kept as the raw configured string; it is validated
/// when the transport is created.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportRequest {
    /// Transport type: "stdio", "sse" or "http" (plus their long-form aliases)
    pub transport_type: String,

    /// Command for stdio subprocess connections
    #[serde(default)]
    pub command: Option<String>,

    /// Arguments for stdio subprocess connections
    #[serde(default)]
    pub args: Option<Vec<String>>,

    /// Extra environment variables for the subprocess, applied last
    #[serde(default)]
    pub env: Option<HashMap<String, String>>,

    /// URL for SSE and streamable HTTP connections
    #[serde(default)]
    pub url: Option<String>,

    /// Headers for SSE and streamable HTTP connections
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,

    /// Client certificate for mTLS, a file path or PEM content
    #[serde(default)]
    pub client_cert: Option<String>,

    /// Client private key for mTLS, a file path or PEM content
    #[serde(default)]
    pub client_key: Option<String>,

    /// Passphrase for the client private key, if encrypted
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub client_key_passphrase: Option<SecretString>,

    /// CA certificate for validating the server, a file path or PEM content
    #[serde(default)]
    pub ca_cert: Option<String>,

    /// Connect timeout for SSE and streamable HTTP, in milliseconds
    #[serde(default)]
    pub connect_timeout_ms: Option<u64>,
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|s| SecretString::new(s.into_boxed_str())))
}

impl TransportRequest {
    /// Create a new stdio/subprocess request
    pub fn stdio(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            transport_type: "stdio".to_string(),
            command: Some(command.into()),
            args: Some(args),
            ..Default::default()
        }
    }

    /// Create a new SSE request
    pub fn sse(url: impl Into<String>) -> Self {
        Self {
            transport_type: "sse".to_string(),
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Create a new streamable HTTP request
    pub fn streamable_http(url: impl Into<String>) -> Self {
        Self {
            transport_type: "http".to_string(),
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Create a stdio request from a command line
    /// Example: "npx @playwright/mcp"
    pub fn from_command(command_str: &str) -> Self {
        let mut parts = command_str.split_whitespace().map(str::to_string);
        match parts.next() {
            Some(command) => Self::stdio(command, parts.collect()),
            None => Self {
                transport_type: "stdio".to_string(),
                ..Default::default()
            },
        }
    }

    /// Parse a request from its JSON form
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Set the client certificate and key used for mutual TLS
    pub fn with_client_identity(mut self, cert: impl Into<String>, key: impl Into<String>) -> Self {
        self.client_cert = Some(cert.into());
        self.client_key = Some(key.into());
        self
    }

    pub fn with_key_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.client_key_passphrase = Some(SecretString::new(passphrase.into().into_boxed_str()));
        self
    }

    pub fn with_ca_cert(mut self, ca: impl Into<String>) -> Self {
        self.ca_cert = Some(ca.into());
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = Some(timeout.as_millis().try_into().unwrap_or(u64::MAX));
        self
    }

    /// The configured connect timeout, or [`DEFAULT_CONNECT_TIMEOUT`]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT)
    }

    /// Fill unset TLS settings from the `MCP_CLIENT_CERT_PATH`, `MCP_CLIENT_KEY_PATH`,
    /// `MCP_CLIENT_KEY_PASSPHRASE` and `MCP_CA_CERT_PATH` environment variables.
    ///
    /// Call [`crate::load_env`] first to pick these up from a `.env` file.
    pub fn with_tls_from_env(self) -> Self {
        self.with_tls_from_lookup(|key| std::env::var(key).ok())
    }

    fn with_tls_from_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if self.client_cert.is_none() {
            self.client_cert = lookup(CLIENT_CERT_ENV);
        }
        if self.client_key.is_none() {
            self.client_key = lookup(CLIENT_KEY_ENV);
        }
        if self.client_key_passphrase.is_none() {
            self.client_key_passphrase =
                lookup(CLIENT_KEY_PASSPHRASE_ENV).map(|s| SecretString::new(s.into_boxed_str()));
        }
        if self.ca_cert.is_none() {
            self.ca_cert = lookup(CA_CERT_ENV);
        }
        self
    }
}
