/// Transport factory - turns a [`TransportRequest`] into a ready [`Channel`]
use super::channel::{Channel, TransportKind};
use super::credentials::{CredentialReader, FsCredentialReader};
use super::environment::EnvironmentSnapshot;
use super::http::{HttpTransportKind, build_http_channel};
use super::stdio::build_stdio_channel;
use crate::config::TransportRequest;
use crate::error::{Error, Result};
use std::sync::Arc;

/// Builds channels from transport requests
///
/// Holds no state between calls: every call resolves, loads and spawns from
/// scratch, and the returned channel is owned by the caller alone. Failures
/// from any step are reported as [`Error::TransportConstruction`] with the
/// underlying error as its cause.
#[derive(Clone)]
pub struct TransportFactory {
    reader: Arc<dyn CredentialReader>,
}

impl TransportFactory {
    /// Create a factory reading credentials from the filesystem
    pub fn new() -> Self {
        Self {
            reader: Arc::new(FsCredentialReader),
        }
    }

    /// Create a factory with a custom credential source
    pub fn with_reader(reader: impl CredentialReader + 'static) -> Self {
        Self {
            reader: Arc::new(reader),
        }
    }

    /// Create a channel, handing stdio servers the current process environment
    pub async fn create_transport(&self, request: &TransportRequest) -> Result<Channel> {
        self.create_transport_with_env(request, &EnvironmentSnapshot::capture())
            .await
    }

    /// Create a channel, handing stdio servers an environment built from `snapshot`
    pub async fn create_transport_with_env(
        &self,
        request: &TransportRequest,
        snapshot: &EnvironmentSnapshot,
    ) -> Result<Channel> {
        self.build(request, snapshot).await.map_err(|e| {
            tracing::warn!(transport_type = %request.transport_type, error = %e, "failed to create transport");
            Error::construction(e)
        })
    }

    async fn build(&self, request: &TransportRequest, snapshot: &EnvironmentSnapshot) -> Result<Channel> {
        let kind: TransportKind = request.transport_type.parse()?;
        tracing::debug!(%kind, "creating transport");

        match kind {
            TransportKind::Stdio => {
                let command = request
                    .command
                    .as_deref()
                    .filter(|c| !c.trim().is_empty())
                    .ok_or(Error::MissingCommand)?;
                let args = request.args.as_deref().unwrap_or_default();
                build_stdio_channel(command, args, request.env.as_ref(), snapshot)
            }
            TransportKind::Sse => {
                build_http_channel(HttpTransportKind::Sse, request, self.reader.as_ref()).await
            }
            TransportKind::StreamableHttp => {
                build_http_channel(HttpTransportKind::StreamableHttp, request, self.reader.as_ref()).await
            }
        }
    }
}

impl Default for TransportFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a channel for `request` with the default factory
pub async fn create_transport(request: &TransportRequest) -> Result<Channel> {
    TransportFactory::new().create_transport(request).await
}
