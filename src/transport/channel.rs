/// The channel handed back to callers, over the three rmcp client transports
use crate::error::Error;
use futures::future::BoxFuture;
use rmcp::RoleClient;
use rmcp::service::{RxJsonRpcMessage, TxJsonRpcMessage};
use rmcp::transport::{SseClientTransport, StreamableHttpClientTransport, TokioChildProcess, Transport};
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use tokio::process::ChildStderr;

/// The three transport types a channel can be built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// Subprocess speaking over stdin/stdout
    Stdio,
    /// Server-sent events stream plus POSTed messages
    Sse,
    /// Streamable HTTP
    StreamableHttp,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Stdio => "stdio",
            TransportKind::Sse => "sse",
            TransportKind::StreamableHttp => "streamable-http",
        }
    }

    pub fn is_network(&self) -> bool {
        !matches!(self, TransportKind::Stdio)
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdio" | "subprocess" => Ok(TransportKind::Stdio),
            "sse" | "event-stream" => Ok(TransportKind::Sse),
            "http" | "streamable-http" | "streamable_http" | "streaming-http" => {
                Ok(TransportKind::StreamableHttp)
            }
            _ => Err(Error::UnsupportedTransport(s.to_string())),
        }
    }
}

/// Error raised by an open channel while sending or closing
#[derive(Debug)]
pub struct ChannelError(Box<dyn std::error::Error + Send + Sync>);

impl ChannelError {
    fn new<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        Self(Box::new(err))
    }
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ChannelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&*self.0)
    }
}

/// A ready-to-use MCP client channel
///
/// Implements rmcp's [`Transport`] for the client role, so it can be served
/// directly, e.g. `().serve(channel).await`. Framing is left to the wrapped
/// rmcp transport.
pub enum Channel {
    /// Spawned subprocess; its stderr is captured rather than inherited
    Stdio {
        transport: TokioChildProcess,
        stderr: Option<ChildStderr>,
    },
    Sse(SseClientTransport<reqwest::Client>),
    StreamableHttp(StreamableHttpClientTransport<reqwest::Client>),
}

impl Channel {
    pub fn kind(&self) -> TransportKind {
        match self {
            Channel::Stdio { .. } => TransportKind::Stdio,
            Channel::Sse(_) => TransportKind::Sse,
            Channel::StreamableHttp(_) => TransportKind::StreamableHttp,
        }
    }

    /// Take the captured stderr of a stdio server, for collecting diagnostics
    ///
    /// Returns `None` for network channels or once the stream has been taken.
    pub fn take_stderr(&mut self) -> Option<ChildStderr> {
        match self {
            Channel::Stdio { stderr, .. } => stderr.take(),
            _ => None,
        }
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel").field("kind", &self.kind()).finish_non_exhaustive()
    }
}

fn send_boxed<T>(transport: &mut T, item: TxJsonRpcMessage<RoleClient>) -> BoxFuture<'static, Result<(), ChannelError>>
where
    T: Transport<RoleClient>,
{
    let send = Transport::<RoleClient>::send(transport, item);
    Box::pin(async move { send.await.map_err(ChannelError::new) })
}

async fn close_mapped<T>(transport: &mut T) -> Result<(), ChannelError>
where
    T: Transport<RoleClient>,
{
    Transport::<RoleClient>::close(transport)
        .await
        .map_err(ChannelError::new)
}

impl Transport<RoleClient> for Channel {
    type Error = ChannelError;

    fn send(
        &mut self,
        item: TxJsonRpcMessage<RoleClient>,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'static {
        match self {
            Channel::Stdio { transport, .. } => send_boxed(transport, item),
            Channel::Sse(transport) => send_boxed(transport, item),
            Channel::StreamableHttp(transport) => send_boxed(transport, item),
        }
    }

    fn receive(&mut self) -> impl Future<Output = Option<RxJsonRpcMessage<RoleClient>>> + Send {
        async move {
            match self {
                Channel::Stdio { transport, .. } => Transport::<RoleClient>::receive(transport).await,
                Channel::Sse(transport) => Transport::<RoleClient>::receive(transport).await,
                Channel::StreamableHttp(transport) => Transport::<RoleClient>::receive(transport).await,
            }
        }
    }

    fn close(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send {
        async move {
            tracing::debug!(kind = %self.kind(), "closing channel");
            match self {
                Channel::Stdio { transport, .. } => close_mapped(transport).await,
                Channel::Sse(transport) => close_mapped(transport).await,
                Channel::StreamableHttp(transport) => close_mapped(transport).await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_kind_parsing() {
        assert_eq!("stdio".parse::<TransportKind>().unwrap(), TransportKind::Stdio);
        assert_eq!("subprocess".parse::<TransportKind>().unwrap(), TransportKind::Stdio);
        assert_eq!("SSE".parse::<TransportKind>().unwrap(), TransportKind::Sse);
        assert_eq!("event-stream".parse::<TransportKind>().unwrap(), TransportKind::Sse);
        assert_eq!("http".parse::<TransportKind>().unwrap(), TransportKind::StreamableHttp);
        assert_eq!(
            "streaming-http".parse::<TransportKind>().unwrap(),
            TransportKind::StreamableHttp
        );
    }

    #[test]
    fn test_unknown_transport_kind_is_named() {
        let err = "bogus".parse::<TransportKind>().unwrap_err();
        assert!(matches!(&err, Error::UnsupportedTransport(kind) if kind == "bogus"));
        assert_eq!(err.to_string(), "Unsupported transport type: bogus");
    }

    #[test]
    fn test_transport_kind_network() {
        assert!(!TransportKind::Stdio.is_network());
        assert!(TransportKind::Sse.is_network());
        assert!(TransportKind::StreamableHttp.is_network());
    }
}
