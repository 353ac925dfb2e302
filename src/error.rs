use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load client certificates: {path}: {source}")]
    CredentialLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("URL must be provided for SSE or HTTP transport types: {0}")]
    MissingUrl(String),

    #[error("Unsupported transport type: {0}")]
    UnsupportedTransport(String),

    #[error("Command must be provided for stdio transport type")]
    MissingCommand,

    #[error("Failed to spawn process '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Failed to create transport: {0}")]
    TransportConstruction(#[source] Box<Error>),
}

impl Error {
    /// Wrap an internal failure into the single outward construction error.
    /// Already-wrapped errors are returned as they are.
    pub fn construction(inner: Error) -> Self {
        match inner {
            Error::TransportConstruction(_) => inner,
            other => Error::TransportConstruction(Box::new(other)),
        }
    }

    /// The innermost failure behind a construction error.
    pub fn cause(&self) -> &Error {
        match self {
            Error::TransportConstruction(inner) => inner.cause(),
            other => other,
        }
    }

    pub fn is_credential_error(&self) -> bool {
        matches!(self.cause(), Error::CredentialLoad { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_wraps_once() {
        let err = Error::construction(Error::UnsupportedTransport("bogus".into()));
        let err = Error::construction(err);

        assert!(matches!(&err, Error::TransportConstruction(inner)
            if matches!(**inner, Error::UnsupportedTransport(_))));
        assert_eq!(
            err.to_string(),
            "Failed to create transport: Unsupported transport type: bogus"
        );
    }

    #[test]
    fn test_cause_exposes_inner_error() {
        let err = Error::construction(Error::CredentialLoad {
            path: "/missing/cert.pem".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        });

        assert!(err.is_credential_error());
        assert!(err.to_string().contains("/missing/cert.pem"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
