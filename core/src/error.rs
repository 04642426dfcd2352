use bytes::Bytes;
use http::StatusCode;
use std::fmt;
use thiserror::Error;

/// The error type for bridge operations
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: Option<StatusCode>,
    body: Option<Bytes>,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input could not be decoded under the declared encoding
    InvalidInputEncoding,

    /// A numeric argument was out of the accepted domain
    InvalidArgument,

    /// The key pair failed to produce a signature
    SigningFailed,

    /// The request method is not one of GET, POST, PATCH or DELETE
    UnsupportedMethod,

    /// Configuration error (malformed base URI, etc.)
    ConfigInvalid,

    /// Request cannot be assembled (bad url, header, etc.)
    RequestInvalid,

    /// The HTTP transport failed before a response was received
    Transport,

    /// The Bridge answered with a non-2xx status
    Api,

    /// Unexpected errors (unparsable responses, etc.)
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            body: None,
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message.
    ///
    /// For [`ErrorKind::Api`] this is the response body decoded as utf-8,
    /// invalid sequences replaced. Use [`Error::body`] for the exact bytes.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the raw response body of an [`ErrorKind::Api`] error.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Get the HTTP status of an [`ErrorKind::Api`] error.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Check if this error was raised before the request left the client
    pub fn is_request_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::SigningFailed
                | ErrorKind::UnsupportedMethod
                | ErrorKind::RequestInvalid
                | ErrorKind::ConfigInvalid
        )
    }
}

// Convenience constructors
impl Error {
    /// Create an invalid input encoding error
    pub fn invalid_input_encoding(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInputEncoding, message)
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Create a signing failed error
    pub fn signing_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SigningFailed, message)
    }

    /// Create an unsupported method error
    pub fn unsupported_method(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedMethod, message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create an API error, keeping the response status and the body as-is
    pub fn api(status: StatusCode, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        Self {
            status: Some(status),
            ..Self::new(ErrorKind::Api, String::from_utf8_lossy(&body))
        }
        .with_body(body)
    }

    fn with_body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidInputEncoding => write!(f, "invalid input encoding"),
            ErrorKind::InvalidArgument => write!(f, "invalid argument"),
            ErrorKind::SigningFailed => write!(f, "signing failed"),
            ErrorKind::UnsupportedMethod => write!(f, "unsupported method"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::Transport => write!(f, "transport error"),
            ErrorKind::Api => write!(f, "bridge api error"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
