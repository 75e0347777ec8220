//! Error types for ucpush-client.

/// Errors produced by remote calls.
///
/// `Transport` means the server could not be reached or refused the request;
/// `Response` means it answered with something unexpected. Callers report the
/// two differently so operators can tell them apart.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The connection failed or the server returned a non-success status.
    #[error("{operation} failed: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },

    /// The response body was malformed, or a JSON request body could not be built.
    #[error("unexpected response from {operation}: {message}")]
    Response {
        operation: &'static str,
        message: String,
    },

    /// Local files could not be packed for upload.
    #[error("cannot prepare upload for {operation}: {source}")]
    Payload {
        operation: &'static str,
        source: ucpush_util::UtilError,
    },
}

impl ClientError {
    /// Whether this error came from the network or an HTTP status.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
