//! Transport-level failures of a streaming request.
//!
//! Every variant ends the session it occurs in. None of them are retried
//! by the streaming core.

use thiserror::Error;

use crate::traits::HttpError;

/// Why a chat response could not be (fully) read.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// Endpoint answered with a non-2xx status.
    #[error("chat endpoint returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Endpoint answered successfully but sent no body to read.
    #[error("chat endpoint returned no response body")]
    MissingBody,

    /// Request could not be sent, or the connection dropped mid-read.
    #[error("network error: {0}")]
    Network(#[from] HttpError),

    /// The read was aborted from outside (watchdog, Ctrl-C).
    #[error("stream aborted")]
    Aborted,
}

impl TransportError {
    /// Short stable code for logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            TransportError::Status { .. } => "TRANSPORT_STATUS",
            TransportError::MissingBody => "TRANSPORT_NO_BODY",
            TransportError::Network(_) => "TRANSPORT_NETWORK",
            TransportError::Aborted => "TRANSPORT_ABORTED",
        }
    }

    /// True when the endpoint itself reported the failure.
    pub fn is_server_side(&self) -> bool {
        matches!(
            self,
            TransportError::Status { .. } | TransportError::MissingBody
        )
    }
}
