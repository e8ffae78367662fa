//! Error types for the transport layer.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

/// Errors raised by the listener, the client and the reassembly protocol.
#[derive(Debug, Error)]
pub enum Error {
    /// The listening socket could not be bound. Fatal at startup.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// I/O error on an already bound socket.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No acknowledgement arrived in time.
    #[error("timed out after {0:?} waiting for the server acknowledgement")]
    Timeout(Duration),

    /// The server answered with something other than the acknowledgement.
    #[error("unexpected reply from server: {0:?}")]
    UnexpectedReply(String),

    /// The reassembled buffer is not a valid JSON document.
    #[error("malformed document ({source}): {raw}")]
    Malformed {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    /// The reassembled buffer grew past the configured limit.
    #[error("document of {size} bytes exceeds the {limit} byte limit")]
    DocumentTooLarge { size: usize, limit: usize },
}

impl Error {
    /// Whether this is a protocol-level error (bad document) rather than a transport failure.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Error::Malformed { .. } | Error::DocumentTooLarge { .. })
    }
}

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, Error>;
