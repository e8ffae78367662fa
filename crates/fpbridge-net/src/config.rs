//! Listener and client configuration.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::protocol::{DEFAULT_PORT, MAX_DATAGRAM_SIZE};

/// Default cap on a single reassembled document.
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 64 * 1024 * 1024;

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Address the datagram socket is bound to.
    pub bind_addr: SocketAddr,
    /// Receive buffer size; longer datagrams are truncated by the OS.
    pub max_datagram_size: usize,
    /// Bounded wait of each receive call, so the stop flag is observed.
    pub receive_timeout: Duration,
    /// Documents larger than this are discarded.
    pub max_document_bytes: usize,
}

impl ListenerConfig {
    /// Listen on the loopback interface at `port`.
    pub fn loopback(port: u16) -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, port)),
            ..Self::default()
        }
    }

    /// Set the bind address.
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the receive timeout.
    pub fn with_receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = timeout;
        self
    }

    /// Set the document size limit.
    pub fn with_max_document_bytes(mut self, limit: usize) -> Self {
        self.max_document_bytes = limit;
        self
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            max_datagram_size: MAX_DATAGRAM_SIZE,
            receive_timeout: Duration::from_secs(1),
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}

/// Sender-side configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Address of the bridge.
    pub server_addr: SocketAddr,
    /// How long to wait for `FPServerReceived`.
    pub ack_timeout: Duration,
    /// Largest datagram the client emits.
    pub max_datagram_size: usize,
}

impl ClientConfig {
    /// Target the bridge at `addr`.
    pub fn new(server_addr: SocketAddr) -> Self {
        Self {
            server_addr,
            ..Self::default()
        }
    }

    /// Set the acknowledgement timeout.
    pub fn with_ack_timeout(mut self, timeout: Duration) -> Self {
        self.ack_timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            ack_timeout: Duration::from_secs(5),
            max_datagram_size: MAX_DATAGRAM_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ListenerConfig::default();
        assert_eq!(config.bind_addr.port(), 24280);
        assert!(config.bind_addr.ip().is_loopback());
        assert_eq!(config.max_datagram_size, 4096);
        assert_eq!(config.receive_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_loopback_any_port() {
        let config = ListenerConfig::loopback(0);
        assert_eq!(config.bind_addr.port(), 0);
        assert_eq!(config.max_document_bytes, DEFAULT_MAX_DOCUMENT_BYTES);
    }
}
