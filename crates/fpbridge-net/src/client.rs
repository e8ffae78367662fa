//! Sending side of the bridge protocol.

use std::io::ErrorKind;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

use log::debug;

use crate::config::ClientConfig;
use crate::protocol::{split_utf8, CHECK_SERVER, MESSAGE_FINISHED, SERVER_RECEIVED};
use crate::{Error, Result};

/// Connected datagram socket talking to one bridge.
#[derive(Debug)]
pub struct Client {
    socket: UdpSocket,
    config: ClientConfig,
}

impl Client {
    /// Bind an ephemeral local socket and connect it to the bridge.
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let local = if config.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };
        let socket = UdpSocket::bind(local).map_err(|source| Error::Bind {
            addr: local,
            source,
        })?;
        socket.connect(config.server_addr)?;
        socket.set_read_timeout(Some(config.ack_timeout))?;

        Ok(Self { socket, config })
    }

    /// Address of the bridge.
    pub fn server_addr(&self) -> SocketAddr {
        self.config.server_addr
    }

    /// Send the liveness probe.
    ///
    /// Returns `false` when nothing answered within the acknowledgement timeout.
    pub fn check_server(&self) -> Result<bool> {
        self.socket.send(CHECK_SERVER)?;
        match self.await_ack() {
            Ok(()) => Ok(true),
            Err(Error::Timeout(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Send a complete document and wait for the acknowledgement.
    pub fn send_document(&self, document: &str) -> Result<()> {
        self.send_with_progress(document, |_, _| {})
    }

    /// Like [`Client::send_document`], reporting `(bytes_sent, total_bytes)` after each datagram.
    pub fn send_with_progress<F>(&self, document: &str, mut progress: F) -> Result<()>
    where
        F: FnMut(usize, usize),
    {
        let total = document.len();
        let mut sent = 0;

        for chunk in split_utf8(document, self.config.max_datagram_size) {
            self.socket.send(chunk.as_bytes())?;
            sent += chunk.len();
            progress(sent, total);
        }

        self.socket.send(MESSAGE_FINISHED)?;
        debug!("Sent {} bytes to {}", total, self.config.server_addr);
        self.await_ack()
    }

    fn await_ack(&self) -> Result<()> {
        let mut buffer = [0u8; 64];
        let len = match self.socket.recv(&mut buffer) {
            Ok(len) => len,
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                return Err(Error::Timeout(self.config.ack_timeout));
            }
            // No listener on the port; the ICMP error surfaces here on connected sockets.
            Err(e) if e.kind() == ErrorKind::ConnectionRefused => {
                return Err(Error::Timeout(self.config.ack_timeout));
            }
            Err(e) => return Err(e.into()),
        };

        let reply = &buffer[..len];
        if reply == SERVER_RECEIVED {
            Ok(())
        } else {
            Err(Error::UnexpectedReply(
                String::from_utf8_lossy(reply).into_owned(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_probe_without_server() {
        // Bind and immediately drop to get a port nobody listens on.
        let port = UdpSocket::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let config = ClientConfig::new(SocketAddr::from((Ipv4Addr::LOCALHOST, port)))
            .with_ack_timeout(Duration::from_millis(100));

        let client = Client::connect(config).unwrap();
        assert!(!client.check_server().unwrap());
    }

    #[test]
    fn test_unexpected_reply() {
        let server = UdpSocket::bind("127.0.0.1:0").unwrap();
        let config = ClientConfig::new(server.local_addr().unwrap())
            .with_ack_timeout(Duration::from_secs(2));
        let client = Client::connect(config).unwrap();

        let responder = std::thread::spawn(move || {
            let mut buffer = [0u8; 64];
            let (_, from) = server.recv_from(&mut buffer).unwrap();
            server.send_to(b"nope", from).unwrap();
        });

        let err = client.check_server().unwrap_err();
        responder.join().unwrap();
        assert!(matches!(err, Error::UnexpectedReply(reply) if reply == "nope"));
    }
}
