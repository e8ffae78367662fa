//! The transport listener.
//!
//! Owns the datagram socket and a dedicated background thread that turns
//! datagrams into documents. Completed documents are published into the
//! shared [`PendingSlot`]; the thread never processes them itself.

use std::io::ErrorKind;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::Sender;
use log::{debug, error, info, warn};

use crate::config::ListenerConfig;
use crate::dispatcher::Notice;
use crate::protocol::{Reassembler, Step, SERVER_RECEIVED};
use crate::slot::PendingSlot;
use crate::{Document, Error, Result};

/// Handle to the running listener thread.
#[derive(Debug)]
pub struct Listener {
    local_addr: SocketAddr,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Listener {
    /// Bind the socket and start the receive loop.
    ///
    /// Bind failures are returned before any thread is spawned.
    pub fn start(
        config: &ListenerConfig,
        slot: Arc<PendingSlot<Document>>,
        notices: Sender<Notice>,
    ) -> Result<Self> {
        let socket = UdpSocket::bind(config.bind_addr).map_err(|source| Error::Bind {
            addr: config.bind_addr,
            source,
        })?;
        socket.set_read_timeout(Some(config.receive_timeout))?;
        let local_addr = socket.local_addr()?;

        let running = Arc::new(AtomicBool::new(true));
        let worker = ReceiveLoop {
            socket,
            running: Arc::clone(&running),
            reassembler: Reassembler::new(config.max_document_bytes),
            max_datagram_size: config.max_datagram_size,
            max_document_bytes: config.max_document_bytes,
            slot,
            notices,
        };

        let thread = std::thread::Builder::new()
            .name("fpbridge-listener".to_string())
            .spawn(move || worker.run())?;

        info!("Bridge listening at {}", local_addr);

        Ok(Self {
            local_addr,
            running,
            thread: Some(thread),
        })
    }

    /// Address the socket is actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Whether the receive loop is still running.
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the receive loop and wait for the thread to exit.
    ///
    /// Idempotent. An in-progress document is abandoned.
    pub fn stop(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };

        self.running.store(false, Ordering::Release);
        self.wake();

        if thread.join().is_err() {
            error!("Listener thread panicked");
        }
        info!("Bridge listener closed");
    }

    /// Send a zero-length datagram so a blocked receive returns immediately.
    fn wake(&self) {
        let target = match self.local_addr {
            SocketAddr::V4(addr) if addr.ip().is_unspecified() => {
                SocketAddr::from((Ipv4Addr::LOCALHOST, addr.port()))
            }
            SocketAddr::V6(addr) if addr.ip().is_unspecified() => {
                SocketAddr::from((Ipv6Addr::LOCALHOST, addr.port()))
            }
            addr => addr,
        };
        let local = if target.is_ipv4() {
            SocketAddr::from((Ipv4Addr::LOCALHOST, 0))
        } else {
            SocketAddr::from((Ipv6Addr::LOCALHOST, 0))
        };

        // Best effort; the receive timeout bounds the wait otherwise.
        if let Ok(socket) = UdpSocket::bind(local) {
            socket.send_to(&[], target).ok();
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.stop();
    }
}

struct ReceiveLoop {
    socket: UdpSocket,
    running: Arc<AtomicBool>,
    reassembler: Reassembler,
    max_datagram_size: usize,
    max_document_bytes: usize,
    slot: Arc<PendingSlot<Document>>,
    notices: Sender<Notice>,
}

impl ReceiveLoop {
    fn run(mut self) {
        let mut buffer = vec![0u8; self.max_datagram_size];

        while self.running.load(Ordering::Acquire) {
            let (len, sender) = match self.socket.recv_from(&mut buffer) {
                Ok(received) => received,
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => continue,
                Err(e) => {
                    if self.running.load(Ordering::Acquire) {
                        // e.g. ICMP port-unreachable surfacing as ConnectionReset on some platforms
                        warn!("Receive failed: {}", e);
                    }
                    continue;
                }
            };

            if !self.running.load(Ordering::Acquire) {
                break;
            }

            match self.reassembler.push(&buffer[..len]) {
                Step::Ignored | Step::Buffered => {}
                Step::Probe => {
                    debug!("Answering probe from {}", sender);
                    self.acknowledge(sender);
                }
                Step::Finished(raw) => self.complete(raw, sender),
                Step::TooLarge { size } => {
                    let err = Error::DocumentTooLarge {
                        size,
                        limit: self.max_document_bytes,
                    };
                    error!("Discarding document from {}: {}", sender, err);
                }
            }
        }
    }

    fn complete(&mut self, raw: Vec<u8>, sender: SocketAddr) {
        let document: Document = match serde_json::from_slice(&raw) {
            Ok(document) => document,
            Err(source) => {
                let err = Error::Malformed {
                    source,
                    raw: String::from_utf8_lossy(&raw).into_owned(),
                };
                error!("Discarding document from {}: {}", sender, err);
                return;
            }
        };

        info!("Received document ({} bytes) from {}", raw.len(), sender);
        if self.slot.publish(document).is_some() {
            let dropped_total = self.slot.stats().dropped;
            warn!(
                "Pending document overwritten before it was processed ({} dropped so far)",
                dropped_total
            );
            self.notices.send(Notice::Dropped { dropped_total }).ok();
        }

        self.acknowledge(sender);
    }

    fn acknowledge(&self, target: SocketAddr) {
        if let Err(e) = self.socket.send_to(SERVER_RECEIVED, target) {
            warn!("Failed to acknowledge {}: {}", target, e);
        }
    }
}
