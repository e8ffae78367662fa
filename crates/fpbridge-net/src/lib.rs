//! Datagram transport for the asset-import bridge.
//!
//! The exporter streams a JSON request document to the bridge as a sequence
//! of UDP datagrams on the loopback interface. This crate provides:
//!
//! - [`protocol`] - sentinel payloads and the [`Reassembler`]
//! - [`Listener`] - background receive loop publishing into a [`PendingSlot`]
//! - [`Dispatcher`] - single-flight consumer driven by periodic polling
//! - [`Server`] - listener and dispatcher wired together
//! - [`Client`] - the sending side, used by tooling and tests
//!
//! # Example
//!
//! ```no_run
//! use fpbridge_net::{ListenerConfig, PendingSlot, Listener};
//! use std::sync::Arc;
//!
//! let slot = Arc::new(PendingSlot::new());
//! let (tx, _rx) = crossbeam_channel::unbounded();
//! let listener = Listener::start(&ListenerConfig::default(), slot.clone(), tx)?;
//! println!("listening at {}", listener.local_addr());
//! # Ok::<(), fpbridge_net::Error>(())
//! ```

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod listener;
pub mod protocol;
pub mod server;
pub mod slot;

pub use client::Client;
pub use config::{ClientConfig, ListenerConfig, DEFAULT_MAX_DOCUMENT_BYTES};
pub use dispatcher::{error_chain, Dispatcher, DocumentHandler, Notice, PollOutcome};
pub use error::{Error, Result};
pub use listener::Listener;
pub use protocol::{Reassembler, Step, DEFAULT_PORT, MAX_DATAGRAM_SIZE};
pub use server::Server;
pub use slot::{PendingSlot, SlotStats};

/// A reassembled, parsed request document.
pub type Document = serde_json::Value;
