//! Listener and dispatcher bundled behind one handle.

use std::net::SocketAddr;
use std::sync::Arc;

use crossbeam_channel::Receiver;

use crate::config::ListenerConfig;
use crate::dispatcher::{Dispatcher, DocumentHandler, Notice, PollOutcome};
use crate::listener::Listener;
use crate::slot::{PendingSlot, SlotStats};
use crate::Result;

/// A running bridge: background listener plus a foreground dispatcher.
///
/// The owner drives processing by calling [`Server::poll`] periodically,
/// typically from a fixed-interval timer on the host's main thread.
pub struct Server<H> {
    listener: Listener,
    dispatcher: Dispatcher<H>,
    notices: Receiver<Notice>,
}

impl<H: DocumentHandler> Server<H> {
    /// Bind the listener and prepare the dispatcher.
    pub fn start(config: &ListenerConfig, handler: H) -> Result<Self> {
        let slot = Arc::new(PendingSlot::new());
        let (tx, rx) = crossbeam_channel::unbounded();
        let listener = Listener::start(config, Arc::clone(&slot), tx.clone())?;
        let dispatcher = Dispatcher::new(slot, handler, tx);

        Ok(Self {
            listener,
            dispatcher,
            notices: rx,
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr()
    }

    /// Process the pending document, if any.
    pub fn poll(&mut self) -> PollOutcome {
        self.dispatcher.poll()
    }

    /// Operator notices from both threads.
    pub fn notices(&self) -> &Receiver<Notice> {
        &self.notices
    }

    /// Collect every notice emitted so far.
    pub fn drain_notices(&self) -> Vec<Notice> {
        self.notices.try_iter().collect()
    }

    /// Slot counters.
    pub fn stats(&self) -> SlotStats {
        self.dispatcher.slot().stats()
    }

    /// Get the handler.
    pub fn handler(&self) -> &H {
        self.dispatcher.handler()
    }

    /// Stop listening and hand back the handler.
    ///
    /// A document that is pending but not yet polled is discarded.
    pub fn stop(mut self) -> H {
        self.listener.stop();
        self.dispatcher.into_handler()
    }
}
