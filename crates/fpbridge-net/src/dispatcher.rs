//! Single-flight dispatch of completed documents.
//!
//! The listener publishes into a [`PendingSlot`]; an external scheduler calls
//! [`Dispatcher::poll`] on a short interval. Each poll takes at most one
//! document and runs the handler to completion before returning, so
//! processing never overlaps. `poll` borrows the dispatcher mutably, which
//! rules out reentrant calls from inside the handler.

use std::sync::Arc;

use crossbeam_channel::Sender;
use log::{error, info};

use crate::slot::PendingSlot;
use crate::Document;

/// Processes one document per call.
pub trait DocumentHandler {
    /// Summary of a processed document, shown to the operator.
    type Report: std::fmt::Display;
    /// Failure that aborts the whole document.
    type Error: std::error::Error;

    /// Process `document` to completion.
    fn handle(&mut self, document: Document) -> Result<Self::Report, Self::Error>;
}

/// Operator-facing events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A document was processed.
    Completed { summary: String },
    /// Processing a document failed; the bridge stays ready for the next one.
    Failed { message: String },
    /// A pending document was overwritten by a newer one before it was taken.
    Dropped { dropped_total: u64 },
}

/// Result of one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// No document was pending.
    Idle,
    /// A document was processed successfully.
    Completed,
    /// A document was taken but the handler failed.
    Failed,
}

/// Bridges the background listener and a serial consumer.
pub struct Dispatcher<H> {
    slot: Arc<PendingSlot<Document>>,
    handler: H,
    notices: Sender<Notice>,
    processed: u64,
}

impl<H: DocumentHandler> Dispatcher<H> {
    /// Create a dispatcher draining `slot` into `handler`.
    pub fn new(slot: Arc<PendingSlot<Document>>, handler: H, notices: Sender<Notice>) -> Self {
        Self {
            slot,
            handler,
            notices,
            processed: 0,
        }
    }

    /// Check the ready signal and process the pending document, if any.
    ///
    /// Never blocks waiting for a document. Handler errors are logged and
    /// reported as [`Notice::Failed`]; they are not returned.
    pub fn poll(&mut self) -> PollOutcome {
        let Some(document) = self.slot.take() else {
            return PollOutcome::Idle;
        };

        self.processed += 1;
        match self.handler.handle(document) {
            Ok(report) => {
                let summary = report.to_string();
                info!("{}", summary);
                self.notices.send(Notice::Completed { summary }).ok();
                PollOutcome::Completed
            }
            Err(e) => {
                let message = error_chain(&e);
                error!("An unhandled error occurred: {}", message);
                self.notices.send(Notice::Failed { message }).ok();
                PollOutcome::Failed
            }
        }
    }

    /// Documents taken from the slot so far.
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// The shared pending slot.
    pub fn slot(&self) -> &Arc<PendingSlot<Document>> {
        &self.slot
    }

    /// Get the handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Get mutable access to the handler.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Consume the dispatcher, returning the handler.
    pub fn into_handler(self) -> H {
        self.handler
    }
}

/// Render an error with all of its sources, outermost first.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
