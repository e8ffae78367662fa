//! Wire protocol: sentinel payloads and document reassembly.
//!
//! A request document is sent as any number of UTF-8 text datagrams followed
//! by the [`MESSAGE_FINISHED`] sentinel. A [`CHECK_SERVER`] probe may arrive
//! at any point and is answered without touching the buffer.

/// Liveness probe sent by the exporter.
pub const CHECK_SERVER: &[u8] = b"FPClientCheckServer";

/// Marks the end of the current document.
pub const MESSAGE_FINISHED: &[u8] = b"FPClientMessageFinished";

/// Acknowledgement sent back for probes and completed documents.
pub const SERVER_RECEIVED: &[u8] = b"FPServerReceived";

/// Maximum size of a single datagram.
pub const MAX_DATAGRAM_SIZE: usize = 4096;

/// Port the bridge listens on.
pub const DEFAULT_PORT: u16 = 24280;

/// Classification of one received datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Datagram<'a> {
    /// Zero-length payload. Carries no data.
    Empty,
    /// [`CHECK_SERVER`] probe.
    CheckServer,
    /// [`MESSAGE_FINISHED`] sentinel.
    MessageFinished,
    /// A document fragment.
    Payload(&'a [u8]),
}

impl<'a> Datagram<'a> {
    /// Classify raw datagram bytes.
    pub fn classify(bytes: &'a [u8]) -> Self {
        if bytes.is_empty() {
            Datagram::Empty
        } else if bytes == CHECK_SERVER {
            Datagram::CheckServer
        } else if bytes == MESSAGE_FINISHED {
            Datagram::MessageFinished
        } else {
            Datagram::Payload(bytes)
        }
    }
}

/// What the listener has to do after feeding one datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Nothing to do.
    Ignored,
    /// Answer the probe; the buffer is untouched.
    Probe,
    /// Fragment appended to the buffer.
    Buffered,
    /// The document is complete; the raw concatenated bytes are returned and the buffer is reset.
    Finished(Vec<u8>),
    /// The document exceeded the size limit and was discarded.
    TooLarge { size: usize },
}

/// Accumulates document fragments between two `MessageFinished` sentinels.
#[derive(Debug)]
pub struct Reassembler {
    buffer: Vec<u8>,
    limit: usize,
    /// Bytes received past the limit; non-zero means the current document is being discarded.
    overflow: usize,
}

impl Reassembler {
    /// Create a reassembler that rejects documents larger than `limit` bytes.
    pub fn new(limit: usize) -> Self {
        Self {
            buffer: Vec::new(),
            limit,
            overflow: 0,
        }
    }

    /// Feed one datagram.
    pub fn push(&mut self, datagram: &[u8]) -> Step {
        match Datagram::classify(datagram) {
            Datagram::Empty => Step::Ignored,
            Datagram::CheckServer => Step::Probe,
            Datagram::MessageFinished => {
                if self.overflow > 0 {
                    let size = self.overflow;
                    self.reset();
                    Step::TooLarge { size }
                } else {
                    Step::Finished(std::mem::take(&mut self.buffer))
                }
            }
            Datagram::Payload(bytes) => {
                if self.overflow > 0 {
                    self.overflow += bytes.len();
                } else if self.buffer.len() + bytes.len() > self.limit {
                    self.overflow = self.buffer.len() + bytes.len();
                    self.buffer = Vec::new();
                } else {
                    self.buffer.extend_from_slice(bytes);
                }
                Step::Buffered
            }
        }
    }

    /// Bytes buffered for the in-progress document.
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    /// Whether no document is in progress.
    pub fn is_idle(&self) -> bool {
        self.buffer.is_empty() && self.overflow == 0
    }

    /// Abandon the in-progress document.
    pub fn reset(&mut self) {
        self.buffer = Vec::new();
        self.overflow = 0;
    }
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::new(usize::MAX)
    }
}

/// Split `text` into chunks of at most `max` bytes without cutting a UTF-8 sequence.
///
/// `max` must be at least 4 so every code point fits into one chunk.
pub fn split_utf8(text: &str, max: usize) -> Vec<&str> {
    let max = max.max(4);
    let mut chunks = Vec::with_capacity(text.len() / max + 1);
    let mut rest = text;
    while !rest.is_empty() {
        let mut end = rest.len().min(max);
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        let (chunk, tail) = rest.split_at(end);
        chunks.push(chunk);
        rest = tail;
    }
    chunks
}
