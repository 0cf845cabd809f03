//! Error types for the client.
//!
//! - [`TransportError`]: a single frame could not be written or read.
//! - [`ExchangeError`]: a batch run was aborted, and at which order.

use std::fmt;
use std::io;
use std::time::Duration;

use rri_protocol::FrameError;

/// Which part of a frame was being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePart {
    /// The 4-byte length prefix.
    LengthPrefix,
    /// The payload following the prefix.
    Payload,
}

impl fmt::Display for FramePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramePart::LengthPrefix => write!(f, "length prefix"),
            FramePart::Payload => write!(f, "payload"),
        }
    }
}

/// Errors that can arise when moving one frame over the connection.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The stream failed or closed while writing a frame.
    #[error("writing frame failed")]
    Write {
        #[source]
        source: io::Error,
    },

    /// The stream closed or failed before the frame was complete.
    #[error("short read of {part}: expected {expected} bytes, obtained {obtained}")]
    ShortRead {
        part: FramePart,
        expected: usize,
        obtained: usize,
        #[source]
        source: Option<io::Error>,
    },

    /// The peer announced a frame above the configured limit.
    #[error("declared frame length {declared} exceeds limit of {max} bytes")]
    FrameTooLarge { declared: u32, max: u32 },

    /// The frame did not arrive completely before its deadline.
    #[error("no complete {part} within {after:?} (obtained {obtained} bytes)")]
    ReadTimeout {
        part: FramePart,
        after: Duration,
        obtained: usize,
    },

    /// The payload could not be framed at all.
    #[error(transparent)]
    Frame(#[from] FrameError),
}

impl TransportError {
    /// `true` if the peer closed the stream cleanly before sending any
    /// byte of a frame.
    pub fn is_peer_closed(&self) -> bool {
        matches!(
            self,
            TransportError::ShortRead {
                part: FramePart::LengthPrefix,
                obtained: 0,
                source: None,
                ..
            }
        )
    }
}

/// A batch run aborted at `position` (1-based).
///
/// Answers to the `delivered` orders before it were handed to the sink
/// and stay there.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// Sending the order failed; the peer may not have seen it.
    #[error("order {position}: sending failed")]
    Send {
        position: usize,
        delivered: usize,
        #[source]
        source: TransportError,
    },

    /// The order was sent, but its answer never arrived completely.
    #[error("order {position}: receiving answer failed")]
    Receive {
        position: usize,
        delivered: usize,
        #[source]
        source: TransportError,
    },

    /// The answer arrived but the sink refused it.
    #[error("order {position}: writing answer failed")]
    Sink {
        position: usize,
        delivered: usize,
        #[source]
        source: io::Error,
    },
}

impl ExchangeError {
    pub fn position(&self) -> usize {
        match self {
            ExchangeError::Send { position, .. }
            | ExchangeError::Receive { position, .. }
            | ExchangeError::Sink { position, .. } => *position,
        }
    }

    pub fn delivered(&self) -> usize {
        match self {
            ExchangeError::Send { delivered, .. }
            | ExchangeError::Receive { delivered, .. }
            | ExchangeError::Sink { delivered, .. } => *delivered,
        }
    }

    /// The underlying transport failure, if the sink was not to blame.
    pub fn transport(&self) -> Option<&TransportError> {
        match self {
            ExchangeError::Send { source, .. } | ExchangeError::Receive { source, .. } => {
                Some(source)
            }
            ExchangeError::Sink { .. } => None,
        }
    }
}
