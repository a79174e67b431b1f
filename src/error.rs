//! Typed error taxonomy for both protocol roles.
//!
//! The reference implementation folds every failure into a zero return
//! value. This port widens that into `ReceiveError`/`SendError`, built with
//! `thiserror-no-std` the same way the teacher crate builds `ModemError`,
//! while still emitting the exact same bytes onto the wire before
//! returning `Err` (see each variant's doc comment for the reaction it
//! corresponds to in the state machines).

use thiserror_no_std::Error;

use crate::channel::ChannelError;

/// Failure modes of [`crate::receive`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ReceiveError {
    /// The channel itself reported closed, or a read that isn't covered by
    /// the protocol's own retry budget timed out.
    #[error("byte channel closed or failed")]
    Channel,
    /// The sender declared a file larger than the receive buffer; the
    /// receiver answered with `CAN CAN` and a 1s sleep before failing.
    #[error("declared file size exceeds the receive buffer")]
    BufferTooSmall,
    /// Incoming data would write past the receive buffer; the receiver
    /// answered with `CAN CAN` and a 1s sleep before failing.
    #[error("incoming data would overflow the receive buffer")]
    BufferOverflow,
    /// Five consecutive framing errors occurred once data flow had begun;
    /// the receiver answered with `CAN CAN` and a 1s sleep before failing.
    #[error("too many consecutive framing errors")]
    RetryExhausted,
}

impl From<ChannelError> for ReceiveError {
    fn from(_: ChannelError) -> Self {
        ReceiveError::Channel
    }
}

/// Failure modes of [`crate::send`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// The channel itself reported closed, or a read that isn't covered by
    /// the protocol's own retry budget timed out.
    #[error("byte channel closed or failed")]
    Channel,
    /// The receiver never confirmed CRC mode after block 0; the sender
    /// answered with `CAN CAN` and a 1s sleep before failing.
    #[error("receiver did not confirm CRC mode")]
    HandshakeFailure,
    /// The receiver sent `CAN` mid-transfer.
    #[error("transfer canceled by the receiver")]
    Canceled,
}

impl From<ChannelError> for SendError {
    fn from(_: ChannelError) -> Self {
        SendError::Channel
    }
}
