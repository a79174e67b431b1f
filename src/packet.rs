//! Packet framer: reads and writes a single framed YMODEM packet.
//!
//! This layer does not buffer, retry, or interpret the payload; the
//! receiver and sender state machines decide what to do with an [`Outcome`].

use core::time::Duration;

use heapless::Vec;
use log::{debug, warn};

use crate::channel::{ByteChannel, ChannelError};
use crate::consts::{
    ABORT1, ABORT2, CAN, CRC, EOT, LONG_BLOCK_LEN, PACKET_TRAILER_LEN, SHORT_BLOCK_LEN, SOH, STX,
};
use crate::crc::crc16;

/// Fixed-capacity buffer sized for the largest packet payload.
pub type PacketData = Vec<u8, LONG_BLOCK_LEN>;

/// Scratch buffer sized for the largest payload plus its CRC trailer.
type PacketFrame = Vec<u8, { LONG_BLOCK_LEN + PACKET_TRAILER_LEN }>;

/// Result of attempting to read one framed packet from the channel.
#[derive(Debug)]
pub enum Outcome {
    /// A well-formed packet with a matching sequence complement and CRC.
    Packet {
        /// The packet's sequence byte (block number mod 256).
        seq: u8,
        /// The packet's data field (128 or 1024 bytes).
        data: PacketData,
    },
    /// The sender signalled `EOT`.
    EndOfTransmission,
    /// Two `CAN` bytes in a row: the sender gave up.
    SenderAbort,
    /// `A`/`a` on the wire, or a stray `CRC` once flow has begun.
    UserAbort,
    /// The lead byte was recognized but the frame failed the
    /// sequence-complement or CRC check.
    Corrupt,
    /// `read_byte` timed out or the channel closed.
    ChannelError,
}

/// Reads one framed packet, classifying the lead byte and validating the
/// trailer. Never retries; the caller's state machine decides what to do
/// next.
///
/// `packets_rxed` distinguishes a `CRC` byte arriving as the legitimate
/// start-of-session solicitation echo (before any packet has been
/// accepted) from a stray one after flow has begun.
pub fn rx_packet<C: ByteChannel>(
    channel: &mut C,
    timeout: Duration,
    packets_rxed: u32,
) -> Outcome {
    let lead = match channel.read_byte(timeout) {
        Ok(b) => b,
        Err(_) => return Outcome::ChannelError,
    };

    let packet_size = match lead {
        SOH => SHORT_BLOCK_LEN,
        STX => LONG_BLOCK_LEN,
        EOT => return Outcome::EndOfTransmission,
        CAN => {
            return match channel.read_byte(timeout) {
                Ok(CAN) => Outcome::SenderAbort,
                _ => Outcome::UserAbort,
            };
        }
        CRC if packets_rxed == 0 => return Outcome::Corrupt,
        CRC => return Outcome::UserAbort,
        ABORT1 | ABORT2 => return Outcome::UserAbort,
        _ => return Outcome::SenderAbort,
    };

    let seq = match channel.read_byte(timeout) {
        Ok(b) => b,
        Err(_) => return Outcome::ChannelError,
    };
    let seq_complement = match channel.read_byte(timeout) {
        Ok(b) => b,
        Err(_) => return Outcome::ChannelError,
    };

    let mut frame: PacketFrame = PacketFrame::new();
    for _ in 0..packet_size + PACKET_TRAILER_LEN {
        let byte = match channel.read_byte(timeout) {
            Ok(b) => b,
            Err(_) => return Outcome::ChannelError,
        };
        let _ = frame.push(byte);
    }

    if seq ^ 0xFF != seq_complement {
        debug!("packet seq {seq} failed the sequence-complement check");
        return Outcome::Corrupt;
    }

    if crc16(&frame) != 0 {
        warn!("packet seq {seq} failed the CRC check");
        return Outcome::Corrupt;
    }

    let mut data: PacketData = PacketData::new();
    let _ = data.extend_from_slice(&frame[..packet_size]);
    Outcome::Packet { seq, data }
}

/// Frames and writes a packet: `SOH`/`STX` for `data.len()`, seq,
/// complement, data, then CRC high/low. Never retries; the caller's state
/// machine retransmits on a bad acknowledgement.
pub fn tx_packet<C: ByteChannel>(
    channel: &mut C,
    seq: u8,
    data: &[u8],
) -> Result<(), ChannelError> {
    let lead = if data.len() == SHORT_BLOCK_LEN { SOH } else { STX };
    channel.write_byte(lead)?;
    channel.write_byte(seq)?;
    channel.write_byte(!seq)?;
    channel.write_bytes(data)?;

    let crc = crc16(data);
    channel.write_byte((crc >> 8) as u8)?;
    channel.write_byte((crc & 0xFF) as u8)
}
