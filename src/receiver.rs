//! Receiver state machine: drives the protocol as the receiving side.

use core::time::Duration;

use heapless::String;
use log::{debug, error};

use crate::channel::ByteChannel;
use crate::config::YmodemConfig;
use crate::consts::{ACK, CAN, CRC, FILE_NAME_MAX_LENGTH, NAK, SHORT_BLOCK_LEN};
use crate::error::ReceiveError;
use crate::header::{decode_header, HeaderKind};
use crate::packet::{rx_packet, Outcome};

/// Outcome of a successful [`receive`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Received {
    /// The declared file size (not the padded byte count actually stored,
    /// which may be larger due to 1K-block padding).
    pub bytes: usize,
    /// The filename from block 0; empty for an end-of-batch session or an
    /// abort.
    pub filename: String<FILE_NAME_MAX_LENGTH>,
}

/// Receives a single file over `channel` into `buf`.
///
/// Terminates successfully, with `bytes == 0` and an empty filename, on an
/// end-of-batch header with no preceding file, a sender-initiated abort, or
/// a user abort — matching the wire behaviour a peer observes in all three
/// cases. Genuine protocol failures (buffer too small, buffer overflow,
/// exhausted retries) are reported as `Err`.
pub fn receive<C: ByteChannel>(
    channel: &mut C,
    buf: &mut [u8],
    config: &YmodemConfig,
) -> Result<Received, ReceiveError> {
    let timeout = Duration::from_secs(config.rx_timeout_secs);
    let mut filename: String<FILE_NAME_MAX_LENGTH> = String::new();
    let mut declared_size: usize = 0;
    let mut first_try = true;

    loop {
        if !first_try {
            channel.write_byte(CRC)?;
        }
        first_try = false;

        let mut crc_nak = true;
        let mut packets_rxed: u32 = 0;
        let mut consecutive_errors: u32 = 0;
        let mut cursor = 0usize;
        let mut session_done = false;

        loop {
            match rx_packet(channel, timeout, packets_rxed) {
                Outcome::Packet { seq, data } if packets_rxed == 0 => {
                    if seq != 0 {
                        channel.write_byte(NAK)?;
                        continue;
                    }
                    let mut header = [0u8; SHORT_BLOCK_LEN];
                    header.copy_from_slice(&data[..SHORT_BLOCK_LEN]);
                    match decode_header(&header) {
                        HeaderKind::EndOfBatch => {
                            channel.write_byte(ACK)?;
                            session_done = true;
                            break;
                        }
                        HeaderKind::File { name, size } => {
                            if size as usize > buf.len() {
                                error!("declared file size {size} exceeds the receive buffer");
                                channel.write_byte(CAN)?;
                                channel.write_byte(CAN)?;
                                channel.sleep(config.abort_sleep_secs);
                                return Err(ReceiveError::BufferTooSmall);
                            }
                            filename = name;
                            declared_size = size as usize;
                            cursor = 0;
                            channel.write_byte(ACK)?;
                            channel.write_byte(if crc_nak { CRC } else { NAK })?;
                            crc_nak = false;
                            packets_rxed = 1;
                        }
                    }
                }
                Outcome::Packet { seq, data } => {
                    if seq == (packets_rxed & 0xFF) as u8 {
                        if cursor + data.len() > buf.len() {
                            error!("incoming data at cursor {cursor} would overflow the receive buffer");
                            channel.write_byte(CAN)?;
                            channel.write_byte(CAN)?;
                            channel.sleep(config.abort_sleep_secs);
                            return Err(ReceiveError::BufferOverflow);
                        }
                        buf[cursor..cursor + data.len()].copy_from_slice(&data);
                        cursor += data.len();
                        channel.write_byte(ACK)?;
                        packets_rxed += 1;
                        consecutive_errors = 0;
                    } else {
                        channel.write_byte(NAK)?;
                    }
                }
                Outcome::EndOfTransmission => {
                    channel.write_byte(ACK)?;
                    break;
                }
                Outcome::SenderAbort => {
                    channel.write_byte(ACK)?;
                    return Ok(Received {
                        bytes: 0,
                        filename: String::new(),
                    });
                }
                Outcome::UserAbort => {
                    return Ok(Received {
                        bytes: 0,
                        filename: String::new(),
                    });
                }
                Outcome::Corrupt | Outcome::ChannelError => {
                    if packets_rxed != 0 {
                        consecutive_errors += 1;
                        if consecutive_errors >= config.packet_error_max {
                            channel.write_byte(CAN)?;
                            channel.write_byte(CAN)?;
                            channel.sleep(config.abort_sleep_secs);
                            error!(
                                "receiver aborting after {consecutive_errors} consecutive errors"
                            );
                            return Err(ReceiveError::RetryExhausted);
                        }
                    }
                    channel.write_byte(CRC)?;
                }
            }
        }

        if session_done {
            debug!("end-of-batch header received, session complete");
            return Ok(Received {
                bytes: declared_size,
                filename,
            });
        }
    }
}
