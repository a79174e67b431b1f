//! Sender state machine: drives the protocol as the sending side.

use core::time::Duration;

use log::{debug, error, warn};

use crate::channel::ByteChannel;
use crate::config::YmodemConfig;
use crate::consts::{ACK, CAN, CRC, LONG_BLOCK_LEN, NAK};
use crate::error::SendError;
use crate::header::encode_header;
use crate::packet::tx_packet;

/// Sends `data` under `filename` over `channel`, then closes the batch with
/// an end-of-batch header. Returns the number of payload bytes sent on
/// success.
///
/// `data` is sent as a sequence of 1K (`STX`) packets; a final remainder
/// shorter than 1024 bytes is padded with [`YmodemConfig::pad_byte`] rather
/// than sent short.
pub fn send<C: ByteChannel>(
    channel: &mut C,
    data: &[u8],
    filename: &str,
    config: &YmodemConfig,
) -> Result<usize, SendError> {
    let timeout = Duration::from_secs(config.rx_timeout_secs);

    channel.sleep(config.abort_sleep_secs);
    channel.flush_input();

    wait_for_crc(channel, timeout, config)?;
    send_header(channel, timeout, filename, data.len() as u32, config)?;
    send_data(channel, timeout, data, config)?;
    finish(channel, timeout, config)?;
    Ok(data.len())
}

/// Solicits the receiver's start-of-session byte, emitting `CRC` on every
/// iteration of the wait (as the reference does with `_putchar(CRC)` inside
/// its `do`/`while` loop) and retrying on each timeout. Any other byte, or a
/// closed channel, is treated as a handshake failure and aborts the
/// session.
fn wait_for_crc<C: ByteChannel>(
    channel: &mut C,
    timeout: Duration,
    config: &YmodemConfig,
) -> Result<(), SendError> {
    loop {
        channel.write_byte(CRC)?;
        match channel.read_byte(timeout) {
            Ok(CRC) => return Ok(()),
            Ok(_) => return abort(channel, config, SendError::HandshakeFailure),
            Err(crate::channel::ChannelError::Timeout) => continue,
            Err(crate::channel::ChannelError::Closed) => {
                return Err(SendError::Channel);
            }
        }
    }
}

/// Sends block 0 (the filename/size header), retransmitting it in response
/// to a `CRC` (first retry only, mirroring the receiver's own
/// first-solicitation-is-`CRC` rule) or a `NAK` (every subsequent retry),
/// until the receiver `ACK`s it and confirms `CRC` mode for block 1.
fn send_header<C: ByteChannel>(
    channel: &mut C,
    timeout: Duration,
    filename: &str,
    filesize: u32,
    config: &YmodemConfig,
) -> Result<(), SendError> {
    let block = encode_header(filename, filesize);
    let mut crc_nak = true;

    loop {
        tx_packet(channel, 0, &block)?;
        match channel.read_byte(timeout) {
            Ok(ACK) => match channel.read_byte(timeout) {
                Ok(CRC) => return Ok(()),
                _ => return abort(channel, config, SendError::Channel),
            },
            Ok(CRC) if crc_nak => {
                crc_nak = false;
                continue;
            }
            Ok(NAK) if !crc_nak => continue,
            Ok(CAN) => return Err(SendError::Canceled),
            _ => return abort(channel, config, SendError::Channel),
        }
    }
}

/// Sends `data` as a sequence of 1K (`STX`) packets, padding the final
/// packet with [`YmodemConfig::pad_byte`] if `data`'s length is not a
/// multiple of 1024. Retransmits any packet that is `NAK`ed, up to
/// [`YmodemConfig::packet_error_max`] consecutive failures.
fn send_data<C: ByteChannel>(
    channel: &mut C,
    timeout: Duration,
    data: &[u8],
    config: &YmodemConfig,
) -> Result<(), SendError> {
    let mut seq: u8 = 1;
    let mut offset = 0;

    if data.is_empty() {
        return Ok(());
    }

    while offset < data.len() {
        let remaining = data.len() - offset;
        let chunk_len = remaining.min(LONG_BLOCK_LEN);
        let chunk = &data[offset..offset + chunk_len];

        let mut padded = [config.pad_byte; LONG_BLOCK_LEN];
        let packet: &[u8] = if chunk_len == LONG_BLOCK_LEN {
            chunk
        } else {
            padded[..chunk_len].copy_from_slice(chunk);
            &padded[..]
        };

        send_packet_with_retry(channel, timeout, seq, packet, config)?;
        offset += chunk_len;
        seq = seq.wrapping_add(1);
    }

    Ok(())
}

fn send_packet_with_retry<C: ByteChannel>(
    channel: &mut C,
    timeout: Duration,
    seq: u8,
    packet: &[u8],
    config: &YmodemConfig,
) -> Result<(), SendError> {
    let mut errors = 0u32;
    loop {
        tx_packet(channel, seq, packet)?;
        match channel.read_byte(timeout) {
            Ok(ACK) => return Ok(()),
            Ok(CAN) => return Err(SendError::Canceled),
            Err(_) => return abort(channel, config, SendError::Channel),
            Ok(_) => {
                errors += 1;
                if errors >= config.packet_error_max {
                    warn!("sender giving up on block {seq} after {errors} errors");
                    return abort(channel, config, SendError::Channel);
                }
            }
        }
    }
}

/// Sends `EOT`, waits for its `ACK`, then sends the all-zero end-of-batch
/// header to close the session.
fn finish<C: ByteChannel>(
    channel: &mut C,
    timeout: Duration,
    config: &YmodemConfig,
) -> Result<(), SendError> {
    channel.write_byte(crate::consts::EOT)?;
    match channel.read_byte(timeout) {
        Ok(ACK) => {}
        _ => return Err(SendError::Channel),
    }

    // The receiver reissues its CRC solicitation for the (absent) next file.
    match channel.read_byte(timeout) {
        Ok(_) => {}
        Err(_) => return Err(SendError::Channel),
    }

    let block = encode_header("", 0);
    tx_packet(channel, 0, &block)?;
    match channel.read_byte(timeout) {
        Ok(ACK) => {
            debug!("end-of-batch acknowledged, session complete");
            Ok(())
        }
        _ => Err(SendError::Channel),
    }
}

fn abort<C: ByteChannel>(
    channel: &mut C,
    config: &YmodemConfig,
    err: SendError,
) -> Result<(), SendError> {
    error!("sender aborting: {err}");
    let _ = channel.write_byte(CAN);
    let _ = channel.write_byte(CAN);
    channel.sleep(config.abort_sleep_secs);
    Err(err)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::send;
    use crate::channel::{ByteChannel, ChannelError};
    use crate::config::YmodemConfig;
    use crate::consts::{ACK, CAN, CRC, NAK};
    use core::time::Duration;

    #[derive(Default)]
    struct QueueChannel {
        inbound: VecDeque<u8>,
        outbound: Vec<u8>,
    }

    impl ByteChannel for QueueChannel {
        fn read_byte(&mut self, _timeout: Duration) -> Result<u8, ChannelError> {
            self.inbound.pop_front().ok_or(ChannelError::Timeout)
        }

        fn write_byte(&mut self, byte: u8) -> Result<(), ChannelError> {
            self.outbound.push(byte);
            Ok(())
        }

        // The queue models the peer's scripted future replies, not stale
        // buffered noise, so flushing is a no-op here.
        fn flush_input(&mut self) {}

        fn sleep(&mut self, _seconds: u64) {}
    }

    #[test]
    fn sends_a_short_file_end_to_end() {
        let mut chan = QueueChannel::default();
        chan.inbound.extend([
            CRC, // solicit block 0
            ACK, // ack block 0
            CRC, // solicit block 1
            ACK, // ack block 1 (the only data block)
            ACK, // ack EOT
            CRC, // solicit next file
            ACK, // ack end-of-batch header
        ]);

        let config = YmodemConfig::default();
        let sent = send(&mut chan, b"Hello", "hi.txt", &config).unwrap();

        assert_eq!(sent, 5);
        assert_eq!(chan.outbound[0], CRC);
        assert_eq!(chan.outbound[1], crate::consts::SOH);
    }

    #[test]
    fn bad_handshake_byte_aborts_with_double_can() {
        let mut chan = QueueChannel::default();
        chan.inbound.push_back(0x99);

        let config = YmodemConfig::default();
        let err = send(&mut chan, b"Hello", "hi.txt", &config).unwrap_err();

        assert!(matches!(err, crate::error::SendError::HandshakeFailure));
        assert_eq!(chan.outbound[0], CRC);
        assert_eq!(&chan.outbound[1..3], &[CAN, CAN]);
    }

    #[test]
    fn header_is_retransmitted_on_crc_then_nak_before_ack() {
        let mut chan = QueueChannel::default();
        chan.inbound.extend([
            CRC, // solicit block 0
            CRC, // first retry: another CRC echo, not yet an ACK
            NAK, // second retry: now a NAK (crc_nak already consumed)
            ACK, // third attempt: finally acked
            CRC, // solicit block 1
            ACK, // ack block 1 (the only data block)
            ACK, // ack EOT
            CRC, // solicit next file
            ACK, // ack end-of-batch header
        ]);

        let config = YmodemConfig::default();
        let sent = send(&mut chan, b"Hello", "hi.txt", &config).unwrap();
        assert_eq!(sent, 5);
    }

    #[test]
    fn receiver_cancel_during_data_is_reported() {
        let mut chan = QueueChannel::default();
        chan.inbound.extend([CRC, ACK, CRC, CAN]);

        let config = YmodemConfig::default();
        let err = send(&mut chan, b"Hello", "hi.txt", &config).unwrap_err();
        assert!(matches!(err, crate::error::SendError::Canceled));
    }
}
