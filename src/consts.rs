//! Wire-protocol byte constants and packet-size limits for YMODEM framing.

/// Start of a 128-byte data packet.
pub const SOH: u8 = 0x01;
/// Start of a 1024-byte data packet.
pub const STX: u8 = 0x02;
/// End of transmission.
pub const EOT: u8 = 0x04;
/// Positive acknowledgement.
pub const ACK: u8 = 0x06;
/// Negative acknowledgement / retransmit request.
pub const NAK: u8 = 0x15;
/// Cancel. Two in succession abort the transfer.
pub const CAN: u8 = 0x18;
/// Request or initiate CRC-16 mode; doubles as the solicitation byte.
pub const CRC: u8 = 0x43;
/// User abort, `'A'`.
pub const ABORT1: u8 = 0x41;
/// User abort, `'a'`.
pub const ABORT2: u8 = 0x61;

/// Data bytes in a short (`SOH`) packet.
pub const SHORT_BLOCK_LEN: usize = 128;
/// Data bytes in a long (`STX`) packet.
pub const LONG_BLOCK_LEN: usize = 1024;
/// Trailing CRC high + low byte.
pub const PACKET_TRAILER_LEN: usize = 2;

/// Maximum decimal digits accepted in the ASCII file-size field.
pub const FILE_SIZE_LENGTH: usize = 16;
/// Maximum filename length in block 0, including its `NUL` terminator.
pub const FILE_NAME_MAX_LENGTH: usize = SHORT_BLOCK_LEN - FILE_SIZE_LENGTH - 2;
