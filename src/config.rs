//! Tunable parameters for a YMODEM session.
//!
//! The reference implementation hard-codes these as C preprocessor
//! constants (`PACKET_RX_TIMEOUT_SEC`, `PACKET_ERROR_MAX_NBR`, ...). This
//! port collects them into a small struct so callers can adjust them
//! without touching protocol code, the way the teacher crate's `Xmodem`
//! config struct exposes `max_errors` and `pad_byte`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct YmodemConfig {
    /// Consecutive framing errors the receiver tolerates before aborting.
    pub packet_error_max: u32,
    /// Per-byte read timeout, in seconds.
    pub rx_timeout_secs: u64,
    /// Delay observed after emitting an abort (`CAN CAN`), in seconds.
    pub abort_sleep_secs: u64,
    /// Byte used to pad the unused tail of the sender's final data block.
    pub pad_byte: u8,
}

impl Default for YmodemConfig {
    fn default() -> Self {
        Self {
            packet_error_max: 5,
            rx_timeout_secs: 1,
            abort_sleep_secs: 1,
            pad_byte: 0x1A,
        }
    }
}
