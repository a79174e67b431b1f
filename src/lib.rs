//! A `no_std` implementation of the YMODEM file-transfer protocol core.
//!
//! This crate provides the framing, header, and state-machine layers of
//! YMODEM (batch, CRC-16 variant) without committing to any particular I/O
//! backend. Callers implement [`ByteChannel`] over whatever transport they
//! have (a UART, a pseudo-terminal, an in-memory queue for tests) and drive
//! a transfer with [`receive`] or [`send`].
#![cfg_attr(not(feature = "std"), no_std)]
#![deny(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]

mod channel;
mod config;
mod consts;
mod crc;
mod error;
mod header;
mod numeric;
mod packet;
mod receiver;
mod sender;

pub use channel::{ByteChannel, ChannelError};
pub use config::YmodemConfig;
pub use consts::{FILE_NAME_MAX_LENGTH, FILE_SIZE_LENGTH, LONG_BLOCK_LEN, SHORT_BLOCK_LEN};
pub use crc::crc16;
pub use error::{ReceiveError, SendError};
pub use header::{decode_header, encode_header, HeaderKind};
pub use numeric::{read_u32_ascii, write_u32_ascii};
pub use packet::{rx_packet, tx_packet, Outcome, PacketData};
pub use receiver::{receive, Received};
pub use sender::send;
