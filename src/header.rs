//! Block-0 (header) codec: filename and file size layout.

use heapless::String;

use crate::consts::{FILE_NAME_MAX_LENGTH, FILE_SIZE_LENGTH, SHORT_BLOCK_LEN};
use crate::numeric::{read_u32_ascii, write_u32_ascii};

/// Decoded contents of a YMODEM block 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderKind {
    /// A named file with a declared size.
    File {
        /// The filename as sent by the peer.
        name: String<FILE_NAME_MAX_LENGTH>,
        /// The declared file size in bytes.
        size: u32,
    },
    /// All-zero block 0: the sender has no more files.
    EndOfBatch,
}

/// Encodes block 0: `filename NUL decimal-size NUL`, zero-padded to 128
/// bytes. An empty `filename` produces the all-zero end-of-batch marker.
#[must_use]
pub fn encode_header(filename: &str, filesize: u32) -> [u8; SHORT_BLOCK_LEN] {
    let mut block = [0u8; SHORT_BLOCK_LEN];
    if filename.is_empty() {
        return block;
    }

    let mut pos = 0;
    for &byte in filename.as_bytes().iter().take(FILE_NAME_MAX_LENGTH - 1) {
        block[pos] = byte;
        pos += 1;
    }
    pos += 1; // NUL terminator; block is already zeroed.

    let _ = write_u32_ascii(filesize, &mut block[pos..]);
    // The size field's own terminator is implicit: the remainder of the
    // block is already zero.
    block
}

/// Parses block 0 into its filename/size pair, or recognizes the all-zero
/// end-of-batch marker.
#[must_use]
pub fn decode_header(data: &[u8; SHORT_BLOCK_LEN]) -> HeaderKind {
    if data[0..4] == [0, 0, 0, 0] {
        return HeaderKind::EndOfBatch;
    }

    let name_end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    let name_len = name_end.min(FILE_NAME_MAX_LENGTH);
    let name_str = core::str::from_utf8(&data[..name_len]).unwrap_or("");
    let mut name: String<FILE_NAME_MAX_LENGTH> = String::new();
    let _ = name.push_str(name_str);

    let size_start = (name_end + 1).min(data.len());
    let size_field = &data[size_start..];
    let size_end = size_field
        .iter()
        .position(|&b| b == b' ' || b == 0)
        .unwrap_or(size_field.len())
        .min(FILE_SIZE_LENGTH);
    let size = read_u32_ascii(&size_field[..size_end]);

    HeaderKind::File { name, size }
}

#[cfg(test)]
mod tests {
    use super::{decode_header, encode_header, HeaderKind};

    #[test]
    fn end_of_batch_is_all_zero() {
        let block = encode_header("", 0);
        assert_eq!(block, [0u8; 128]);
        assert_eq!(decode_header(&block), HeaderKind::EndOfBatch);
        assert_eq!(decode_header(&[0u8; 128]), HeaderKind::EndOfBatch);
    }

    #[test]
    fn round_trips_name_and_size() {
        let block = encode_header("hi.txt", 5);
        match decode_header(&block) {
            HeaderKind::File { name, size } => {
                assert_eq!(name.as_str(), "hi.txt");
                assert_eq!(size, 5);
            }
            HeaderKind::EndOfBatch => panic!("expected a file header"),
        }
    }

    #[test]
    fn round_trips_large_size_and_long_name() {
        let name = "a-fairly-long-firmware-image-name.bin";
        let block = encode_header(name, 123_456_789);
        match decode_header(&block) {
            HeaderKind::File { name: got, size } => {
                assert_eq!(got.as_str(), name);
                assert_eq!(size, 123_456_789);
            }
            HeaderKind::EndOfBatch => panic!("expected a file header"),
        }
    }

    #[test]
    fn matches_the_literal_scenario_1_header_bytes() {
        let block = encode_header("hi.txt", 5);
        assert_eq!(&block[..7], b"hi.txt\0");
        assert_eq!(&block[7..9], b"5\0");
        assert!(block[9..].iter().all(|&b| b == 0));
    }
}
