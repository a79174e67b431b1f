//! CRC-16/CCITT (XMODEM variant) over a byte span.

/// Computes the XMODEM-CRC: polynomial 0x1021, initial value 0, no input or
/// output reflection, no final XOR.
///
/// Delegates to the `crc16` crate's `XMODEM` table, the same one the
/// teacher crate's `calc_crc` helper already uses.
#[must_use]
pub fn crc16(data: &[u8]) -> u16 {
    crc16::State::<crc16::XMODEM>::calculate(data)
}

#[cfg(test)]
mod tests {
    use super::crc16;

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(crc16(&[]), 0);
    }

    #[test]
    fn known_check_vector() {
        // The standard XMODEM/CCITT check value for the ASCII string "123456789".
        assert_eq!(crc16(b"123456789"), 0x31C3);
    }

    #[test]
    fn crc_over_data_plus_its_own_trailer_is_zero() {
        let samples: [&[u8]; 4] = [b"", b"a", b"hello, world", &[0u8; 1024]];
        for data in samples {
            let crc = crc16(data);
            let mut framed = [0u8; 1026];
            framed[..data.len()].copy_from_slice(data);
            framed[data.len()] = (crc >> 8) as u8;
            framed[data.len() + 1] = (crc & 0xFF) as u8;
            assert_eq!(crc16(&framed[..data.len() + 2]), 0);
        }
    }
}
