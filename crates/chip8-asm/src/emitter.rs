//! Big-endian serialization of assembled words.

use std::io::{self, Write};

/// Serializes words most-significant byte first, with no header or padding.
#[must_use]
pub fn to_bytes(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_be_bytes()).collect()
}

/// Writes words to `out` in big-endian order.
///
/// # Errors
///
/// Propagates any I/O error from `out`.
pub fn write_words<W: Write>(words: &[u16], out: &mut W) -> io::Result<()> {
    out.write_all(&to_bytes(words))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rom_is_empty_output() {
        assert!(to_bytes(&[]).is_empty());
    }

    #[test]
    fn most_significant_byte_first() {
        assert_eq!(
            to_bytes(&[0x1204, 0x00E0, 0x00EE]),
            vec![0x12, 0x04, 0x00, 0xE0, 0x00, 0xEE]
        );
    }

    #[test]
    fn write_words_to_buffer() {
        let mut buf = Vec::new();
        write_words(&[0x6110, 0x7105], &mut buf).unwrap();
        assert_eq!(buf, vec![0x61, 0x10, 0x71, 0x05]);
    }
}
