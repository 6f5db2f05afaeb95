//! Conversions between bytes, bit sequences and hex strings
//!
//! Bits are always ordered most-significant first within each byte.

use crate::error::{Error, Result};

/// Expand each byte into 8 bits, most-significant first
pub fn text_to_bits(input: &[u8]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(input.len() * 8);
    for byte in input {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1 == 1);
        }
    }
    bits
}

/// Pack bits into bytes, most-significant first
///
/// Fails with [`Error::InvalidLength`] unless the length is a multiple of 8.
pub fn bits_to_bytes(bits: &[bool]) -> Result<Vec<u8>> {
    if bits.len() % 8 != 0 {
        return Err(Error::InvalidLength { len: bits.len() });
    }
    Ok(bits
        .chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | bit as u8))
        .collect())
}

/// Render bits as lowercase hex, two digits per byte
pub fn bits_to_hex(bits: &[bool]) -> Result<String> {
    Ok(hex::encode(bits_to_bytes(bits)?))
}

/// Decode a hex string into bits, four per digit
///
/// Accepts upper- and lowercase `a`-`f`.
pub fn hex_to_bits(hex: &str) -> Result<Vec<bool>> {
    let mut bits = Vec::with_capacity(hex.len() * 4);
    for (position, character) in hex.chars().enumerate() {
        let value = character
            .to_digit(16)
            .ok_or(Error::InvalidDigit { character, position })?;
        for shift in (0..4).rev() {
            bits.push((value >> shift) & 1 == 1);
        }
    }
    Ok(bits)
}

/// Number of differing bits between two hex digests of equal length
pub fn hamming_distance(a: &str, b: &str) -> Result<u32> {
    let a = hex_to_bits(a)?;
    let b = hex_to_bits(b)?;
    if a.len() != b.len() {
        return Err(Error::InvalidLength {
            len: a.len().max(b.len()),
        });
    }
    Ok(a.iter().zip(&b).filter(|(x, y)| x != y).count() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_to_bits_msb_first() {
        let bits = text_to_bits(b"A"); // 0x41
        assert_eq!(
            bits,
            vec![false, true, false, false, false, false, false, true]
        );
        assert!(text_to_bits(b"").is_empty());
    }

    #[test]
    fn test_bits_to_hex() {
        let bits = text_to_bits(&[0x00, 0xAB, 0xFF]);
        assert_eq!(bits_to_hex(&bits).unwrap(), "00abff");
        assert_eq!(bits_to_hex(&[]).unwrap(), "");
    }

    #[test]
    fn test_bits_to_hex_rejects_partial_byte() {
        let bits = vec![true; 12];
        assert_eq!(bits_to_hex(&bits), Err(Error::InvalidLength { len: 12 }));
    }

    #[test]
    fn test_hex_to_bits_case_insensitive() {
        assert_eq!(hex_to_bits("aB").unwrap(), hex_to_bits("Ab").unwrap());
        assert_eq!(hex_to_bits("AB").unwrap(), text_to_bits(&[0xAB]));
    }

    #[test]
    fn test_hex_to_bits_odd_length() {
        let bits = hex_to_bits("abc").unwrap();
        assert_eq!(bits.len(), 12);
        assert_eq!(&bits[..8], text_to_bits(&[0xAB]).as_slice());
    }

    #[test]
    fn test_hex_to_bits_rejects_non_hex() {
        assert_eq!(
            hex_to_bits("0g"),
            Err(Error::InvalidDigit {
                character: 'g',
                position: 1
            })
        );
    }

    #[test]
    fn test_round_trip() {
        let bits = text_to_bits(b"round trip through hex");
        let hex = bits_to_hex(&bits).unwrap();
        assert_eq!(hex_to_bits(&hex).unwrap(), bits);
    }

    #[test]
    fn test_hamming_distance() {
        assert_eq!(hamming_distance("00", "00").unwrap(), 0);
        assert_eq!(hamming_distance("00", "ff").unwrap(), 8);
        assert_eq!(hamming_distance("0f", "01").unwrap(), 3);
        assert!(hamming_distance("00", "000").is_err());
    }
}
