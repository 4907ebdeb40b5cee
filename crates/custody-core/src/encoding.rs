//! Fixed-width byte arrays as `0x`-prefixed hex strings.

use thiserror::Error;

/// Errors from parsing a fixed-width hex string
#[derive(Clone, Debug, PartialEq, Error)]
pub enum HexError {
    #[error("invalid hex: {0}")]
    Invalid(#[from] hex::FromHexError),

    #[error("expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
}

/// Parse a hex string (with or without `0x`) into exactly `N` bytes.
pub fn parse_hex<const N: usize>(s: &str) -> Result<[u8; N], HexError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    let bytes = hex::decode(digits)?;
    if bytes.len() != N {
        return Err(HexError::Length {
            expected: N,
            actual: bytes.len(),
        });
    }
    let mut arr = [0u8; N];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}

/// Render bytes as a `0x`-prefixed lowercase hex string.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Serde adapter: `#[serde(with = "custody_core::encoding::hex_array")]`
pub mod hex_array {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer, const N: usize>(bytes: &[u8; N], s: S) -> Result<S::Ok, S::Error> {
        super::to_hex(bytes).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(d: D) -> Result<[u8; N], D::Error> {
        let hex_str = String::deserialize(d)?;
        super::parse_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_and_without_prefix() {
        let a: [u8; 2] = parse_hex("0xabcd").unwrap();
        let b: [u8; 2] = parse_hex("abcd").unwrap();
        assert_eq!(a, [0xab, 0xcd]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_wrong_length() {
        let result: Result<[u8; 4], _> = parse_hex("0xabcd");
        assert_eq!(
            result,
            Err(HexError::Length {
                expected: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        let result: Result<[u8; 1], _> = parse_hex("zz");
        assert!(matches!(result, Err(HexError::Invalid(_))));
    }

    #[test]
    fn test_invalid_character_is_reported() {
        let result: Result<[u8; 2], _> = parse_hex("0xzz00");
        assert_eq!(
            result,
            Err(HexError::Invalid(hex::FromHexError::InvalidHexCharacter {
                c: 'z',
                index: 0
            }))
        );
    }

    #[test]
    fn test_to_hex_is_prefixed() {
        assert_eq!(to_hex(&[0x00, 0xff]), "0x00ff");
    }
}
