//! Account identity.

use crate::encoding::{self, HexError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 20-byte account identity. The all-zero address marks "nobody".
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(#[serde(with = "encoding::hex_array")] [u8; 20]);

impl Address {
    /// The zero address
    pub const ZERO: Address = Address([0u8; 20]);

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl FromStr for Address {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(encoding::parse_hex(s)?))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", encoding::to_hex(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_address() {
        assert!(Address::ZERO.is_zero());
        assert!(Address::default().is_zero());
        assert!(!Address::from_bytes([1u8; 20]).is_zero());
    }

    #[test]
    fn test_display_parses_back() {
        let addr = Address::from_bytes([0xab; 20]);
        let parsed: Address = addr.to_string().parse().unwrap();
        assert_eq!(addr, parsed);
    }

    #[test]
    fn test_serializes_as_hex_string() {
        let addr = Address::from_bytes([0x11; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "11".repeat(20)));
    }

    #[test]
    fn test_rejects_short_address() {
        assert!("0x1234".parse::<Address>().is_err());
    }
}
