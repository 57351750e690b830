// Primitives - fundamental types for the test bench
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Universal hash (Blake3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hash([u8; 32]);

impl Hash {
    pub const ZERO: Hash = Hash([0u8; 32]);

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Hash(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hash data with Blake3
    pub fn hash(data: &[u8]) -> Self {
        let hash = blake3::hash(data);
        Hash(*hash.as_bytes())
    }

    /// Hash the concatenation of two hashes (proof folding)
    pub fn combine(&self, other: &Hash) -> Self {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(&self.0);
        buf[32..].copy_from_slice(&other.0);
        Hash::hash(&buf)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Hash(bytes)
    }
}

/// Account or contract address (20 bytes, Ethereum-style)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Parse a `0x`-prefixed 40-char hex literal at compile time.
    /// Malformed input fails compilation when used in a `const` context.
    pub const fn from_hex_literal(s: &str) -> Self {
        let raw = s.as_bytes();
        if raw.len() != 42 || raw[0] != b'0' || raw[1] != b'x' {
            panic!("address literal must be 0x-prefixed and 40 hex chars");
        }
        let mut out = [0u8; 20];
        let mut i = 0;
        while i < 20 {
            let hi = hex_nibble(raw[2 + i * 2]);
            let lo = hex_nibble(raw[3 + i * 2]);
            out[i] = (hi << 4) | lo;
            i += 1;
        }
        Address(out)
    }

    /// Derive a deterministic address from a label (local test accounts)
    pub fn derive(label: &str) -> Self {
        let digest = Hash::hash(label.as_bytes());
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest.as_bytes()[..20]);
        Address(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

const fn hex_nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => panic!("invalid hex digit in address literal"),
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(stripped).map_err(|_| AddressParseError::InvalidHex)?;
        if raw.len() != 20 {
            return Err(AddressParseError::InvalidLength(raw.len()));
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&raw);
        Ok(Address(bytes))
    }
}

/// Address parse errors
#[derive(Debug, thiserror::Error)]
pub enum AddressParseError {
    #[error("invalid hex in address")]
    InvalidHex,

    #[error("address must be 20 bytes, got {0}")]
    InvalidLength(usize),
}

/// Block number
pub type BlockNumber = u64;

/// Token balance (u128 covers any ERC20 supply)
pub type Balance = u128;

/// Basis points (1 bps = 0.01%)
pub type Bps = u64;

/// Full scale for basis-point math
pub const MAX_BPS: Bps = 10_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        let data = b"sett";
        let hash1 = Hash::hash(data);
        let hash2 = Hash::hash(data);
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_address_hex_literal_roundtrip() {
        const WHALE: Address =
            Address::from_hex_literal("0x6a7ed7a974d4314d2c345bd826daca5501b0aa1e");
        let parsed: Address = "0x6a7ed7a974d4314d2c345bd826daca5501b0aa1e"
            .parse()
            .unwrap();
        assert_eq!(WHALE, parsed);
        assert_eq!(
            WHALE.to_string(),
            "0x6a7ed7a974d4314d2c345bd826daca5501b0aa1e"
        );
    }

    #[test]
    fn test_address_parse_rejects_bad_input() {
        assert!("0x1234".parse::<Address>().is_err());
        assert!("0xzz7ed7a974d4314d2c345bd826daca5501b0aa1e"
            .parse::<Address>()
            .is_err());
    }

    #[test]
    fn test_derive_is_stable_and_distinct() {
        let a = Address::derive("dev/0");
        let b = Address::derive("dev/1");
        assert_eq!(a, Address::derive("dev/0"));
        assert_ne!(a, b);
        assert!(!a.is_zero());
    }

    #[test]
    fn test_combine_order_matters() {
        let a = Hash::hash(b"a");
        let b = Hash::hash(b"b");
        assert_ne!(a.combine(&b), b.combine(&a));
    }
}
