//! Digest algorithm identifiers.

use std::fmt;

use scfg_core::ScfgError;

/// Selects one of the supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HashId {
    /// BLAKE3, 256-bit output.
    Blake3 = 0,
    /// 512-bit cryptographic hash, computed as SHA3-512.
    Sha512 = 1,
    /// Whirlpool, 512-bit output.
    Whirlpool = 2,
}

impl HashId {
    /// Every supported algorithm, in identifier order.
    pub const ALL: [HashId; 3] = [HashId::Blake3, HashId::Sha512, HashId::Whirlpool];

    /// Convert to u8 for serialization.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Try to parse from u8.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Blake3),
            1 => Some(Self::Sha512),
            2 => Some(Self::Whirlpool),
            _ => None,
        }
    }

    /// Size of the digest in bytes.
    pub const fn output_size(self) -> usize {
        match self {
            HashId::Blake3 => 32,
            HashId::Sha512 | HashId::Whirlpool => 64,
        }
    }

    /// Lowercase algorithm name.
    pub const fn name(self) -> &'static str {
        match self {
            HashId::Blake3 => "blake3",
            HashId::Sha512 => "sha512",
            HashId::Whirlpool => "whirlpool",
        }
    }
}

/// Whether `raw` names a supported algorithm.
pub fn is_valid_hash_id(raw: u8) -> bool {
    HashId::from_u8(raw).is_some()
}

impl TryFrom<u8> for HashId {
    type Error = ScfgError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        HashId::from_u8(raw).ok_or(ScfgError::UnsupportedAlgorithm(raw))
    }
}

impl fmt::Display for HashId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ids() {
        assert!(is_valid_hash_id(0));
        assert!(is_valid_hash_id(1));
        assert!(is_valid_hash_id(2));
        assert!(!is_valid_hash_id(3));
        assert!(!is_valid_hash_id(u8::MAX));
    }

    #[test]
    fn test_try_from_unknown() {
        let err = HashId::try_from(9).unwrap_err();
        assert!(matches!(err, ScfgError::UnsupportedAlgorithm(9)));
    }

    #[test]
    fn test_roundtrip_and_sizes() {
        for id in HashId::ALL {
            assert_eq!(HashId::try_from(id.to_u8()).unwrap(), id);
        }
        assert_eq!(HashId::Blake3.output_size(), 32);
        assert_eq!(HashId::Sha512.output_size(), 64);
        assert_eq!(HashId::Whirlpool.output_size(), 64);
    }

    #[test]
    fn test_display() {
        assert_eq!(HashId::Whirlpool.to_string(), "whirlpool");
    }
}
