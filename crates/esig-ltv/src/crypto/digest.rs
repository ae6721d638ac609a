//! Digest algorithms, digest values and the hashing seam.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::Digest as _;
use thiserror::Error;

/// Errors produced by a [`DigestHasher`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DigestError {
    /// The hasher has no implementation for the requested algorithm.
    #[error("digest algorithm {algorithm} is not supported by this hasher")]
    UnsupportedAlgorithm {
        /// The requested algorithm.
        algorithm: DigestAlgorithm,
    },

    /// The algorithm name could not be parsed.
    #[error("unknown digest algorithm: {value}")]
    UnknownAlgorithm {
        /// The unrecognized name.
        value: String,
    },
}

/// Digest algorithms understood by the LTV layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum DigestAlgorithm {
    /// SHA-1. Only used as the label of SKI-based identities.
    Sha1,
    /// SHA-256.
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
    /// BLAKE3 (256-bit output).
    Blake3,
}

impl DigestAlgorithm {
    /// Returns the canonical name of this algorithm.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha384 => "SHA384",
            Self::Sha512 => "SHA512",
            Self::Blake3 => "BLAKE3",
        }
    }

    /// Returns the output length in bytes.
    #[must_use]
    pub const fn output_len(&self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 | Self::Blake3 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Parses an algorithm name.
    ///
    /// Accepts `SHA256`, `sha256` and the dashed `SHA-256` forms.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::UnknownAlgorithm`] for unrecognized names.
    pub fn parse(s: &str) -> Result<Self, DigestError> {
        match s.to_uppercase().replace('-', "").as_str() {
            "SHA1" => Ok(Self::Sha1),
            "SHA256" => Ok(Self::Sha256),
            "SHA384" => Ok(Self::Sha384),
            "SHA512" => Ok(Self::Sha512),
            "BLAKE3" => Ok(Self::Blake3),
            _ => Err(DigestError::UnknownAlgorithm {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An `(algorithm, bytes)` digest pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest {
    algorithm: DigestAlgorithm,
    #[serde(with = "hex_bytes")]
    value: Vec<u8>,
}

impl Digest {
    /// Wraps an already computed digest value.
    #[must_use]
    pub fn new(algorithm: DigestAlgorithm, value: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm,
            value: value.into(),
        }
    }

    /// Returns the algorithm label.
    #[must_use]
    pub const fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Returns the raw digest bytes.
    #[must_use]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Returns the upper-case hex rendering of the digest bytes.
    #[must_use]
    pub fn hex_value(&self) -> String {
        hex::encode_upper(&self.value)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.hex_value())
    }
}

/// The hash primitive used by every component of this crate.
pub trait DigestHasher {
    /// Hashes `bytes` with `algorithm`.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::UnsupportedAlgorithm`] if the implementation
    /// cannot compute `algorithm`.
    fn hash(&self, algorithm: DigestAlgorithm, bytes: &[u8]) -> Result<Vec<u8>, DigestError>;

    /// Hashes `bytes` and wraps the result in a [`Digest`].
    ///
    /// # Errors
    ///
    /// Propagates errors from [`DigestHasher::hash`].
    fn digest(&self, algorithm: DigestAlgorithm, bytes: &[u8]) -> Result<Digest, DigestError> {
        Ok(Digest::new(algorithm, self.hash(algorithm, bytes)?))
    }
}

impl<H: DigestHasher + ?Sized> DigestHasher for &H {
    fn hash(&self, algorithm: DigestAlgorithm, bytes: &[u8]) -> Result<Vec<u8>, DigestError> {
        (**self).hash(algorithm, bytes)
    }
}

/// SHA-2 and BLAKE3 backed hasher.
///
/// SHA-1 is only a label for subject key identifiers, which are never
/// re-hashed, and is refused here.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDigestHasher;

impl DigestHasher for DefaultDigestHasher {
    fn hash(&self, algorithm: DigestAlgorithm, bytes: &[u8]) -> Result<Vec<u8>, DigestError> {
        match algorithm {
            DigestAlgorithm::Sha256 => Ok(sha2::Sha256::digest(bytes).to_vec()),
            DigestAlgorithm::Sha384 => Ok(sha2::Sha384::digest(bytes).to_vec()),
            DigestAlgorithm::Sha512 => Ok(sha2::Sha512::digest(bytes).to_vec()),
            DigestAlgorithm::Blake3 => Ok(blake3::hash(bytes).as_bytes().to_vec()),
            DigestAlgorithm::Sha1 => Err(DigestError::UnsupportedAlgorithm { algorithm }),
        }
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode_upper(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}
