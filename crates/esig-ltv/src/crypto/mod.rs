//! Digest primitives consumed by the identity and extension layers.
//!
//! The LTV layer never hashes directly: every digest goes through a
//! [`DigestHasher`] so that the embedding toolkit can plug in its own
//! provider. [`DefaultDigestHasher`] covers the SHA-2 family and BLAKE3 and is
//! what the tests and most callers use.
//!
//! # Example
//!
//! ```rust
//! use esig_ltv::crypto::{DefaultDigestHasher, DigestAlgorithm, DigestHasher};
//!
//! let hasher = DefaultDigestHasher;
//! let digest = hasher.digest(DigestAlgorithm::Sha256, b"issuer-serial").unwrap();
//! assert_eq!(digest.algorithm(), DigestAlgorithm::Sha256);
//! assert_eq!(digest.value().len(), 32);
//! ```

mod digest;

pub use digest::{DefaultDigestHasher, Digest, DigestAlgorithm, DigestError, DigestHasher};
