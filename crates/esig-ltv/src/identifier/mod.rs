//! Content-addressed identifiers for evidence and references.
//!
//! An [`Identifier`] is `prefix + HEX(digest)`. It is a pure function of its
//! inputs and is used both as a map key inside the evidence stores and as the
//! stable name written into validation reports.
//!
//! ```rust
//! use esig_ltv::crypto::{DefaultDigestHasher, Digest, DigestAlgorithm};
//! use esig_ltv::identifier::{
//!     CERTIFICATE_REF_PREFIX, CertificateIdentifier, CertificateRef, DigestFallbackResolver,
//!     Identifier,
//! };
//!
//! let resolver = DigestFallbackResolver::new(DefaultDigestHasher, DigestAlgorithm::Sha256);
//! let reference = CertificateRef::with_identifier(CertificateIdentifier {
//!     ski: Some(vec![0xAB; 20]),
//!     ..CertificateIdentifier::default()
//! });
//!
//! let id = Identifier::for_certificate_ref(&resolver, &reference).unwrap();
//! assert!(id.as_str().starts_with(CERTIFICATE_REF_PREFIX));
//! ```

mod resolver;

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};
use thiserror::Error;

pub use resolver::{
    CertificateIdentifier, CertificateRef, DigestFallbackResolver, ResponderId,
    SKI_DIGEST_ALGORITHM,
};

use crate::crypto::{Digest, DigestError, DigestHasher};

/// Prefix of certificate reference identifiers.
pub const CERTIFICATE_REF_PREFIX: &str = "C-";

/// Prefix of revocation token and revocation reference identifiers.
pub const REVOCATION_PREFIX: &str = "R-";

/// Errors that can occur while computing an identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum IdentifierError {
    /// No usable field was present on the reference.
    #[error("identity undeterminable: {reason}")]
    IdentityUndeterminable {
        /// Which fields were expected.
        reason: String,
    },

    /// The digest primitive failed.
    #[error("digest computation failed: {0}")]
    Digest(#[from] DigestError),
}

/// A typed, content-derived identifier.
///
/// Equality and hashing are defined on the string form only, so two
/// identifiers built from the same prefix and digest bytes are equal whichever
/// fallback strategy produced the digest.
#[derive(Debug, Clone)]
pub struct Identifier {
    id: String,
    digest: Digest,
}

impl Identifier {
    /// Builds an identifier from a prefix and a digest.
    #[must_use]
    pub fn new(prefix: &str, digest: &Digest) -> Self {
        Self {
            id: format!("{prefix}{}", digest.hex_value()),
            digest: digest.clone(),
        }
    }

    /// Builds the `C-` identifier of a certificate reference.
    ///
    /// # Errors
    ///
    /// Propagates [`DigestFallbackResolver::resolve`] failures.
    pub fn for_certificate_ref<H: DigestHasher>(
        resolver: &DigestFallbackResolver<H>,
        reference: &CertificateRef,
    ) -> Result<Self, IdentifierError> {
        let digest = resolver.resolve(reference)?;
        Ok(Self::new(CERTIFICATE_REF_PREFIX, &digest))
    }

    /// Builds the `R-` identifier of an encoded revocation object.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::Digest`] if the resolver's algorithm is not
    /// supported by its hasher.
    pub fn for_revocation_binary<H: DigestHasher>(
        resolver: &DigestFallbackResolver<H>,
        encoded: &[u8],
    ) -> Result<Self, IdentifierError> {
        let digest = resolver.hasher().digest(resolver.algorithm(), encoded)?;
        Ok(Self::new(REVOCATION_PREFIX, &digest))
    }

    /// Returns the string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// Returns the digest this identifier was derived from.
    #[must_use]
    pub const fn digest(&self) -> &Digest {
        &self.digest
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<S: Hasher>(&self, state: &mut S) {
        self.id.hash(state);
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.id)
    }
}
