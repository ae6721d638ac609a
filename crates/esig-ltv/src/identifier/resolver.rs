//! Digest fallback resolution for certificate and responder references.
//!
//! A reference embedded in a signature does not always carry the digest of
//! the certificate it points to. When it does not, a stable digest is rebuilt
//! from whatever the reference does carry, in decreasing order of precision:
//!
//! 1. explicit certificate digest
//! 2. subject key identifier (labelled SHA-1, not re-hashed)
//! 3. encoded issuer name and serial number
//! 4. encoded issuer name
//! 5. responder identity (SKI, then principal name)
//!
//! The first populated field wins. Fields are never combined.

use serde::{Deserialize, Serialize};

use super::IdentifierError;
use crate::crypto::{Digest, DigestAlgorithm, DigestHasher};

/// Algorithm label attached to SKI-based identities.
///
/// RFC 6960 defines the `byKey` responder identifier as the SHA-1 hash of the
/// responder's public key; SKI values are carried through unchanged under
/// this label regardless of the configured general algorithm.
pub const SKI_DIGEST_ALGORITHM: DigestAlgorithm = DigestAlgorithm::Sha1;

/// Issuer-side identification of a certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertificateIdentifier {
    /// Subject key identifier.
    pub ski: Option<Vec<u8>>,
    /// DER encoding of the `IssuerSerial` structure.
    pub issuer_serial_encoded: Option<Vec<u8>>,
    /// DER encoding of the issuer distinguished name.
    pub issuer_name_encoded: Option<Vec<u8>>,
}

/// Identity of an OCSP responder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResponderId {
    /// `byKey` identifier.
    pub ski: Option<Vec<u8>>,
    /// DER encoding of the `byName` principal.
    pub principal_encoded: Option<Vec<u8>>,
}

impl ResponderId {
    /// Creates a `byKey` responder identity.
    #[must_use]
    pub fn by_key(ski: impl Into<Vec<u8>>) -> Self {
        Self {
            ski: Some(ski.into()),
            principal_encoded: None,
        }
    }

    /// Creates a `byName` responder identity.
    #[must_use]
    pub fn by_name(principal_encoded: impl Into<Vec<u8>>) -> Self {
        Self {
            ski: None,
            principal_encoded: Some(principal_encoded.into()),
        }
    }
}

/// A reference to a certificate as found in a signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertificateRef {
    /// Digest of the referenced certificate, when embedded.
    pub cert_digest: Option<Digest>,
    /// Issuer-based identification.
    pub certificate_identifier: Option<CertificateIdentifier>,
    /// Responder identity, for references taken from OCSP responses.
    pub responder_id: Option<ResponderId>,
}

impl CertificateRef {
    /// Creates a reference carrying an explicit digest.
    #[must_use]
    pub fn with_digest(digest: Digest) -> Self {
        Self {
            cert_digest: Some(digest),
            ..Self::default()
        }
    }

    /// Creates a reference carrying issuer-based identification only.
    #[must_use]
    pub fn with_identifier(identifier: CertificateIdentifier) -> Self {
        Self {
            certificate_identifier: Some(identifier),
            ..Self::default()
        }
    }

    /// Creates a reference carrying a responder identity only.
    #[must_use]
    pub fn with_responder(responder_id: ResponderId) -> Self {
        Self {
            responder_id: Some(responder_id),
            ..Self::default()
        }
    }
}

/// Resolves references to stable digests.
#[derive(Debug, Clone)]
pub struct DigestFallbackResolver<H> {
    hasher: H,
    algorithm: DigestAlgorithm,
}

impl<H: DigestHasher> DigestFallbackResolver<H> {
    /// Creates a resolver hashing reconstructed identities with `algorithm`.
    #[must_use]
    pub const fn new(hasher: H, algorithm: DigestAlgorithm) -> Self {
        Self { hasher, algorithm }
    }

    /// Returns the general algorithm used for reconstructed identities.
    #[must_use]
    pub const fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Returns the underlying hasher.
    #[must_use]
    pub const fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Resolves a certificate reference to a digest.
    ///
    /// # Errors
    ///
    /// - [`IdentifierError::IdentityUndeterminable`] if no usable field is
    ///   present
    /// - [`IdentifierError::Digest`] if the hasher cannot compute the
    ///   configured algorithm
    pub fn resolve(&self, reference: &CertificateRef) -> Result<Digest, IdentifierError> {
        if let Some(digest) = &reference.cert_digest {
            return Ok(digest.clone());
        }
        if let Some(identifier) = &reference.certificate_identifier {
            if let Some(ski) = &identifier.ski {
                return Ok(Digest::new(SKI_DIGEST_ALGORITHM, ski.clone()));
            }
            if let Some(encoded) = &identifier.issuer_serial_encoded {
                return self.hash(encoded);
            }
            if let Some(encoded) = &identifier.issuer_name_encoded {
                return self.hash(encoded);
            }
        }
        if let Some(responder_id) = &reference.responder_id {
            if let Some(digest) = self.resolve_responder_fields(responder_id)? {
                return Ok(digest);
            }
        }
        Err(IdentifierError::IdentityUndeterminable {
            reason: "one of [cert_digest, ski, issuer_serial, issuer_name, responder_id] must be \
                     defined for a certificate reference"
                .to_string(),
        })
    }

    /// Resolves a responder identity to a digest.
    ///
    /// # Errors
    ///
    /// Same as [`resolve`](Self::resolve).
    pub fn resolve_responder(&self, responder_id: &ResponderId) -> Result<Digest, IdentifierError> {
        self.resolve_responder_fields(responder_id)?
            .ok_or_else(|| IdentifierError::IdentityUndeterminable {
                reason: "one of [ski, principal] must be defined for a responder id".to_string(),
            })
    }

    fn resolve_responder_fields(
        &self,
        responder_id: &ResponderId,
    ) -> Result<Option<Digest>, IdentifierError> {
        if let Some(ski) = &responder_id.ski {
            return Ok(Some(Digest::new(SKI_DIGEST_ALGORITHM, ski.clone())));
        }
        if let Some(principal) = &responder_id.principal_encoded {
            return self.hash(principal).map(Some);
        }
        Ok(None)
    }

    fn hash(&self, bytes: &[u8]) -> Result<Digest, IdentifierError> {
        Ok(self.hasher.digest(self.algorithm, bytes)?)
    }
}
