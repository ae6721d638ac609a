//! Revocation references.
//!
//! A reference stands in for revocation data that is not embedded at the
//! location where the reference is found.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::crypto::{Digest, DigestHasher};
use crate::identifier::{
    DigestFallbackResolver, Identifier, IdentifierError, REVOCATION_PREFIX, ResponderId,
};

/// Behaviour shared by CRL and OCSP references.
pub trait EvidenceReference: Clone + PartialEq + fmt::Debug {
    /// Computes the stable identifier of the referenced revocation object.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::IdentityUndeterminable`] when the
    /// reference carries nothing identity can be derived from.
    fn identifier<H: DigestHasher>(
        &self,
        resolver: &DigestFallbackResolver<H>,
    ) -> Result<Identifier, IdentifierError>;
}

/// Reference to a CRL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrlRef {
    /// Digest of the referenced CRL.
    pub digest: Digest,
    /// Encoded CRL issuer name.
    pub crl_issuer_encoded: Option<Vec<u8>>,
    /// CRL issue time.
    pub crl_issued_time: Option<DateTime<Utc>>,
}

impl CrlRef {
    /// Creates a reference from the CRL digest alone.
    #[must_use]
    pub const fn new(digest: Digest) -> Self {
        Self {
            digest,
            crl_issuer_encoded: None,
            crl_issued_time: None,
        }
    }
}

impl EvidenceReference for CrlRef {
    fn identifier<H: DigestHasher>(
        &self,
        _resolver: &DigestFallbackResolver<H>,
    ) -> Result<Identifier, IdentifierError> {
        Ok(Identifier::new(REVOCATION_PREFIX, &self.digest))
    }
}

/// Reference to an OCSP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcspRef {
    /// Digest of the referenced response, when embedded.
    pub digest: Option<Digest>,
    /// Responder that produced the referenced response.
    pub responder_id: ResponderId,
    /// `producedAt` of the referenced response.
    pub produced_at: DateTime<Utc>,
}

impl OcspRef {
    /// Creates a reference without a response digest.
    #[must_use]
    pub const fn new(responder_id: ResponderId, produced_at: DateTime<Utc>) -> Self {
        Self {
            digest: None,
            responder_id,
            produced_at,
        }
    }

    /// Attaches the response digest.
    #[must_use]
    pub fn with_digest(mut self, digest: Digest) -> Self {
        self.digest = Some(digest);
        self
    }
}

impl EvidenceReference for OcspRef {
    /// Uses the response digest when present. Otherwise the responder
    /// identity is resolved and bound to `producedAt`, since one responder
    /// signs many responses.
    fn identifier<H: DigestHasher>(
        &self,
        resolver: &DigestFallbackResolver<H>,
    ) -> Result<Identifier, IdentifierError> {
        if let Some(digest) = &self.digest {
            return Ok(Identifier::new(REVOCATION_PREFIX, digest));
        }
        let responder = resolver.resolve_responder(&self.responder_id)?;
        let mut preimage = responder.value().to_vec();
        preimage.extend_from_slice(
            self.produced_at
                .to_rfc3339_opts(SecondsFormat::Secs, true)
                .as_bytes(),
        );
        let digest = resolver
            .hasher()
            .digest(resolver.algorithm(), &preimage)?;
        Ok(Identifier::new(REVOCATION_PREFIX, &digest))
    }
}
