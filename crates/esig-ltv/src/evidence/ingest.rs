//! Ingestion of the evidence a parsed signature carries.
//!
//! The container parser and the CRL/OCSP decoders live outside this crate;
//! they are reached through [`EmbeddedEvidenceReader`] and
//! [`RevocationParser`]. Ingestion registers every binary first, then stores
//! the tokens parsed from it, then records references after checking that
//! their identity can be computed.

use thiserror::Error;
use tracing::debug;

use super::binary::EvidenceBinary;
use super::origin::RefOrigin;
use super::reference::{CrlRef, EvidenceReference, OcspRef};
use super::store::{SignatureCrlSource, SignatureOcspSource};
use super::token::{CrlToken, OcspToken};
use crate::crypto::DigestHasher;
use crate::identifier::{DigestFallbackResolver, IdentifierError};

/// Errors that abort ingestion of a signature's evidence.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    /// A reference carried no usable identity.
    #[error("revocation reference identity: {0}")]
    Identifier(#[from] IdentifierError),

    /// The external decoder rejected a binary.
    #[error("failed to parse {revocation_type} binary: {reason}")]
    Parse {
        /// `CRL` or `OCSP`.
        revocation_type: String,
        /// Decoder message.
        reason: String,
    },
}

/// Read access to the evidence embedded in one parsed signature.
pub trait EmbeddedEvidenceReader {
    /// Encoded CRLs, tagged with their structural origin.
    fn crl_binaries(&self) -> Vec<EvidenceBinary>;

    /// Encoded OCSP responses, tagged with their structural origin.
    fn ocsp_binaries(&self) -> Vec<EvidenceBinary>;

    /// CRL references.
    fn crl_references(&self) -> Vec<(CrlRef, RefOrigin)> {
        Vec::new()
    }

    /// OCSP references.
    fn ocsp_references(&self) -> Vec<(OcspRef, RefOrigin)> {
        Vec::new()
    }
}

/// Decoder turning binaries into tokens.
///
/// A decoder may return several tokens for one binary when the revocation
/// data matches several candidate certificates.
pub trait RevocationParser {
    /// Decodes a CRL.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Parse`] if the binary is not a CRL.
    fn parse_crl(&self, binary: &EvidenceBinary) -> Result<Vec<CrlToken>, IngestError>;

    /// Decodes an OCSP response.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Parse`] if the binary is not an OCSP response.
    fn parse_ocsp(&self, binary: &EvidenceBinary) -> Result<Vec<OcspToken>, IngestError>;
}

/// The CRL and OCSP stores of one signature.
#[derive(Debug, Clone, Default)]
pub struct SignatureEvidence {
    /// CRL evidence.
    pub crl: SignatureCrlSource,
    /// OCSP evidence.
    pub ocsp: SignatureOcspSource,
}

impl SignatureEvidence {
    /// Returns `true` if neither store holds anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.crl.is_empty() && self.ocsp.is_empty()
    }

    /// Merges tokens a sibling signature materialized for binaries this
    /// signature also carries. Returns the number of tokens filed.
    pub fn share_from(&mut self, sibling: &Self) -> usize {
        self.crl.populate_from(&sibling.crl) + self.ocsp.populate_from(&sibling.ocsp)
    }
}

/// Builds [`SignatureEvidence`] from parsed signatures.
#[derive(Debug)]
pub struct EvidenceIngestor<'a, H, P> {
    resolver: &'a DigestFallbackResolver<H>,
    parser: &'a P,
}

impl<'a, H: DigestHasher, P: RevocationParser> EvidenceIngestor<'a, H, P> {
    /// Creates an ingestor.
    #[must_use]
    pub const fn new(resolver: &'a DigestFallbackResolver<H>, parser: &'a P) -> Self {
        Self { resolver, parser }
    }

    /// Ingests the evidence of a single signature.
    ///
    /// # Errors
    ///
    /// - [`IngestError::Parse`] if a binary cannot be decoded
    /// - [`IngestError::Identifier`] if a reference has no computable
    ///   identity
    pub fn ingest<E: EmbeddedEvidenceReader + ?Sized>(
        &self,
        reader: &E,
    ) -> Result<SignatureEvidence, IngestError> {
        let mut evidence = SignatureEvidence::default();

        for binary in reader.crl_binaries() {
            let tokens = self.parser.parse_crl(&binary)?;
            evidence.crl.register_binary(binary.clone());
            for token in tokens {
                evidence.crl.store(&binary, token);
            }
        }
        for binary in reader.ocsp_binaries() {
            let tokens = self.parser.parse_ocsp(&binary)?;
            evidence.ocsp.register_binary(binary.clone());
            for token in tokens {
                evidence.ocsp.store(&binary, token);
            }
        }
        for (reference, origin) in reader.crl_references() {
            reference.identifier(self.resolver)?;
            evidence.crl.add_reference(reference, origin);
        }
        for (reference, origin) in reader.ocsp_references() {
            reference.identifier(self.resolver)?;
            evidence.ocsp.add_reference(reference, origin);
        }

        debug!(
            crl_binaries = evidence.crl.known_binaries().len(),
            ocsp_binaries = evidence.ocsp.known_binaries().len(),
            "ingested signature evidence"
        );
        Ok(evidence)
    }

    /// Ingests sibling signatures of one container.
    ///
    /// Each signature is ingested on its own; afterwards every signature
    /// receives the tokens its siblings materialized for binaries it also
    /// carries. Nothing is copied for binaries a signature does not carry.
    ///
    /// # Errors
    ///
    /// Same as [`ingest`](Self::ingest); the first failing signature aborts
    /// the whole container.
    pub fn ingest_container<E: EmbeddedEvidenceReader>(
        &self,
        readers: &[E],
    ) -> Result<Vec<SignatureEvidence>, IngestError> {
        let ingested = readers
            .iter()
            .map(|reader| self.ingest(reader))
            .collect::<Result<Vec<_>, _>>()?;

        let mut shared = ingested.clone();
        for (i, target) in shared.iter_mut().enumerate() {
            for (j, sibling) in ingested.iter().enumerate() {
                if i != j {
                    target.share_from(sibling);
                }
            }
        }
        Ok(shared)
    }
}
