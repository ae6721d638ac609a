//! Revocation evidence carried by signatures.
//!
//! This module provides the categorized, deduplicating evidence stores used
//! by validators and by the level extender:
//!
//! - [`RevocationOrigin`] / [`RefOrigin`]: where evidence was found
//! - [`EvidenceBinary`]: raw encoded CRL or OCSP response
//! - [`CrlToken`] / [`OcspToken`]: materialized revocation data
//! - [`CrlRef`] / [`OcspRef`]: references to revocation data
//! - [`RevocationSource`]: the generic per-signature store, instantiated as
//!   [`SignatureCrlSource`] and [`SignatureOcspSource`]
//! - [`EvidenceIngestor`]: fills [`SignatureEvidence`] from parsed
//!   signatures
//!
//! # Example
//!
//! ```rust
//! use esig_ltv::evidence::{EvidenceBinary, RevocationOrigin, SignatureCrlSource};
//!
//! let mut source = SignatureCrlSource::new();
//! let binary = EvidenceBinary::new(b"...".to_vec(), RevocationOrigin::DssDictionary);
//! source.register_binary(binary);
//! assert!(source.dss_dictionary_tokens().is_empty());
//! ```

mod binary;
mod ingest;
mod origin;
mod reference;
mod store;
mod token;

#[cfg(test)]
mod proptest_store;

pub use binary::EvidenceBinary;
pub use ingest::{
    EmbeddedEvidenceReader, EvidenceIngestor, IngestError, RevocationParser, SignatureEvidence,
};
pub use origin::{OriginCategory, RefOrigin, RevocationOrigin, VALUE_ORIGIN_COUNT};
pub use reference::{CrlRef, EvidenceReference, OcspRef};
pub use store::{RevocationSource, SignatureCrlSource, SignatureOcspSource};
pub use token::{
    CrlToken, EvidenceToken, OcspToken, RevocationStatus, RevocationType, ValidityWindow,
};
