//! # esig-ltv
//!
//! Long-term validation evidence for advanced electronic signatures.
//!
//! This crate models the evidence a signature carries for long-term
//! validation and the upgrade of a signature's assurance level:
//!
//! - [`identifier`]: content-addressed identifiers for certificate and
//!   revocation references, with a digest fallback when no explicit
//!   identifier is embedded
//! - [`evidence`]: categorized, deduplicating CRL and OCSP stores fed from
//!   every structural location of a signature
//! - [`level`]: the B → T → LT → LTA state machine and its preconditions
//! - [`config`]: TOML configuration of digest algorithms and extension
//!   defaults
//!
//! Parsing containers, decoding CRLs and OCSP responses, fetching
//! revocation data and talking to timestamp authorities are left to the
//! embedding toolkit, reached through the traits of each module.
//!
//! ## Example
//!
//! ```rust
//! use esig_ltv::prelude::*;
//!
//! let doc = SignatureDocument::new(SignatureForm::Jades, EncodingMode::Clear, b"sig".to_vec());
//! assert_eq!(doc.current_level().to_string(), "JAdES-BASELINE-B");
//!
//! let target: SignatureLevel = "JAdES-BASELINE-LTA".parse().unwrap();
//! assert!(doc.current_level().can_extend_to(&target));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod crypto;
pub mod evidence;
pub mod identifier;
pub mod level;

// Re-export main types at crate root for convenience
pub use config::{ConfigError, LtvConfig};
pub use crypto::{DefaultDigestHasher, Digest, DigestAlgorithm, DigestError, DigestHasher};
pub use evidence::{SignatureCrlSource, SignatureEvidence, SignatureOcspSource};
pub use identifier::{DigestFallbackResolver, Identifier, IdentifierError};
pub use level::{ExtensionError, LevelExtender, SignatureDocument, SignatureLevel};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::LtvConfig;
    pub use crate::crypto::{DefaultDigestHasher, Digest, DigestAlgorithm, DigestHasher};
    pub use crate::evidence::{
        CrlRef, CrlToken, EmbeddedEvidenceReader, EvidenceBinary, EvidenceIngestor,
        EvidenceToken, OcspRef, OcspToken, RefOrigin, RevocationOrigin, RevocationParser,
        SignatureCrlSource, SignatureEvidence, SignatureOcspSource,
    };
    pub use crate::identifier::{CertificateRef, DigestFallbackResolver, Identifier};
    pub use crate::level::{
        BaselineProfile, Base64UrlTranscoder, EncodingMode, EncodingTranscoder, ExtensionError,
        ExtensionParameters, LevelExtender, RevocationDataSource, SignatureDocument,
        SignatureForm, SignatureLevel, TimestampSource,
    };
}
