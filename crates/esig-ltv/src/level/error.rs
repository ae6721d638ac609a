//! Level extension error types.

use thiserror::Error;

use super::encoding::EncodingMode;
use super::signature_level::SignatureLevel;
use crate::crypto::DigestError;

/// Errors reported by a timestamp authority.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TimestampError {
    /// The authority could not issue a token.
    #[error("timestamp authority unavailable: {reason}")]
    Unavailable {
        /// Authority-provided reason.
        reason: String,
    },

    /// The authority does not support the requested imprint algorithm.
    #[error("timestamp authority rejected imprint algorithm {algorithm}")]
    UnsupportedImprint {
        /// The rejected algorithm name.
        algorithm: String,
    },
}

/// Errors that can occur while extending a signature.
///
/// The precondition variants are raised before anything is modified; the
/// document passed to the extender is never altered.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtensionError {
    /// The target level is not strictly above the current level of the same
    /// form.
    #[error(
        "cannot extend a {current} signature to {target}: the target level must be strictly \
         higher than the current level within the same signature form"
    )]
    IllegalLevelTransition {
        /// Level computed from the document.
        current: SignatureLevel,
        /// Requested level.
        target: SignatureLevel,
    },

    /// Clear incorporation of archival evidence needs canonicalization.
    #[error(
        "unable to extend to {target}: clear '{container}' incorporation requires a \
         canonicalization method, which is not supported; transcode the signature and use \
         encoding = encoded"
    )]
    MissingCanonicalizationMethod {
        /// Requested level.
        target: SignatureLevel,
        /// Name of the unsigned component container.
        container: &'static str,
    },

    /// Canonicalization cannot be configured in this version.
    #[error("canonicalization is not supported in the current version (requested: {method})")]
    UnsupportedCanonicalization {
        /// The requested method URI.
        method: String,
    },

    /// The requested encoding differs from the document's.
    #[error(
        "extension is not possible: the encoding of '{container}' components shall match; use \
         encoding = {document} in the extension parameters (requested {requested})"
    )]
    EncodingMismatch {
        /// Mode recorded on the document.
        document: EncodingMode,
        /// Mode declared by the extension request.
        requested: EncodingMode,
        /// Name of the unsigned component container.
        container: &'static str,
    },

    /// No revocation data was available for the long-term level.
    #[error("unable to extend to {target}: no revocation data is available for the signature")]
    MissingRevocationData {
        /// Requested level.
        target: SignatureLevel,
    },

    /// Timestamp issuance failed.
    #[error("timestamp issuance failed: {0}")]
    Timestamp(#[from] TimestampError),

    /// Digest computation failed.
    #[error("digest computation failed: {0}")]
    Digest(#[from] DigestError),

    /// A component could not be serialized.
    #[error("component serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Converting between encoding modes failed.
    #[error("transcoding failed: {reason}")]
    Transcoding {
        /// What could not be converted.
        reason: String,
    },
}
