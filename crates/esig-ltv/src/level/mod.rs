//! Signature level state machine.
//!
//! A [`SignatureDocument`] computes its [`SignatureLevel`] from the unsigned
//! components it carries. [`LevelExtender`] moves a document to a higher
//! level of the same form, adding every intermediate profile in order, after
//! checking three preconditions:
//!
//! 1. the target is strictly above the current level
//!    ([`ExtensionError::IllegalLevelTransition`]);
//! 2. clear incorporation of archival evidence has a canonicalization method
//!    ([`ExtensionError::MissingCanonicalizationMethod`]);
//! 3. the request's encoding equals the document's
//!    ([`ExtensionError::EncodingMismatch`]).
//!
//! A failed extension leaves the input document untouched. Converting a
//! document's encoding is done beforehand with an [`EncodingTranscoder`].

mod document;
mod encoding;
mod error;
mod extender;
mod params;
mod signature_level;
mod transcode;

#[cfg(test)]
mod tests;

pub use document::{
    ComponentKind, ComponentPayload, SignatureDocument, TimestampToken, UnsignedComponent,
    decode_value, encode_value,
};
pub use encoding::EncodingMode;
pub use error::{ExtensionError, TimestampError};
pub use extender::{
    InMemoryWriter, LevelExtender, RevocationDataSource, TimestampSource,
    UnsignedPropertiesWriter,
};
pub use params::{ExtensionParameters, TimestampParameters};
pub use signature_level::{BaselineProfile, LevelParseError, SignatureForm, SignatureLevel};
pub use transcode::{Base64UrlTranscoder, EncodingTranscoder};
