//! In-memory view of a signature and its unsigned components.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::encoding::EncodingMode;
use super::error::ExtensionError;
use super::signature_level::{BaselineProfile, SignatureForm, SignatureLevel};
use crate::crypto::Digest;
use crate::evidence::SignatureEvidence;

/// A timestamp token returned by a timestamp authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampToken {
    /// Digest of the timestamped data.
    pub message_imprint: Digest,
    /// Generation time asserted by the authority.
    pub gen_time: DateTime<Utc>,
    /// Encoded token, base64url in serialized form.
    #[serde(with = "base64url")]
    pub encoded: Vec<u8>,
}

/// Kind of an unsigned component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    /// Signature timestamp.
    SignatureTimestamp,
    /// Revocation values.
    RevocationValues,
    /// Archive timestamp.
    ArchiveTimestamp,
}

impl ComponentKind {
    /// Returns the component header name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SignatureTimestamp => "sigTst",
            Self::RevocationValues => "rVals",
            Self::ArchiveTimestamp => "arcTst",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialized content of an unsigned component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentPayload {
    /// Structured value.
    Clear(serde_json::Value),
    /// base64url encoding of the value's JSON bytes.
    Encoded(String),
}

impl ComponentPayload {
    /// Returns the mode this payload is serialized in.
    #[must_use]
    pub const fn mode(&self) -> EncodingMode {
        match self {
            Self::Clear(_) => EncodingMode::Clear,
            Self::Encoded(_) => EncodingMode::Encoded,
        }
    }
}

/// One unsigned component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedComponent {
    /// Component kind.
    pub kind: ComponentKind,
    /// Serialized content.
    pub payload: ComponentPayload,
}

/// A signature being extended.
///
/// The level is not stored: [`current_level`](Self::current_level) derives
/// it from the components present.
#[derive(Debug, Clone)]
pub struct SignatureDocument {
    form: SignatureForm,
    encoding: EncodingMode,
    signature_value: Vec<u8>,
    components: Vec<UnsignedComponent>,
    evidence: SignatureEvidence,
}

impl SignatureDocument {
    /// Creates a basic signature without unsigned components.
    #[must_use]
    pub fn new(
        form: SignatureForm,
        encoding: EncodingMode,
        signature_value: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            form,
            encoding,
            signature_value: signature_value.into(),
            components: Vec::new(),
            evidence: SignatureEvidence::default(),
        }
    }

    /// Attaches the evidence ingested from the parsed container.
    #[must_use]
    pub fn with_evidence(mut self, evidence: SignatureEvidence) -> Self {
        self.evidence = evidence;
        self
    }

    /// Returns the signature form.
    #[must_use]
    pub const fn form(&self) -> SignatureForm {
        self.form
    }

    /// Returns the recorded encoding mode.
    #[must_use]
    pub const fn encoding(&self) -> EncodingMode {
        self.encoding
    }

    /// Returns the signature value.
    #[must_use]
    pub fn signature_value(&self) -> &[u8] {
        &self.signature_value
    }

    /// Returns the unsigned components, in incorporation order.
    #[must_use]
    pub fn components(&self) -> &[UnsignedComponent] {
        &self.components
    }

    /// Returns the revocation evidence carried by the signature.
    #[must_use]
    pub const fn evidence(&self) -> &SignatureEvidence {
        &self.evidence
    }

    pub(crate) fn evidence_mut(&mut self) -> &mut SignatureEvidence {
        &mut self.evidence
    }

    /// Appends a component as read from the container or produced by a
    /// writer.
    pub fn push_component(&mut self, component: UnsignedComponent) {
        self.components.push(component);
    }

    pub(crate) fn replace_components(
        &mut self,
        encoding: EncodingMode,
        components: Vec<UnsignedComponent>,
    ) {
        self.encoding = encoding;
        self.components = components;
    }

    /// Returns `true` if a component of `kind` is present.
    #[must_use]
    pub fn has_component(&self, kind: ComponentKind) -> bool {
        self.components.iter().any(|c| c.kind == kind)
    }

    /// Computes the level from the embedded material.
    #[must_use]
    pub fn current_level(&self) -> SignatureLevel {
        let steps = [
            ComponentKind::SignatureTimestamp,
            ComponentKind::RevocationValues,
            ComponentKind::ArchiveTimestamp,
        ];
        let mut profile = BaselineProfile::B;
        for kind in steps {
            match profile.next() {
                Some(next) if self.has_component(kind) => profile = next,
                _ => break,
            }
        }
        SignatureLevel::new(self.form, profile)
    }

    /// Returns the byte sequence covered by an archive timestamp: the
    /// signature value followed by every unsigned component.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::MissingCanonicalizationMethod`] if any
    /// component is in clear form, since clear components have no defined
    /// byte serialization without canonicalization.
    pub fn archive_data(&self, target: SignatureLevel) -> Result<Vec<u8>, ExtensionError> {
        let mut data = self.signature_value.clone();
        for component in &self.components {
            match &component.payload {
                ComponentPayload::Encoded(encoded) => {
                    data.extend_from_slice(component.kind.as_str().as_bytes());
                    data.extend_from_slice(encoded.as_bytes());
                },
                ComponentPayload::Clear(_) => {
                    return Err(ExtensionError::MissingCanonicalizationMethod {
                        target,
                        container: self.form.unsigned_container(),
                    });
                },
            }
        }
        Ok(data)
    }
}

/// Encodes a component value as base64url JSON.
///
/// # Errors
///
/// Returns [`ExtensionError::Serialization`] if the value cannot be
/// serialized.
pub fn encode_value(value: &serde_json::Value) -> Result<String, ExtensionError> {
    Ok(URL_SAFE_NO_PAD.encode(serde_json::to_vec(value)?))
}

/// Decodes a base64url JSON component value.
///
/// # Errors
///
/// Returns [`ExtensionError::Transcoding`] if the text is not base64url, or
/// [`ExtensionError::Serialization`] if it does not hold JSON.
pub fn decode_value(encoded: &str) -> Result<serde_json::Value, ExtensionError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|e| ExtensionError::Transcoding {
            reason: format!("invalid base64url component: {e}"),
        })?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub(crate) mod base64url {
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&URL_SAFE_NO_PAD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        URL_SAFE_NO_PAD
            .decode(s)
            .map_err(serde::de::Error::custom)
    }
}
