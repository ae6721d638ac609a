//! Signature level extension.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use super::document::{
    ComponentKind, ComponentPayload, SignatureDocument, TimestampToken, UnsignedComponent,
    encode_value,
};
use super::encoding::EncodingMode;
use super::error::{ExtensionError, TimestampError};
use super::params::{ExtensionParameters, TimestampParameters};
use super::signature_level::{BaselineProfile, SignatureLevel};
use crate::crypto::{Digest, DigestHasher};
use crate::evidence::{
    CrlToken, EvidenceBinary, EvidenceReference, EvidenceToken, OcspToken, RevocationOrigin,
    RevocationSource,
};

/// A timestamp authority.
pub trait TimestampSource {
    /// Issues a timestamp token over `imprint`.
    ///
    /// # Errors
    ///
    /// Returns a [`TimestampError`] if no token can be issued.
    fn timestamp(&self, imprint: &Digest) -> Result<TimestampToken, TimestampError>;
}

/// Supplies revocation data for the certificates of a signature.
///
/// Each entry pairs the encoded CRL or OCSP response with the token decoded
/// from it.
pub trait RevocationDataSource {
    /// CRLs covering the signature's certificate chain.
    fn crl_data(&self, document: &SignatureDocument) -> Vec<(Vec<u8>, CrlToken)>;

    /// OCSP responses covering the signature's certificate chain.
    fn ocsp_data(&self, document: &SignatureDocument) -> Vec<(Vec<u8>, OcspToken)>;
}

/// Serializes new evidence into a signature's unsigned components.
pub trait UnsignedPropertiesWriter {
    /// Appends `value` as a component of `kind`, serialized in the
    /// document's encoding mode.
    ///
    /// # Errors
    ///
    /// Returns an [`ExtensionError`] if the value cannot be serialized.
    fn incorporate(
        &self,
        document: &mut SignatureDocument,
        kind: ComponentKind,
        value: Value,
    ) -> Result<(), ExtensionError>;
}

/// Writer appending components to the in-memory document.
#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryWriter;

impl UnsignedPropertiesWriter for InMemoryWriter {
    fn incorporate(
        &self,
        document: &mut SignatureDocument,
        kind: ComponentKind,
        value: Value,
    ) -> Result<(), ExtensionError> {
        let payload = match document.encoding() {
            EncodingMode::Clear => ComponentPayload::Clear(value),
            EncodingMode::Encoded => ComponentPayload::Encoded(encode_value(&value)?),
        };
        document.push_component(UnsignedComponent { kind, payload });
        Ok(())
    }
}

/// Validates and executes level transitions.
///
/// # Example
///
/// ```rust,ignore
/// let extender = LevelExtender::new(DefaultDigestHasher, &tsa)
///     .with_revocation_source(&revocation);
/// let extended = extender.extend(&document, &params)?;
/// assert_eq!(extended.current_level(), params.target_level());
/// ```
pub struct LevelExtender<'a, H> {
    hasher: H,
    timestamps: &'a dyn TimestampSource,
    revocation: Option<&'a dyn RevocationDataSource>,
    writer: &'a dyn UnsignedPropertiesWriter,
}

impl<'a, H: DigestHasher> LevelExtender<'a, H> {
    /// Creates an extender writing through [`InMemoryWriter`] and without a
    /// revocation data source.
    #[must_use]
    pub fn new(hasher: H, timestamps: &'a dyn TimestampSource) -> Self {
        Self {
            hasher,
            timestamps,
            revocation: None,
            writer: &InMemoryWriter,
        }
    }

    /// Sets a source of fresh revocation data for the long-term step.
    ///
    /// Without one, the long-term step uses the revocation values already
    /// held in the document's stores.
    #[must_use]
    pub fn with_revocation_source(mut self, revocation: &'a dyn RevocationDataSource) -> Self {
        self.revocation = Some(revocation);
        self
    }

    /// Replaces the component writer.
    #[must_use]
    pub fn with_writer(mut self, writer: &'a dyn UnsignedPropertiesWriter) -> Self {
        self.writer = writer;
        self
    }

    /// Checks the extension preconditions without modifying anything.
    ///
    /// # Errors
    ///
    /// In evaluation order:
    /// - [`ExtensionError::IllegalLevelTransition`] if the target is not
    ///   strictly above the current level of the same form
    /// - [`ExtensionError::MissingCanonicalizationMethod`] if clear
    ///   incorporation of archival evidence is requested without a
    ///   canonicalization method
    /// - [`ExtensionError::EncodingMismatch`] if the requested encoding
    ///   differs from the document's
    pub fn validate(
        &self,
        document: &SignatureDocument,
        params: &ExtensionParameters,
    ) -> Result<(), ExtensionError> {
        let result = check_preconditions(document, params);
        if let Err(err) = &result {
            warn!(
                current = %document.current_level(),
                target = %params.target_level(),
                error = %err,
                "rejected signature extension"
            );
        }
        result
    }

    /// Extends `document` to the requested level.
    ///
    /// Every intermediate profile is added in order. The input document is
    /// never modified; on success the returned document's computed level is
    /// the target level.
    ///
    /// # Errors
    ///
    /// - Any precondition error of [`validate`](Self::validate)
    /// - [`ExtensionError::MissingRevocationData`] if the long-term step is
    ///   needed and neither the document's stores nor the revocation data
    ///   source provide revocation values; no timestamp is requested then
    /// - [`ExtensionError::Timestamp`] if the timestamp authority fails
    /// - [`ExtensionError::Digest`] if an imprint cannot be computed
    pub fn extend(
        &self,
        document: &SignatureDocument,
        params: &ExtensionParameters,
    ) -> Result<SignatureDocument, ExtensionError> {
        self.validate(document, params)?;

        let target = params.target_level();
        let mut extended = document.clone();
        let mut profile = extended.current_level().profile();
        if profile < BaselineProfile::Lt && target.profile() >= BaselineProfile::Lt {
            self.gather_revocation_data(&mut extended, target)?;
        }
        while let Some(next) = profile.next().filter(|next| *next <= target.profile()) {
            match next {
                BaselineProfile::T => self.add_signature_timestamp(&mut extended, params)?,
                BaselineProfile::Lt => self.add_revocation_values(&mut extended)?,
                BaselineProfile::Lta => self.add_archive_timestamp(&mut extended, params)?,
                BaselineProfile::B => {},
            }
            debug!(level = %SignatureLevel::new(target.form(), next), "added profile");
            profile = next;
        }

        info!(
            from = %document.current_level(),
            to = %extended.current_level(),
            encoding = %extended.encoding(),
            "extended signature"
        );
        Ok(extended)
    }

    fn add_signature_timestamp(
        &self,
        document: &mut SignatureDocument,
        params: &ExtensionParameters,
    ) -> Result<(), ExtensionError> {
        let value =
            self.timestamp_value(params.signature_timestamp(), document.signature_value())?;
        self.writer
            .incorporate(document, ComponentKind::SignatureTimestamp, value)
    }

    /// Admits fresh revocation data into the document's stores and checks
    /// that signature-level revocation values are available.
    fn gather_revocation_data(
        &self,
        document: &mut SignatureDocument,
        target: SignatureLevel,
    ) -> Result<(), ExtensionError> {
        if let Some(source) = self.revocation {
            let crls = source.crl_data(document);
            let ocsps = source.ocsp_data(document);
            let evidence = document.evidence_mut();
            admit(&mut evidence.crl, crls);
            admit(&mut evidence.ocsp, ocsps);
        }

        let evidence = document.evidence();
        if evidence.crl.revocation_values_tokens().is_empty()
            && evidence.ocsp.revocation_values_tokens().is_empty()
        {
            let err = ExtensionError::MissingRevocationData { target };
            warn!(
                current = %document.current_level(),
                target = %target,
                error = %err,
                "rejected signature extension"
            );
            return Err(err);
        }
        Ok(())
    }

    fn add_revocation_values(
        &self,
        document: &mut SignatureDocument,
    ) -> Result<(), ExtensionError> {
        let evidence = document.evidence();
        let value = json!({
            "crlVals": revocation_values(&evidence.crl),
            "ocspVals": revocation_values(&evidence.ocsp),
        });
        self.writer
            .incorporate(document, ComponentKind::RevocationValues, value)
    }

    fn add_archive_timestamp(
        &self,
        document: &mut SignatureDocument,
        params: &ExtensionParameters,
    ) -> Result<(), ExtensionError> {
        let data = document.archive_data(params.target_level())?;
        let value = self.timestamp_value(params.archive_timestamp(), &data)?;
        self.writer
            .incorporate(document, ComponentKind::ArchiveTimestamp, value)
    }

    fn timestamp_value(
        &self,
        params: &TimestampParameters,
        data: &[u8],
    ) -> Result<Value, ExtensionError> {
        let imprint = self.hasher.digest(params.digest_algorithm(), data)?;
        let token = self.timestamps.timestamp(&imprint)?;
        Ok(serde_json::to_value(token)?)
    }
}

fn check_preconditions(
    document: &SignatureDocument,
    params: &ExtensionParameters,
) -> Result<(), ExtensionError> {
    let current = document.current_level();
    let target = params.target_level();
    if !current.can_extend_to(&target) {
        return Err(ExtensionError::IllegalLevelTransition { current, target });
    }

    let container = document.form().unsigned_container();
    if params.encoding() == EncodingMode::Clear
        && target.profile().requires_canonicalized_evidence()
        && params.archive_timestamp().canonicalization_method().is_none()
    {
        return Err(ExtensionError::MissingCanonicalizationMethod { target, container });
    }

    if params.encoding() != document.encoding() {
        return Err(ExtensionError::EncodingMismatch {
            document: document.encoding(),
            requested: params.encoding(),
            container,
        });
    }
    Ok(())
}

fn admit<T: EvidenceToken, R: EvidenceReference>(
    store: &mut RevocationSource<T, R>,
    data: Vec<(Vec<u8>, T)>,
) {
    for (encoded, token) in data {
        let binary = EvidenceBinary::new(encoded, RevocationOrigin::RevocationValues);
        store.register_binary(binary.clone());
        store.store(&binary, token);
    }
}

/// Encodes the signature-level revocation value binaries of `store`.
fn revocation_values<T: EvidenceToken, R: EvidenceReference>(
    store: &RevocationSource<T, R>,
) -> Vec<String> {
    store
        .token_map()
        .into_iter()
        .filter(|(binary, tokens)| {
            binary.origin() == RevocationOrigin::RevocationValues && !tokens.is_empty()
        })
        .map(|(binary, _)| STANDARD.encode(binary.encoded()))
        .collect()
}
