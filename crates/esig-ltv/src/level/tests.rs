//! Extension scenarios across levels, encodings and collaborators.

use std::cell::Cell;

use chrono::{DateTime, TimeZone, Utc};

use crate::crypto::{DefaultDigestHasher, Digest, DigestAlgorithm, DigestHasher};
use crate::evidence::{
    CrlToken, EvidenceBinary, OcspToken, RevocationOrigin, SignatureEvidence, ValidityWindow,
};
use crate::identifier::{DigestFallbackResolver, Identifier, ResponderId};
use crate::level::{
    BaselineProfile, Base64UrlTranscoder, ComponentKind, ComponentPayload, EncodingMode,
    EncodingTranscoder, ExtensionError, ExtensionParameters, LevelExtender,
    RevocationDataSource, SignatureDocument, SignatureForm, SignatureLevel, TimestampError,
    TimestampSource, TimestampToken, decode_value,
};

const SIGNATURE: &[u8] = b"signature-value";

fn gen_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn level(profile: BaselineProfile) -> SignatureLevel {
    SignatureLevel::new(SignatureForm::Jades, profile)
}

fn params(profile: BaselineProfile, encoding: EncodingMode) -> ExtensionParameters {
    ExtensionParameters::new(level(profile)).with_encoding(encoding)
}

fn document(encoding: EncodingMode) -> SignatureDocument {
    SignatureDocument::new(SignatureForm::Jades, encoding, SIGNATURE.to_vec())
}

/// Authority that fails once it has issued `limit` tokens.
struct MockTsa {
    issued: Cell<usize>,
    limit: usize,
}

impl MockTsa {
    fn new() -> Self {
        Self::failing_after(usize::MAX)
    }

    fn failing_after(limit: usize) -> Self {
        Self {
            issued: Cell::new(0),
            limit,
        }
    }
}

impl TimestampSource for MockTsa {
    fn timestamp(&self, imprint: &Digest) -> Result<TimestampToken, TimestampError> {
        if self.issued.get() >= self.limit {
            return Err(TimestampError::Unavailable {
                reason: "connection refused".to_string(),
            });
        }
        self.issued.set(self.issued.get() + 1);
        Ok(TimestampToken {
            message_imprint: imprint.clone(),
            gen_time: gen_time(),
            encoded: imprint.value().to_vec(),
        })
    }
}

/// Source serving one CRL and one OCSP response.
struct MockRevocation;

impl RevocationDataSource for MockRevocation {
    fn crl_data(&self, _document: &SignatureDocument) -> Vec<(Vec<u8>, CrlToken)> {
        let bytes = b"crl-1".to_vec();
        let validity = ValidityWindow {
            this_update: gen_time(),
            next_update: None,
        };
        let token = CrlToken::new(revocation_id(&bytes), b"CN=CA".to_vec(), validity)
            .with_related_certificate("C-SIGNER");
        vec![(bytes, token)]
    }

    fn ocsp_data(&self, _document: &SignatureDocument) -> Vec<(Vec<u8>, OcspToken)> {
        let bytes = b"ocsp-1".to_vec();
        let validity = ValidityWindow {
            this_update: gen_time(),
            next_update: None,
        };
        let token = OcspToken::new(
            revocation_id(&bytes),
            ResponderId::by_key(vec![7u8; 20]),
            gen_time(),
            validity,
        )
        .with_related_certificate("C-SIGNER");
        vec![(bytes, token)]
    }
}

/// Source that has nothing for the signature.
struct EmptyRevocation;

impl RevocationDataSource for EmptyRevocation {
    fn crl_data(&self, _document: &SignatureDocument) -> Vec<(Vec<u8>, CrlToken)> {
        Vec::new()
    }

    fn ocsp_data(&self, _document: &SignatureDocument) -> Vec<(Vec<u8>, OcspToken)> {
        Vec::new()
    }
}

fn revocation_id(bytes: &[u8]) -> Identifier {
    let resolver = DigestFallbackResolver::new(DefaultDigestHasher, DigestAlgorithm::Sha256);
    Identifier::for_revocation_binary(&resolver, bytes).unwrap()
}

fn extend_to(
    doc: &SignatureDocument,
    profile: BaselineProfile,
    encoding: EncodingMode,
) -> Result<SignatureDocument, ExtensionError> {
    let tsa = MockTsa::new();
    LevelExtender::new(DefaultDigestHasher, &tsa)
        .with_revocation_source(&MockRevocation)
        .extend(doc, &params(profile, encoding))
}

#[test]
fn test_extension_to_current_level_is_rejected() {
    let lt = extend_to(&document(EncodingMode::Encoded), BaselineProfile::Lt, EncodingMode::Encoded)
        .unwrap();
    assert_eq!(lt.current_level(), level(BaselineProfile::Lt));

    let again = extend_to(&lt, BaselineProfile::Lt, EncodingMode::Encoded);
    assert!(matches!(
        again,
        Err(ExtensionError::IllegalLevelTransition { current, target })
            if current == level(BaselineProfile::Lt) && target == level(BaselineProfile::Lt)
    ));

    let lower = extend_to(&lt, BaselineProfile::T, EncodingMode::Encoded);
    assert!(matches!(
        lower,
        Err(ExtensionError::IllegalLevelTransition { .. })
    ));

    let lta = extend_to(&lt, BaselineProfile::Lta, EncodingMode::Encoded).unwrap();
    assert_eq!(lta.current_level(), level(BaselineProfile::Lta));
}

#[test]
fn test_extension_across_forms_is_rejected() {
    let tsa = MockTsa::new();
    let target = SignatureLevel::new(SignatureForm::Xades, BaselineProfile::T);
    let result = LevelExtender::new(DefaultDigestHasher, &tsa).extend(
        &document(EncodingMode::Clear),
        &ExtensionParameters::new(target),
    );
    assert!(matches!(
        result,
        Err(ExtensionError::IllegalLevelTransition { .. })
    ));
    assert_eq!(tsa.issued.get(), 0);
}

#[test]
fn test_level_check_precedes_canonicalization_check() {
    let lta = extend_to(
        &document(EncodingMode::Encoded),
        BaselineProfile::Lta,
        EncodingMode::Encoded,
    )
    .unwrap();
    let result = extend_to(&lta, BaselineProfile::Lta, EncodingMode::Clear);
    assert!(matches!(
        result,
        Err(ExtensionError::IllegalLevelTransition { .. })
    ));
}

#[test]
fn test_clear_archival_extension_needs_canonicalization() {
    let lt = extend_to(&document(EncodingMode::Clear), BaselineProfile::Lt, EncodingMode::Clear)
        .unwrap();
    let components_before = lt.components().to_vec();

    let err = extend_to(&lt, BaselineProfile::Lta, EncodingMode::Clear).unwrap_err();
    assert!(matches!(
        err,
        ExtensionError::MissingCanonicalizationMethod {
            container: "etsiU",
            ..
        }
    ));
    let message = err.to_string();
    assert!(message.contains("canonicalization method"));
    assert!(message.contains("encoding = encoded"));
    assert!(!message.contains("archive_timestamp.canonicalization_method"));
    assert_eq!(lt.components(), components_before.as_slice());
    assert_eq!(lt.current_level(), level(BaselineProfile::Lt));
}

#[test]
fn test_encoding_mismatch_names_setting() {
    let doc = document(EncodingMode::Clear);
    let err = extend_to(&doc, BaselineProfile::Lta, EncodingMode::Encoded).unwrap_err();
    assert!(matches!(
        err,
        ExtensionError::EncodingMismatch {
            document: EncodingMode::Clear,
            requested: EncodingMode::Encoded,
            ..
        }
    ));
    assert!(err.to_string().contains("encoding = clear"));

    let transcoded = Base64UrlTranscoder
        .transcode(&doc, EncodingMode::Encoded)
        .unwrap();
    let lta = extend_to(&transcoded, BaselineProfile::Lta, EncodingMode::Encoded).unwrap();
    assert_eq!(lta.current_level(), level(BaselineProfile::Lta));
}

#[test]
fn test_clear_extension_below_archival_level_succeeds() {
    let t = extend_to(&document(EncodingMode::Clear), BaselineProfile::T, EncodingMode::Clear)
        .unwrap();
    assert_eq!(t.current_level(), level(BaselineProfile::T));
    assert_eq!(t.components().len(), 1);
    assert!(matches!(
        t.components()[0].payload,
        ComponentPayload::Clear(_)
    ));
}

#[test]
fn test_basic_to_archival_adds_every_profile() {
    let tsa = MockTsa::new();
    let doc = document(EncodingMode::Encoded);
    let lta = LevelExtender::new(DefaultDigestHasher, &tsa)
        .with_revocation_source(&MockRevocation)
        .extend(&doc, &params(BaselineProfile::Lta, EncodingMode::Encoded))
        .unwrap();

    let kinds: Vec<ComponentKind> = lta.components().iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ComponentKind::SignatureTimestamp,
            ComponentKind::RevocationValues,
            ComponentKind::ArchiveTimestamp,
        ]
    );
    assert_eq!(tsa.issued.get(), 2);
    assert_eq!(lta.evidence().crl.revocation_values_tokens().len(), 1);
    assert_eq!(lta.evidence().ocsp.revocation_values_tokens().len(), 1);

    let ComponentPayload::Encoded(encoded) = &lta.components()[1].payload else {
        panic!("revocation values not encoded");
    };
    let values = decode_value(encoded).unwrap();
    assert_eq!(values["crlVals"].as_array().map(Vec::len), Some(1));
    assert_eq!(values["ocspVals"].as_array().map(Vec::len), Some(1));

    // The input document is left at the basic level.
    assert_eq!(doc.current_level(), level(BaselineProfile::B));
    assert!(doc.evidence().is_empty());
}

#[test]
fn test_archive_timestamp_covers_existing_components() {
    let lt = extend_to(&document(EncodingMode::Encoded), BaselineProfile::Lt, EncodingMode::Encoded)
        .unwrap();
    let data = lt.archive_data(level(BaselineProfile::Lta)).unwrap();
    let expected = DefaultDigestHasher
        .digest(DigestAlgorithm::Sha256, &data)
        .unwrap();

    let lta = extend_to(&lt, BaselineProfile::Lta, EncodingMode::Encoded).unwrap();
    let Some(ComponentPayload::Encoded(encoded)) = lta.components().last().map(|c| &c.payload)
    else {
        panic!("archive timestamp not encoded");
    };
    let token: TimestampToken = serde_json::from_value(decode_value(encoded).unwrap()).unwrap();
    assert_eq!(token.message_imprint, expected);
}

#[test]
fn test_failed_step_leaves_document_unchanged() {
    // The authority issues the signature timestamp, then fails on the
    // archive timestamp.
    let tsa = MockTsa::failing_after(1);
    let doc = document(EncodingMode::Encoded);
    let result = LevelExtender::new(DefaultDigestHasher, &tsa)
        .with_revocation_source(&MockRevocation)
        .extend(&doc, &params(BaselineProfile::Lta, EncodingMode::Encoded));

    assert!(matches!(
        result,
        Err(ExtensionError::Timestamp(TimestampError::Unavailable { .. }))
    ));
    assert_eq!(doc.current_level(), level(BaselineProfile::B));
    assert!(doc.components().is_empty());
    assert!(doc.evidence().is_empty());
}

#[test]
fn test_long_term_level_needs_revocation_data() {
    let tsa = MockTsa::new();
    let doc = document(EncodingMode::Encoded);
    let target = params(BaselineProfile::Lt, EncodingMode::Encoded);

    let without_source = LevelExtender::new(DefaultDigestHasher, &tsa).extend(&doc, &target);
    assert!(matches!(
        without_source,
        Err(ExtensionError::MissingRevocationData { .. })
    ));

    let empty_source = LevelExtender::new(DefaultDigestHasher, &tsa)
        .with_revocation_source(&EmptyRevocation)
        .extend(&doc, &target);
    assert!(matches!(
        empty_source,
        Err(ExtensionError::MissingRevocationData { .. })
    ));
    assert!(doc.components().is_empty());
    // Both requests stop before the signature timestamp is requested.
    assert_eq!(tsa.issued.get(), 0);
}

#[test]
fn test_long_term_level_from_embedded_evidence() {
    let bytes = b"crl-embedded".to_vec();
    let binary = EvidenceBinary::new(bytes.clone(), RevocationOrigin::RevocationValues);
    let validity = ValidityWindow {
        this_update: gen_time(),
        next_update: None,
    };
    let mut evidence = SignatureEvidence::default();
    evidence.crl.register_binary(binary.clone());
    evidence.crl.store(
        &binary,
        CrlToken::new(revocation_id(&bytes), b"CN=CA".to_vec(), validity)
            .with_related_certificate("C-SIGNER"),
    );
    let doc = document(EncodingMode::Encoded).with_evidence(evidence);

    let tsa = MockTsa::new();
    let lt = LevelExtender::new(DefaultDigestHasher, &tsa)
        .extend(&doc, &params(BaselineProfile::Lt, EncodingMode::Encoded))
        .unwrap();

    assert_eq!(lt.current_level(), level(BaselineProfile::Lt));
    assert_eq!(tsa.issued.get(), 1);
    let ComponentPayload::Encoded(encoded) = &lt.components()[1].payload else {
        panic!("revocation values not encoded");
    };
    let values = decode_value(encoded).unwrap();
    assert_eq!(values["crlVals"].as_array().map(Vec::len), Some(1));
    assert_eq!(values["ocspVals"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_missing_revocation_data_checked_before_timestamping() {
    let tsa = MockTsa::new();
    let result = LevelExtender::new(DefaultDigestHasher, &tsa).extend(
        &document(EncodingMode::Encoded),
        &params(BaselineProfile::Lta, EncodingMode::Encoded),
    );
    assert!(matches!(
        result,
        Err(ExtensionError::MissingRevocationData { target })
            if target == level(BaselineProfile::Lta)
    ));
    assert_eq!(tsa.issued.get(), 0);
}

#[test]
fn test_reference_only_evidence_is_not_revocation_values() {
    let bytes = b"crl-dss".to_vec();
    let binary = EvidenceBinary::new(bytes.clone(), RevocationOrigin::DssDictionary);
    let validity = ValidityWindow {
        this_update: gen_time(),
        next_update: None,
    };
    let mut evidence = SignatureEvidence::default();
    evidence.crl.register_binary(binary.clone());
    evidence.crl.store(
        &binary,
        CrlToken::new(revocation_id(&bytes), b"CN=CA".to_vec(), validity),
    );
    let doc = document(EncodingMode::Encoded).with_evidence(evidence);

    let tsa = MockTsa::new();
    let result = LevelExtender::new(DefaultDigestHasher, &tsa)
        .extend(&doc, &params(BaselineProfile::Lt, EncodingMode::Encoded));
    assert!(matches!(
        result,
        Err(ExtensionError::MissingRevocationData { .. })
    ));
    assert_eq!(tsa.issued.get(), 0);
}

#[test]
fn test_unsupported_imprint_algorithm_propagates() {
    let tsa = MockTsa::new();
    let mut request = params(BaselineProfile::T, EncodingMode::Clear);
    request
        .signature_timestamp_mut()
        .set_digest_algorithm(DigestAlgorithm::Sha1);

    let result = LevelExtender::new(DefaultDigestHasher, &tsa)
        .extend(&document(EncodingMode::Clear), &request);
    assert!(matches!(result, Err(ExtensionError::Digest(_))));
    assert_eq!(tsa.issued.get(), 0);
}

#[test]
fn test_validate_has_no_side_effects() {
    let tsa = MockTsa::new();
    let extender = LevelExtender::new(DefaultDigestHasher, &tsa);
    let doc = document(EncodingMode::Encoded);
    extender
        .validate(&doc, &params(BaselineProfile::Lta, EncodingMode::Encoded))
        .unwrap();
    assert_eq!(tsa.issued.get(), 0);
    assert!(doc.components().is_empty());
}
