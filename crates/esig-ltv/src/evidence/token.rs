//! Materialized revocation tokens.
//!
//! Tokens are produced by an external parser from an [`EvidenceBinary`]. One
//! binary can back several tokens, one per certificate the revocation data
//! was matched against, so a token's identity for deduplication is its
//! content identifier together with its related certificate.
//!
//! [`EvidenceBinary`]: super::EvidenceBinary

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifier::{Identifier, ResponderId};

/// Revocation technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RevocationType {
    /// Certificate revocation list.
    Crl,
    /// Online certificate status protocol response.
    Ocsp,
}

impl RevocationType {
    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Crl => "CRL",
            Self::Ocsp => "OCSP",
        }
    }
}

impl fmt::Display for RevocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status reported for the related certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevocationStatus {
    /// The certificate was not revoked.
    Good,
    /// The certificate was revoked.
    Revoked {
        /// Revocation time.
        revoked_at: DateTime<Utc>,
        /// CRL reason code name, when present.
        reason: Option<String>,
    },
    /// The issuer does not know the certificate.
    Unknown,
}

/// Validity window of a revocation object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityWindow {
    /// `thisUpdate`.
    pub this_update: DateTime<Utc>,
    /// `nextUpdate`, when present.
    pub next_update: Option<DateTime<Utc>>,
}

impl ValidityWindow {
    /// Returns `true` if `at` falls within the window.
    ///
    /// A window without `nextUpdate` is open-ended.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.this_update && self.next_update.is_none_or(|next| at <= next)
    }
}

/// Behaviour shared by CRL and OCSP tokens.
pub trait EvidenceToken: Clone + PartialEq + fmt::Debug {
    /// Revocation technology of this token type.
    const REVOCATION_TYPE: RevocationType;

    /// Content identifier of the underlying revocation object.
    fn dss_id(&self) -> &Identifier;

    /// Identifier of the certificate this status applies to.
    fn related_certificate_id(&self) -> Option<&str>;

    /// Validity window.
    fn validity(&self) -> &ValidityWindow;

    /// Reported status.
    fn status(&self) -> &RevocationStatus;

    /// Deduplication key: content identifier plus related certificate.
    fn dedup_key(&self) -> (String, Option<String>) {
        (
            self.dss_id().as_str().to_string(),
            self.related_certificate_id().map(str::to_string),
        )
    }
}

/// A parsed CRL, bound to one certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrlToken {
    dss_id: Identifier,
    issuer_name_encoded: Vec<u8>,
    validity: ValidityWindow,
    status: RevocationStatus,
    related_certificate_id: Option<String>,
}

impl CrlToken {
    /// Creates a CRL token with an unknown status and no related certificate.
    #[must_use]
    pub fn new(
        dss_id: Identifier,
        issuer_name_encoded: impl Into<Vec<u8>>,
        validity: ValidityWindow,
    ) -> Self {
        Self {
            dss_id,
            issuer_name_encoded: issuer_name_encoded.into(),
            validity,
            status: RevocationStatus::Unknown,
            related_certificate_id: None,
        }
    }

    /// Binds the token to a certificate.
    #[must_use]
    pub fn with_related_certificate(mut self, certificate_id: impl Into<String>) -> Self {
        self.related_certificate_id = Some(certificate_id.into());
        self
    }

    /// Sets the status found for the related certificate.
    #[must_use]
    pub fn with_status(mut self, status: RevocationStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns the encoded CRL issuer name.
    #[must_use]
    pub fn issuer_name_encoded(&self) -> &[u8] {
        &self.issuer_name_encoded
    }
}

impl EvidenceToken for CrlToken {
    const REVOCATION_TYPE: RevocationType = RevocationType::Crl;

    fn dss_id(&self) -> &Identifier {
        &self.dss_id
    }

    fn related_certificate_id(&self) -> Option<&str> {
        self.related_certificate_id.as_deref()
    }

    fn validity(&self) -> &ValidityWindow {
        &self.validity
    }

    fn status(&self) -> &RevocationStatus {
        &self.status
    }
}

/// A parsed OCSP response, bound to one certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcspToken {
    dss_id: Identifier,
    responder_id: ResponderId,
    produced_at: DateTime<Utc>,
    validity: ValidityWindow,
    status: RevocationStatus,
    related_certificate_id: Option<String>,
}

impl OcspToken {
    /// Creates an OCSP token with an unknown status and no related
    /// certificate.
    #[must_use]
    pub const fn new(
        dss_id: Identifier,
        responder_id: ResponderId,
        produced_at: DateTime<Utc>,
        validity: ValidityWindow,
    ) -> Self {
        Self {
            dss_id,
            responder_id,
            produced_at,
            validity,
            status: RevocationStatus::Unknown,
            related_certificate_id: None,
        }
    }

    /// Binds the token to a certificate.
    #[must_use]
    pub fn with_related_certificate(mut self, certificate_id: impl Into<String>) -> Self {
        self.related_certificate_id = Some(certificate_id.into());
        self
    }

    /// Sets the status found for the related certificate.
    #[must_use]
    pub fn with_status(mut self, status: RevocationStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns the responder identity.
    #[must_use]
    pub const fn responder_id(&self) -> &ResponderId {
        &self.responder_id
    }

    /// Returns `producedAt`.
    #[must_use]
    pub const fn produced_at(&self) -> DateTime<Utc> {
        self.produced_at
    }
}

impl EvidenceToken for OcspToken {
    const REVOCATION_TYPE: RevocationType = RevocationType::Ocsp;

    fn dss_id(&self) -> &Identifier {
        &self.dss_id
    }

    fn related_certificate_id(&self) -> Option<&str> {
        self.related_certificate_id.as_deref()
    }

    fn validity(&self) -> &ValidityWindow {
        &self.validity
    }

    fn status(&self) -> &RevocationStatus {
        &self.status
    }
}
