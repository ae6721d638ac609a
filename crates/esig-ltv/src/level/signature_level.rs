//! Signature assurance levels.
//!
//! Levels are ordered within one signature form only:
//!
//! ```text
//! B ──timestamp──> T ──revocation values──> LT ──archive timestamp──> LTA
//! ```
//!
//! Comparing levels of two different forms yields no ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error parsing a level or form name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown signature level: {value}")]
pub struct LevelParseError {
    /// The unrecognized value.
    pub value: String,
}

/// Signature format family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureForm {
    /// XML advanced electronic signatures.
    Xades,
    /// CMS advanced electronic signatures.
    Cades,
    /// PDF advanced electronic signatures.
    Pades,
    /// JSON advanced electronic signatures.
    Jades,
}

impl SignatureForm {
    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Xades => "XAdES",
            Self::Cades => "CAdES",
            Self::Pades => "PAdES",
            Self::Jades => "JAdES",
        }
    }

    /// Returns the name of the container holding unsigned components, as it
    /// appears in error messages.
    #[must_use]
    pub const fn unsigned_container(&self) -> &'static str {
        match self {
            Self::Xades => "UnsignedProperties",
            Self::Cades => "unsignedAttrs",
            Self::Pades => "DSS",
            Self::Jades => "etsiU",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "XADES" => Some(Self::Xades),
            "CADES" => Some(Self::Cades),
            "PADES" => Some(Self::Pades),
            "JADES" => Some(Self::Jades),
            _ => None,
        }
    }
}

impl fmt::Display for SignatureForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Baseline profile, totally ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BaselineProfile {
    /// Basic signature.
    B,
    /// Signature with a signature timestamp.
    T,
    /// Signature with long-term validation material.
    Lt,
    /// Signature with an archive timestamp.
    Lta,
}

impl BaselineProfile {
    /// All profiles in ascending order.
    pub const ALL: [Self; 4] = [Self::B, Self::T, Self::Lt, Self::Lta];

    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::B => "B",
            Self::T => "T",
            Self::Lt => "LT",
            Self::Lta => "LTA",
        }
    }

    /// Returns the next profile, if any.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::B => Some(Self::T),
            Self::T => Some(Self::Lt),
            Self::Lt => Some(Self::Lta),
            Self::Lta => None,
        }
    }

    /// Returns `true` if reaching this profile appends structured evidence
    /// that is digested as part of a canonicalized byte sequence.
    #[must_use]
    pub const fn requires_canonicalized_evidence(&self) -> bool {
        matches!(self, Self::Lta)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "B" => Some(Self::B),
            "T" => Some(Self::T),
            "LT" => Some(Self::Lt),
            "LTA" => Some(Self::Lta),
            _ => None,
        }
    }
}

impl fmt::Display for BaselineProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signature level: a profile within a signature form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignatureLevel {
    form: SignatureForm,
    profile: BaselineProfile,
}

impl SignatureLevel {
    /// Creates a level.
    #[must_use]
    pub const fn new(form: SignatureForm, profile: BaselineProfile) -> Self {
        Self { form, profile }
    }

    /// Returns the signature form.
    #[must_use]
    pub const fn form(&self) -> SignatureForm {
        self.form
    }

    /// Returns the baseline profile.
    #[must_use]
    pub const fn profile(&self) -> BaselineProfile {
        self.profile
    }

    /// Returns all levels of `form`, in ascending order.
    #[must_use]
    pub fn levels(form: SignatureForm) -> [Self; 4] {
        BaselineProfile::ALL.map(|profile| Self::new(form, profile))
    }

    /// Returns `true` if `other` can be reached from `self` by extension.
    #[must_use]
    pub fn can_extend_to(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Less)
    }
}

impl PartialOrd for SignatureLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.form == other.form).then(|| self.profile.cmp(&other.profile))
    }
}

impl fmt::Display for SignatureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-BASELINE-{}", self.form, self.profile)
    }
}

impl FromStr for SignatureLevel {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || LevelParseError {
            value: s.to_string(),
        };
        let mut parts = s.split('-');
        let form = parts.next().and_then(SignatureForm::parse).ok_or_else(err)?;
        if !parts.next().is_some_and(|p| p.eq_ignore_ascii_case("BASELINE")) {
            return Err(err());
        }
        let profile = parts.next().and_then(BaselineProfile::parse).ok_or_else(err)?;
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(Self::new(form, profile))
    }
}

impl Serialize for SignatureLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SignatureLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    const JADES_LT: SignatureLevel = SignatureLevel::new(SignatureForm::Jades, BaselineProfile::Lt);
    const JADES_LTA: SignatureLevel =
        SignatureLevel::new(SignatureForm::Jades, BaselineProfile::Lta);

    #[test]
    fn test_order_within_form() {
        let levels = SignatureLevel::levels(SignatureForm::Xades);
        for pair in levels.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].can_extend_to(&pair[1]));
            assert!(!pair[1].can_extend_to(&pair[0]));
        }
        assert!(!JADES_LT.can_extend_to(&JADES_LT));
    }

    #[test]
    fn test_no_order_across_forms() {
        let cades_b = SignatureLevel::new(SignatureForm::Cades, BaselineProfile::B);
        assert_eq!(cades_b.partial_cmp(&JADES_LTA), None);
        assert!(!cades_b.can_extend_to(&JADES_LTA));
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(JADES_LTA.to_string(), "JAdES-BASELINE-LTA");
        assert_eq!("JAdES-BASELINE-LTA".parse::<SignatureLevel>().unwrap(), JADES_LTA);
        assert_eq!(
            "pades-baseline-t".parse::<SignatureLevel>().unwrap(),
            SignatureLevel::new(SignatureForm::Pades, BaselineProfile::T)
        );
        for bad in ["", "JAdES", "JAdES-LTA", "JAdES-BASELINE-X", "JAdES-BASELINE-LT-1"] {
            assert!(bad.parse::<SignatureLevel>().is_err(), "{bad}");
        }
    }

    #[test]
    fn test_serde_string_form() {
        let json = serde_json::to_string(&JADES_LT).unwrap();
        assert_eq!(json, r#""JAdES-BASELINE-LT""#);
        let back: SignatureLevel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, JADES_LT);
    }

    #[test]
    fn test_only_lta_requires_canonicalization() {
        for profile in BaselineProfile::ALL {
            assert_eq!(
                profile.requires_canonicalized_evidence(),
                profile == BaselineProfile::Lta
            );
        }
    }

    #[test]
    fn test_next_profile_chain() {
        assert_eq!(BaselineProfile::B.next(), Some(BaselineProfile::T));
        assert_eq!(BaselineProfile::Lt.next(), Some(BaselineProfile::Lta));
        assert_eq!(BaselineProfile::Lta.next(), None);
    }
}
