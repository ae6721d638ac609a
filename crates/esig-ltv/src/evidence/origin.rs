//! Structural origins of revocation evidence.
//!
//! An origin records where, inside a signature container, a piece of
//! revocation evidence was found. Origins fall in two disjoint categories:
//! embedded values and references. Value origins each own one token
//! collection in a [`RevocationSource`](super::RevocationSource); reference
//! origins own one reference collection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of value origins, and therefore of token collections per store.
pub const VALUE_ORIGIN_COUNT: usize = 5;

/// Category of an origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OriginCategory {
    /// Full revocation data is embedded.
    Values,
    /// Only a reference to revocation data is embedded.
    References,
}

/// Location of revocation evidence within a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevocationOrigin {
    /// Signature-level revocation values.
    RevocationValues,
    /// Revocation values stored as an unsigned attribute.
    AttributeRevocationValues,
    /// Revocation values embedded inside a timestamp's validation data.
    TimestampRevocationValues,
    /// PDF document security store.
    DssDictionary,
    /// PDF validation-related-information dictionary.
    VriDictionary,
    /// Complete revocation references.
    CompleteRevocationRefs,
    /// Attribute revocation references.
    AttributeRevocationRefs,
}

impl RevocationOrigin {
    /// Value origins in collection order.
    pub const VALUES: [Self; VALUE_ORIGIN_COUNT] = [
        Self::RevocationValues,
        Self::AttributeRevocationValues,
        Self::TimestampRevocationValues,
        Self::DssDictionary,
        Self::VriDictionary,
    ];

    /// Returns the category of this origin.
    #[must_use]
    pub const fn category(&self) -> OriginCategory {
        match self {
            Self::RevocationValues
            | Self::AttributeRevocationValues
            | Self::TimestampRevocationValues
            | Self::DssDictionary
            | Self::VriDictionary => OriginCategory::Values,
            Self::CompleteRevocationRefs | Self::AttributeRevocationRefs => {
                OriginCategory::References
            },
        }
    }

    /// Returns the token collection slot of a value origin.
    ///
    /// Reference origins have no token collection and return `None`.
    #[must_use]
    pub const fn value_slot(&self) -> Option<usize> {
        match self {
            Self::RevocationValues => Some(0),
            Self::AttributeRevocationValues => Some(1),
            Self::TimestampRevocationValues => Some(2),
            Self::DssDictionary => Some(3),
            Self::VriDictionary => Some(4),
            Self::CompleteRevocationRefs | Self::AttributeRevocationRefs => None,
        }
    }

    /// Returns the canonical name of this origin.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RevocationValues => "REVOCATION_VALUES",
            Self::AttributeRevocationValues => "ATTRIBUTE_REVOCATION_VALUES",
            Self::TimestampRevocationValues => "TIMESTAMP_REVOCATION_VALUES",
            Self::DssDictionary => "DSS_DICTIONARY",
            Self::VriDictionary => "VRI_DICTIONARY",
            Self::CompleteRevocationRefs => "COMPLETE_REVOCATION_REFS",
            Self::AttributeRevocationRefs => "ATTRIBUTE_REVOCATION_REFS",
        }
    }
}

impl fmt::Display for RevocationOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Origin of a revocation reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefOrigin {
    /// Complete revocation references.
    Complete,
    /// Attribute revocation references.
    Attribute,
}

impl From<RefOrigin> for RevocationOrigin {
    fn from(origin: RefOrigin) -> Self {
        match origin {
            RefOrigin::Complete => Self::CompleteRevocationRefs,
            RefOrigin::Attribute => Self::AttributeRevocationRefs,
        }
    }
}
