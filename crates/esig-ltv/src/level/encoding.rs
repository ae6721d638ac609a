//! Serialization mode of unsigned components.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a signature's unsigned components are serialized.
///
/// The mode is fixed for a document's lifetime: extension never re-encodes
/// existing components. Converting a document is a separate, explicit step
/// (see [`EncodingTranscoder`](super::EncodingTranscoder)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingMode {
    /// Structured, human-readable components.
    #[default]
    Clear,
    /// Each component is an opaque base64url token.
    Encoded,
}

impl EncodingMode {
    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Encoded => "encoded",
        }
    }
}

impl fmt::Display for EncodingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
