//! Extension request parameters.

use super::encoding::EncodingMode;
use super::error::ExtensionError;
use super::signature_level::SignatureLevel;
use crate::config::LtvConfig;
use crate::crypto::DigestAlgorithm;

/// Parameters of one timestamp to be added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampParameters {
    digest_algorithm: DigestAlgorithm,
    canonicalization_method: Option<String>,
}

impl TimestampParameters {
    /// Creates parameters using `digest_algorithm` for the message imprint.
    #[must_use]
    pub const fn new(digest_algorithm: DigestAlgorithm) -> Self {
        Self {
            digest_algorithm,
            canonicalization_method: None,
        }
    }

    /// Returns the message imprint algorithm.
    #[must_use]
    pub const fn digest_algorithm(&self) -> DigestAlgorithm {
        self.digest_algorithm
    }

    /// Sets the message imprint algorithm.
    pub const fn set_digest_algorithm(&mut self, digest_algorithm: DigestAlgorithm) {
        self.digest_algorithm = digest_algorithm;
    }

    /// Returns the configured canonicalization method.
    #[must_use]
    pub fn canonicalization_method(&self) -> Option<&str> {
        self.canonicalization_method.as_deref()
    }

    /// Configures a canonicalization method for clear incorporation.
    ///
    /// # Errors
    ///
    /// Always returns [`ExtensionError::UnsupportedCanonicalization`]: no
    /// canonicalization method is supported end to end yet.
    #[allow(clippy::unused_self)]
    pub fn set_canonicalization_method(
        &mut self,
        method: impl Into<String>,
    ) -> Result<(), ExtensionError> {
        Err(ExtensionError::UnsupportedCanonicalization {
            method: method.into(),
        })
    }
}

impl Default for TimestampParameters {
    fn default() -> Self {
        Self::new(DigestAlgorithm::Sha256)
    }
}

/// A request to extend a signature to a higher level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionParameters {
    target_level: SignatureLevel,
    encoding: EncodingMode,
    signature_timestamp: TimestampParameters,
    archive_timestamp: TimestampParameters,
}

impl ExtensionParameters {
    /// Creates a request for `target_level` with clear encoding and SHA-256
    /// timestamps.
    #[must_use]
    pub fn new(target_level: SignatureLevel) -> Self {
        Self {
            target_level,
            encoding: EncodingMode::default(),
            signature_timestamp: TimestampParameters::default(),
            archive_timestamp: TimestampParameters::default(),
        }
    }

    /// Creates a request for `target_level` using configured defaults.
    #[must_use]
    pub fn from_config(config: &LtvConfig, target_level: SignatureLevel) -> Self {
        let algorithm = config.extension.timestamp_digest_algorithm;
        Self {
            target_level,
            encoding: config.extension.encoding,
            signature_timestamp: TimestampParameters::new(algorithm),
            archive_timestamp: TimestampParameters::new(algorithm),
        }
    }

    /// Sets the encoding mode the request declares.
    #[must_use]
    pub const fn with_encoding(mut self, encoding: EncodingMode) -> Self {
        self.encoding = encoding;
        self
    }

    /// Returns the requested level.
    #[must_use]
    pub const fn target_level(&self) -> SignatureLevel {
        self.target_level
    }

    /// Changes the requested level.
    pub const fn set_target_level(&mut self, target_level: SignatureLevel) {
        self.target_level = target_level;
    }

    /// Returns the declared encoding mode.
    #[must_use]
    pub const fn encoding(&self) -> EncodingMode {
        self.encoding
    }

    /// Changes the declared encoding mode.
    pub const fn set_encoding(&mut self, encoding: EncodingMode) {
        self.encoding = encoding;
    }

    /// Returns the signature timestamp parameters.
    #[must_use]
    pub const fn signature_timestamp(&self) -> &TimestampParameters {
        &self.signature_timestamp
    }

    /// Returns the signature timestamp parameters for modification.
    pub const fn signature_timestamp_mut(&mut self) -> &mut TimestampParameters {
        &mut self.signature_timestamp
    }

    /// Returns the archive timestamp parameters.
    #[must_use]
    pub const fn archive_timestamp(&self) -> &TimestampParameters {
        &self.archive_timestamp
    }

    /// Returns the archive timestamp parameters for modification.
    pub const fn archive_timestamp_mut(&mut self) -> &mut TimestampParameters {
        &mut self.archive_timestamp
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::level::{BaselineProfile, SignatureForm};

    #[test]
    fn test_canonicalization_method_cannot_be_set() {
        let mut params = ExtensionParameters::new(SignatureLevel::new(
            SignatureForm::Jades,
            BaselineProfile::Lta,
        ));
        let result = params
            .archive_timestamp_mut()
            .set_canonicalization_method("http://www.w3.org/2001/10/xml-exc-c14n#");
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            ExtensionError::UnsupportedCanonicalization { .. }
        ));
        assert!(
            err.to_string()
                .contains("canonicalization is not supported in the current version")
        );
        assert_eq!(params.archive_timestamp().canonicalization_method(), None);
    }

    #[test]
    fn test_from_config_uses_defaults() {
        let mut config = LtvConfig::default();
        config.extension.encoding = EncodingMode::Encoded;
        config.extension.timestamp_digest_algorithm = DigestAlgorithm::Sha512;
        let level = SignatureLevel::new(SignatureForm::Xades, BaselineProfile::T);

        let params = ExtensionParameters::from_config(&config, level);
        assert_eq!(params.encoding(), EncodingMode::Encoded);
        assert_eq!(params.target_level(), level);
        assert_eq!(
            params.signature_timestamp().digest_algorithm(),
            DigestAlgorithm::Sha512
        );
        assert_eq!(
            params.archive_timestamp().digest_algorithm(),
            DigestAlgorithm::Sha512
        );
    }
}
