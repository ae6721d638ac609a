//! Configuration parsing.
//!
//! The LTV layer is configured from a small TOML document:
//!
//! ```toml
//! [digest]
//! algorithm = "SHA256"
//!
//! [extension]
//! encoding = "encoded"
//! timestamp_digest_algorithm = "SHA512"
//! ```
//!
//! Every key is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::crypto::{DigestAlgorithm, DigestHasher};
use crate::identifier::{DigestFallbackResolver, SKI_DIGEST_ALGORITHM};
use crate::level::EncodingMode;

/// Top-level LTV configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LtvConfig {
    /// Identity digest settings.
    #[serde(default)]
    pub digest: DigestConfig,

    /// Defaults for extension requests.
    #[serde(default)]
    pub extension: ExtensionConfig,
}

impl LtvConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or
    /// [`validate`](Self::validate) rejects it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks the configured algorithms.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if SHA-1 is configured for
    /// identity digests or timestamp imprints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.digest.algorithm == SKI_DIGEST_ALGORITHM {
            return Err(ConfigError::Validation(format!(
                "digest.algorithm = {} is reserved for subject key identifiers",
                self.digest.algorithm
            )));
        }
        if self.extension.timestamp_digest_algorithm == DigestAlgorithm::Sha1 {
            return Err(ConfigError::Validation(
                "extension.timestamp_digest_algorithm must not be SHA1".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the identity resolver for the configured algorithm.
    #[must_use]
    pub const fn resolver<H: DigestHasher>(&self, hasher: H) -> DigestFallbackResolver<H> {
        DigestFallbackResolver::new(hasher, self.digest.algorithm)
    }
}

/// Identity digest settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DigestConfig {
    /// Algorithm used for every identity digest except subject key
    /// identifiers.
    #[serde(default = "default_algorithm")]
    pub algorithm: DigestAlgorithm,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
        }
    }
}

/// Defaults applied to new extension requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtensionConfig {
    /// Encoding declared by extension requests.
    #[serde(default)]
    pub encoding: EncodingMode,

    /// Message imprint algorithm for timestamps.
    #[serde(default = "default_algorithm")]
    pub timestamp_digest_algorithm: DigestAlgorithm,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            encoding: EncodingMode::default(),
            timestamp_digest_algorithm: default_algorithm(),
        }
    }
}

const fn default_algorithm() -> DigestAlgorithm {
    DigestAlgorithm::Sha256
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading configuration file.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Validation error.
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::crypto::DefaultDigestHasher;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = LtvConfig::from_toml("").unwrap();
        assert_eq!(config, LtvConfig::default());
        assert_eq!(config.digest.algorithm, DigestAlgorithm::Sha256);
        assert_eq!(config.extension.encoding, EncodingMode::Clear);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [digest]
            algorithm = "SHA384"

            [extension]
            encoding = "encoded"
            timestamp_digest_algorithm = "BLAKE3"
        "#;

        let config = LtvConfig::from_toml(toml).unwrap();
        assert_eq!(config.digest.algorithm, DigestAlgorithm::Sha384);
        assert_eq!(config.extension.encoding, EncodingMode::Encoded);
        assert_eq!(
            config.extension.timestamp_digest_algorithm,
            DigestAlgorithm::Blake3
        );
        assert_eq!(
            config.resolver(DefaultDigestHasher).algorithm(),
            DigestAlgorithm::Sha384
        );
    }

    #[test]
    fn test_sha1_rejected() {
        let toml = r#"
            [digest]
            algorithm = "SHA1"
        "#;
        assert!(matches!(
            LtvConfig::from_toml(toml),
            Err(ConfigError::Validation(_))
        ));

        let toml = r#"
            [extension]
            timestamp_digest_algorithm = "SHA1"
        "#;
        assert!(matches!(
            LtvConfig::from_toml(toml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let toml = r#"
            [extension]
            canonicalization = "exc-c14n"
        "#;
        assert!(matches!(LtvConfig::from_toml(toml), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = LtvConfig::default();
        config.extension.encoding = EncodingMode::Encoded;
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("encoding = \"encoded\""));
        assert_eq!(LtvConfig::from_toml(&toml).unwrap(), config);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[digest]\nalgorithm = \"SHA512\"").unwrap();

        let config = LtvConfig::from_file(file.path()).unwrap();
        assert_eq!(config.digest.algorithm, DigestAlgorithm::Sha512);

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            LtvConfig::from_file(&missing),
            Err(ConfigError::Io(_))
        ));
    }
}
