//! Conversion of a document's component encoding.

use tracing::debug;

use super::document::{
    ComponentPayload, SignatureDocument, UnsignedComponent, decode_value, encode_value,
};
use super::encoding::EncodingMode;
use super::error::ExtensionError;

/// Converts a document between encoding modes.
///
/// Extension never calls a transcoder; callers run one before
/// [`LevelExtender::extend`](super::LevelExtender::extend) when the document
/// and the request disagree on the encoding.
pub trait EncodingTranscoder {
    /// Returns a copy of `document` with every component in `mode`.
    ///
    /// # Errors
    ///
    /// Returns an [`ExtensionError`] if a component cannot be converted.
    fn transcode(
        &self,
        document: &SignatureDocument,
        mode: EncodingMode,
    ) -> Result<SignatureDocument, ExtensionError>;
}

/// Transcoder between clear JSON values and base64url JSON tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64UrlTranscoder;

impl Base64UrlTranscoder {
    /// Converts every clear component to its base64url form.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::Serialization`] if a value cannot be
    /// serialized.
    pub fn to_encoded(
        &self,
        document: &SignatureDocument,
    ) -> Result<SignatureDocument, ExtensionError> {
        self.transcode(document, EncodingMode::Encoded)
    }

    /// Converts every encoded component back to a clear value.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::Transcoding`] if a component is not valid
    /// base64url JSON.
    pub fn to_clear(
        &self,
        document: &SignatureDocument,
    ) -> Result<SignatureDocument, ExtensionError> {
        self.transcode(document, EncodingMode::Clear)
    }
}

impl EncodingTranscoder for Base64UrlTranscoder {
    fn transcode(
        &self,
        document: &SignatureDocument,
        mode: EncodingMode,
    ) -> Result<SignatureDocument, ExtensionError> {
        let components = document
            .components()
            .iter()
            .map(|component| {
                Ok(UnsignedComponent {
                    kind: component.kind,
                    payload: convert(&component.payload, mode)?,
                })
            })
            .collect::<Result<Vec<_>, ExtensionError>>()?;

        let mut converted = document.clone();
        converted.replace_components(mode, components);
        debug!(
            from = %document.encoding(),
            to = %mode,
            components = converted.components().len(),
            "transcoded unsigned components"
        );
        Ok(converted)
    }
}

fn convert(
    payload: &ComponentPayload,
    mode: EncodingMode,
) -> Result<ComponentPayload, ExtensionError> {
    Ok(match (payload, mode) {
        (ComponentPayload::Clear(value), EncodingMode::Encoded) => {
            ComponentPayload::Encoded(encode_value(value)?)
        },
        (ComponentPayload::Encoded(encoded), EncodingMode::Clear) => {
            ComponentPayload::Clear(decode_value(encoded)?)
        },
        (payload, _) => payload.clone(),
    })
}

#[cfg(test)]
mod unit_tests {
    use serde_json::json;

    use super::*;
    use crate::level::{ComponentKind, SignatureForm};

    fn clear_document() -> SignatureDocument {
        let mut doc =
            SignatureDocument::new(SignatureForm::Jades, EncodingMode::Clear, b"sig".to_vec());
        doc.push_component(UnsignedComponent {
            kind: ComponentKind::SignatureTimestamp,
            payload: ComponentPayload::Clear(json!({"genTime": "2024-05-01T00:00:00Z"})),
        });
        doc.push_component(UnsignedComponent {
            kind: ComponentKind::RevocationValues,
            payload: ComponentPayload::Clear(json!({"crlVals": ["AAEC"], "ocspVals": []})),
        });
        doc
    }

    #[test]
    fn test_to_encoded_converts_every_component() {
        let doc = clear_document();
        let encoded = Base64UrlTranscoder.to_encoded(&doc).unwrap();

        assert_eq!(encoded.encoding(), EncodingMode::Encoded);
        assert!(
            encoded
                .components()
                .iter()
                .all(|c| c.payload.mode() == EncodingMode::Encoded)
        );
        assert_eq!(encoded.current_level(), doc.current_level());
        // The source document is left as it was.
        assert_eq!(doc.encoding(), EncodingMode::Clear);
    }

    #[test]
    fn test_clear_encoded_clear_restores_values() {
        let doc = clear_document();
        let back = Base64UrlTranscoder
            .to_clear(&Base64UrlTranscoder.to_encoded(&doc).unwrap())
            .unwrap();
        assert_eq!(back.components(), doc.components());
        assert_eq!(back.encoding(), EncodingMode::Clear);
    }

    #[test]
    fn test_to_clear_rejects_invalid_token() {
        let mut doc =
            SignatureDocument::new(SignatureForm::Jades, EncodingMode::Encoded, b"sig".to_vec());
        doc.push_component(UnsignedComponent {
            kind: ComponentKind::SignatureTimestamp,
            payload: ComponentPayload::Encoded("%%%".to_string()),
        });
        assert!(matches!(
            Base64UrlTranscoder.to_clear(&doc),
            Err(ExtensionError::Transcoding { .. })
        ));
    }
}
