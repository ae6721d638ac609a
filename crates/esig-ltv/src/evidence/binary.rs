//! Encoded revocation objects.

use std::sync::Arc;

use super::origin::RevocationOrigin;

/// Raw encoding of one CRL or OCSP response, tagged with where it was found.
///
/// Binaries compare by value: two binaries with the same bytes and the same
/// origin are the same binary. The bytes are shared, so cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EvidenceBinary {
    encoded: Arc<[u8]>,
    origin: RevocationOrigin,
}

impl EvidenceBinary {
    /// Wraps encoded revocation bytes.
    #[must_use]
    pub fn new(encoded: impl Into<Vec<u8>>, origin: RevocationOrigin) -> Self {
        Self {
            encoded: Arc::from(encoded.into()),
            origin,
        }
    }

    /// Returns the encoded bytes.
    #[must_use]
    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    /// Returns the origin.
    #[must_use]
    pub const fn origin(&self) -> RevocationOrigin {
        self.origin
    }

    /// Returns the same bytes under another origin.
    #[must_use]
    pub fn with_origin(&self, origin: RevocationOrigin) -> Self {
        Self {
            encoded: Arc::clone(&self.encoded),
            origin,
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_equality_is_by_content_and_origin() {
        let a = EvidenceBinary::new(b"crl".to_vec(), RevocationOrigin::RevocationValues);
        let b = EvidenceBinary::new(b"crl".to_vec(), RevocationOrigin::RevocationValues);
        assert_eq!(a, b);

        let c = a.with_origin(RevocationOrigin::DssDictionary);
        assert_ne!(a, c);
        assert_eq!(a.encoded(), c.encoded());
    }
}
