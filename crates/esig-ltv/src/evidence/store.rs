//! Per-signature revocation evidence store.
//!
//! A [`RevocationSource`] holds the revocation evidence one signature
//! carries, for one revocation technology. It is instantiated twice per
//! signature, as [`SignatureCrlSource`] and [`SignatureOcspSource`]; the two
//! instances never interact.
//!
//! # Admission
//!
//! Tokens are only admitted for binaries that were first registered through
//! [`RevocationSource::register_binary`]. This keeps the store from holding
//! evidence the container never carried. A token for an unknown binary is
//! silently dropped: the same external evidence set is routinely queried
//! against several independent stores.
//!
//! # Deduplication
//!
//! - Binaries: registered at most once (value equality).
//! - Tokens per binary: appended only if not structurally equal to one
//!   already present.
//! - Token collections: filtered on read by `(dss id, related certificate)`,
//!   first seen wins. Reads are idempotent.
//! - References: filtered eagerly on write.
//!
//! All accessors return owned snapshots.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use super::binary::EvidenceBinary;
use super::origin::{RefOrigin, RevocationOrigin, VALUE_ORIGIN_COUNT};
use super::reference::{CrlRef, EvidenceReference, OcspRef};
use super::token::{CrlToken, EvidenceToken, OcspToken};

/// CRL evidence carried by a signature.
pub type SignatureCrlSource = RevocationSource<CrlToken, CrlRef>;

/// OCSP evidence carried by a signature.
pub type SignatureOcspSource = RevocationSource<OcspToken, OcspRef>;

/// Categorized revocation evidence for one signature and one revocation
/// technology.
#[derive(Debug, Clone)]
pub struct RevocationSource<T, R> {
    /// Registered binaries, in registration order.
    binaries: Vec<EvidenceBinary>,
    /// Tokens materialized from each registered binary.
    token_map: HashMap<EvidenceBinary, Vec<T>>,
    /// One token collection per value origin, indexed by
    /// [`RevocationOrigin::value_slot`].
    values: [Vec<T>; VALUE_ORIGIN_COUNT],
    complete_refs: Vec<R>,
    attribute_refs: Vec<R>,
}

impl<T, R> Default for RevocationSource<T, R> {
    fn default() -> Self {
        Self {
            binaries: Vec::new(),
            token_map: HashMap::new(),
            values: Default::default(),
            complete_refs: Vec::new(),
            attribute_refs: Vec::new(),
        }
    }
}

impl<T: EvidenceToken, R: EvidenceReference> RevocationSource<T, R> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that the container carries `binary`.
    ///
    /// Returns `true` if the binary was not registered before.
    pub fn register_binary(&mut self, binary: EvidenceBinary) -> bool {
        if self.binaries.contains(&binary) {
            return false;
        }
        self.binaries.push(binary);
        true
    }

    /// Returns `true` if `binary` has been registered.
    #[must_use]
    pub fn is_known(&self, binary: &EvidenceBinary) -> bool {
        self.binaries.contains(binary)
    }

    /// Returns the registered binaries, in registration order.
    #[must_use]
    pub fn known_binaries(&self) -> Vec<EvidenceBinary> {
        self.binaries.clone()
    }

    /// Admits `token` as materialized from `binary`.
    ///
    /// Returns `true` if the token was recorded against the binary. Unknown
    /// binaries and tokens already recorded for the binary are ignored and
    /// return `false`.
    pub fn store(&mut self, binary: &EvidenceBinary, token: T) -> bool {
        if !self.is_known(binary) {
            trace!(
                revocation_type = %T::REVOCATION_TYPE,
                origin = %binary.origin(),
                "ignoring token for a binary not carried by this signature"
            );
            return false;
        }
        match self.token_map.get_mut(binary) {
            None => {
                self.token_map.insert(binary.clone(), vec![token.clone()]);
            },
            Some(tokens) if tokens.contains(&token) => return false,
            Some(tokens) => tokens.push(token.clone()),
        }
        self.file(token, binary.origin());
        true
    }

    fn file(&mut self, token: T, origin: RevocationOrigin) {
        // Reference origins own no token collection. A VRI binary only lands
        // in its own collection.
        if let Some(slot) = origin.value_slot() {
            self.values[slot].push(token);
        }
    }

    /// Appends a reference unless an equal one is already present.
    pub fn add_reference(&mut self, reference: R, origin: RefOrigin) {
        let refs = match origin {
            RefOrigin::Complete => &mut self.complete_refs,
            RefOrigin::Attribute => &mut self.attribute_refs,
        };
        if !refs.contains(&reference) {
            refs.push(reference);
        }
    }

    /// Replays every `(binary, token)` pair of `other` into this store.
    ///
    /// The admission guard of [`store`](Self::store) still applies, so only
    /// binaries already registered here receive tokens. Returns the number
    /// of tokens filed.
    pub fn populate_from(&mut self, other: &Self) -> usize {
        let mut filed = 0;
        for binary in &other.binaries {
            let Some(tokens) = other.token_map.get(binary) else {
                continue;
            };
            for token in tokens {
                if self.store(binary, token.clone()) {
                    filed += 1;
                }
            }
        }
        debug!(
            revocation_type = %T::REVOCATION_TYPE,
            filed,
            "populated revocation tokens from sibling store"
        );
        filed
    }

    /// Returns the deduplicated tokens found at `origin`.
    ///
    /// Reference origins always yield an empty collection.
    #[must_use]
    pub fn tokens(&self, origin: RevocationOrigin) -> Vec<T> {
        origin
            .value_slot()
            .map(|slot| dedup(&self.values[slot]))
            .unwrap_or_default()
    }

    /// Tokens from signature-level revocation values.
    #[must_use]
    pub fn revocation_values_tokens(&self) -> Vec<T> {
        self.tokens(RevocationOrigin::RevocationValues)
    }

    /// Tokens from attribute revocation values.
    #[must_use]
    pub fn attribute_revocation_values_tokens(&self) -> Vec<T> {
        self.tokens(RevocationOrigin::AttributeRevocationValues)
    }

    /// Tokens from timestamp validation data.
    #[must_use]
    pub fn timestamp_revocation_values_tokens(&self) -> Vec<T> {
        self.tokens(RevocationOrigin::TimestampRevocationValues)
    }

    /// Tokens from the document security store.
    #[must_use]
    pub fn dss_dictionary_tokens(&self) -> Vec<T> {
        self.tokens(RevocationOrigin::DssDictionary)
    }

    /// Tokens from the VRI dictionary.
    #[must_use]
    pub fn vri_dictionary_tokens(&self) -> Vec<T> {
        self.tokens(RevocationOrigin::VriDictionary)
    }

    /// All value tokens, deduplicated across origins, in origin order.
    #[must_use]
    pub fn all_tokens(&self) -> Vec<T> {
        let all: Vec<T> = self.values.iter().flatten().cloned().collect();
        dedup(&all)
    }

    /// Complete revocation references, in insertion order.
    #[must_use]
    pub fn complete_revocation_refs(&self) -> Vec<R> {
        self.complete_refs.clone()
    }

    /// Attribute revocation references, in insertion order.
    #[must_use]
    pub fn attribute_revocation_refs(&self) -> Vec<R> {
        self.attribute_refs.clone()
    }

    /// Snapshot of the binary to tokens mapping, in registration order.
    #[must_use]
    pub fn token_map(&self) -> Vec<(EvidenceBinary, Vec<T>)> {
        self.binaries
            .iter()
            .filter_map(|binary| {
                self.token_map
                    .get(binary)
                    .map(|tokens| (binary.clone(), tokens.clone()))
            })
            .collect()
    }

    /// Returns `true` if the store holds no binary and no reference.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.binaries.is_empty() && self.complete_refs.is_empty() && self.attribute_refs.is_empty()
    }
}

fn dedup<T: EvidenceToken>(tokens: &[T]) -> Vec<T> {
    let mut seen = HashSet::new();
    let unique: Vec<T> = tokens
        .iter()
        .filter(|token| seen.insert(token.dedup_key()))
        .cloned()
        .collect();
    if unique.len() != tokens.len() {
        debug!(
            revocation_type = %T::REVOCATION_TYPE,
            removed = tokens.len() - unique.len(),
            "dropped duplicate revocation tokens"
        );
    }
    unique
}
