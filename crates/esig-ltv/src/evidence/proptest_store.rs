//! Property-based tests for revocation store deduplication and merging.

use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use super::binary::EvidenceBinary;
use super::origin::RevocationOrigin;
use super::store::SignatureCrlSource;
use super::token::{CrlToken, EvidenceToken, ValidityWindow};
use crate::crypto::{DefaultDigestHasher, DigestAlgorithm};
use crate::identifier::{DigestFallbackResolver, Identifier};

/// One store operation: binary index, origin index, related certificate.
type Op = (usize, usize, u8);

fn token(binary: &EvidenceBinary, cert: u8) -> CrlToken {
    let resolver = DigestFallbackResolver::new(DefaultDigestHasher, DigestAlgorithm::Sha256);
    let id = Identifier::for_revocation_binary(&resolver, binary.encoded()).unwrap();
    let validity = ValidityWindow {
        this_update: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        next_update: None,
    };
    CrlToken::new(id, b"CN=CA".to_vec(), validity).with_related_certificate(format!("C-{cert:02X}"))
}

fn binary(index: usize, origin: usize) -> EvidenceBinary {
    EvidenceBinary::new(
        format!("crl-{index}").into_bytes(),
        RevocationOrigin::VALUES[origin],
    )
}

fn op_strategy() -> impl Strategy<Value = Op> {
    (0usize..4, 0usize..RevocationOrigin::VALUES.len(), 0u8..4)
}

/// Builds a store registering `registered` binary indices and replaying
/// `ops`.
fn build(registered: &[usize], ops: &[Op]) -> SignatureCrlSource {
    let mut source = SignatureCrlSource::new();
    for &index in registered {
        for origin in 0..RevocationOrigin::VALUES.len() {
            source.register_binary(binary(index, origin));
        }
    }
    for &(index, origin, cert) in ops {
        let b = binary(index, origin);
        source.store(&b, token(&b, cert));
    }
    source
}

/// Total tokens exposed across the per-origin collections.
fn exposed(source: &SignatureCrlSource) -> usize {
    RevocationOrigin::VALUES
        .iter()
        .map(|origin| source.tokens(*origin).len())
        .sum()
}

proptest! {
    /// Property: reading a collection twice yields identical results.
    #[test]
    fn prop_reads_are_idempotent(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let source = build(&[0, 1, 2, 3], &ops);
        for origin in RevocationOrigin::VALUES {
            let first = source.tokens(origin);
            let second = source.tokens(origin);
            prop_assert_eq!(first, second);
        }
        prop_assert_eq!(source.all_tokens(), source.all_tokens());
    }

    /// Property: no collection ever exposes two tokens with the same key.
    #[test]
    fn prop_exposed_collections_have_unique_keys(
        ops in prop::collection::vec(op_strategy(), 0..40),
    ) {
        let source = build(&[0, 1, 2, 3], &ops);
        for origin in RevocationOrigin::VALUES {
            let tokens = source.tokens(origin);
            let keys: HashSet<_> = tokens.iter().map(EvidenceToken::dedup_key).collect();
            prop_assert_eq!(keys.len(), tokens.len());
        }
    }

    /// Property: every distinct (binary, origin, certificate) triple stored
    /// against a registered binary is exposed exactly once.
    #[test]
    fn prop_distinct_stores_exposed_once(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let source = build(&[0, 1, 2, 3], &ops);
        let distinct: HashSet<Op> = ops.iter().copied().collect();
        prop_assert_eq!(exposed(&source), distinct.len());
    }

    /// Property: tokens for unregistered binaries never appear.
    #[test]
    fn prop_unknown_binaries_filtered(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let source = build(&[0, 1], &ops);
        let expected: HashSet<Op> = ops.iter().copied().filter(|(i, _, _)| *i < 2).collect();
        prop_assert_eq!(exposed(&source), expected.len());
        for (b, _) in source.token_map() {
            prop_assert!(source.is_known(&b));
        }
    }

    /// Property: populating A from B adds exactly B's tokens for binaries A
    /// knows that A did not already hold, and never duplicates.
    #[test]
    fn prop_populate_is_union_over_known_binaries(
        ops_a in prop::collection::vec(op_strategy(), 0..30),
        ops_b in prop::collection::vec(op_strategy(), 0..30),
    ) {
        let mut a = build(&[0, 1, 2], &ops_a);
        let b = build(&[0, 1, 2, 3], &ops_b);

        let before: HashSet<Op> = ops_a.iter().copied().filter(|(i, _, _)| *i < 3).collect();
        let incoming: HashSet<Op> = ops_b.iter().copied().filter(|(i, _, _)| *i < 3).collect();
        let expected_new = incoming.difference(&before).count();

        prop_assert_eq!(a.populate_from(&b), expected_new);
        let union = before.union(&incoming).count();
        prop_assert_eq!(exposed(&a), union);

        // A second replay is a no-op.
        prop_assert_eq!(a.populate_from(&b), 0);
        prop_assert_eq!(exposed(&a), union);
    }
}
