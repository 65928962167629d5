//! Property-based tests for snapshot serialization and request classification.
//!
//! These tests use proptest to verify that core properties hold for randomly
//! generated inputs, catching edge cases that example-based tests might miss.
//!
//! # Properties Tested
//!
//! 1. **Roundtrip Property**: decode(encode(x)) == x for ANY response
//! 2. **Determinism Property**: encode(x) == encode(x) always
//! 3. **Envelope Property**: All encoded snapshots start with magic b"OKIT"
//! 4. **Corruption Property**: Flipping the magic always rejects the snapshot
//! 5. **Classifier Property**: classify is deterministic and total

use offline_kit::classify::classify;
use offline_kit::http::{Request, Response};
use offline_kit::serialization::{decode_snapshot, encode_snapshot, SNAPSHOT_MAGIC};
use proptest::prelude::*;

// ============================================================================
// Arbitrary generators
// ============================================================================

fn arb_header() -> impl Strategy<Value = (String, String)> {
    ("[A-Za-z][A-Za-z-]{0,20}", "[ -~]{0,40}").prop_map(|(n, v)| (n, v))
}

fn arb_response() -> impl Strategy<Value = Response> {
    (
        100u16..=599,
        proptest::collection::vec(arb_header(), 0..8),
        proptest::collection::vec(any::<u8>(), 0..4096),
    )
        .prop_map(|(status, headers, body)| {
            let mut resp = Response::new(status, body);
            resp.headers = headers;
            resp
        })
}

fn arb_path() -> impl Strategy<Value = String> {
    "(/[a-z0-9._-]{1,12}){1,5}(\\?[a-z=&0-9]{0,20})?".prop_map(|s| s)
}

// ============================================================================
// Snapshot envelope properties
// ============================================================================

proptest! {
    #[test]
    fn prop_snapshot_roundtrip(response in arb_response()) {
        let bytes = encode_snapshot(&response).expect("encode should succeed");
        let decoded = decode_snapshot(&bytes).expect("decode should succeed");
        prop_assert_eq!(response, decoded);
    }

    #[test]
    fn prop_encoding_deterministic(response in arb_response()) {
        let a = encode_snapshot(&response).expect("encode should succeed");
        let b = encode_snapshot(&response).expect("encode should succeed");
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_envelope_starts_with_magic(response in arb_response()) {
        let bytes = encode_snapshot(&response).expect("encode should succeed");
        prop_assert!(bytes.len() >= 8);
        prop_assert_eq!(&bytes[0..4], &SNAPSHOT_MAGIC[..]);
    }

    #[test]
    fn prop_corrupt_magic_rejected(response in arb_response(), flip in 0usize..4) {
        let mut bytes = encode_snapshot(&response).expect("encode should succeed");
        bytes[flip] ^= 0xff;
        prop_assert!(decode_snapshot(&bytes).is_err());
    }
}

// ============================================================================
// Classifier properties
// ============================================================================

proptest! {
    #[test]
    fn prop_classify_deterministic(path in arb_path()) {
        let req = Request::get(path);
        prop_assert_eq!(classify(&req), classify(&req));
    }

    #[test]
    fn prop_classify_total_and_scheme_independent(path in arb_path()) {
        // Classification depends only on the path, not on scheme/host
        let bare = Request::get(path.clone());
        let absolute = Request::get(format!("https://example.com{}", path));
        prop_assert_eq!(classify(&bare), classify(&absolute));
    }

    #[test]
    fn prop_api_prefix_always_api(rest in "[a-z0-9/]{0,20}") {
        use offline_kit::ResourceClass;
        let req = Request::get(format!("/api/{}", rest));
        prop_assert_eq!(classify(&req), ResourceClass::Api);
    }
}
