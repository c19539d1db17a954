use crate::ManifestEntry;

use cs_core::Edition;

use googletest::assert_that;
use googletest::prelude::{eq, none, some};
use serde_json::json;

#[test]
fn given_object_entry_when_decode_then_all_fields_are_read() {
    // Given
    let value = json!({"id": 3, "edition": "java", "port": 25570, "maxMemoryMb": 4096});

    // When
    let entry = ManifestEntry::decode(&value).unwrap();

    // Then
    assert_that!(entry.id, eq(3));
    assert_that!(entry.edition, eq(Edition::Java));
    assert_that!(entry.port, some(eq(25570)));
    assert_that!(entry.max_memory_mb, some(eq(4096)));
}

#[test]
fn given_object_without_edition_when_decode_then_bedrock() {
    let entry = ManifestEntry::decode(&json!({"id": 1, "port": 19132})).unwrap();

    assert_that!(entry.edition, eq(Edition::Bedrock));
    assert_that!(entry.max_memory_mb, none());
}

#[test]
fn given_legacy_config_pair_when_decode_then_port_is_read() {
    let entry = ManifestEntry::decode(&json!([4, {"config": {"port": 19140}}])).unwrap();

    assert_that!(entry.id, eq(4));
    assert_that!(entry.port, some(eq(19140)));
    assert_that!(entry.edition, eq(Edition::Bedrock));
}

#[test]
fn given_legacy_flat_pair_when_decode_then_port_is_read() {
    let entry = ManifestEntry::decode(&json!(["9", {"port": 19150}])).unwrap();

    assert_that!(entry.id, eq(9));
    assert_that!(entry.port, some(eq(19150)));
}

#[test]
fn given_legacy_pair_without_details_when_decode_then_port_is_unset() {
    let entry = ManifestEntry::decode(&json!([2])).unwrap();

    assert_that!(entry.port, none());
}

#[test]
fn given_entries_without_numeric_id_when_decode_then_none() {
    assert!(ManifestEntry::decode(&json!({"id": "abc"})).is_none());
    assert!(ManifestEntry::decode(&json!({"port": 19132})).is_none());
    assert!(ManifestEntry::decode(&json!([null, {"port": 1}])).is_none());
    assert!(ManifestEntry::decode(&json!({"id": -1})).is_none());
    assert!(ManifestEntry::decode(&json!("5")).is_none());
}

#[test]
fn given_out_of_range_port_when_decode_then_port_is_ignored() {
    let entry = ManifestEntry::decode(&json!([1, {"port": 70000}])).unwrap();

    assert_that!(entry.port, none());
}

#[test]
fn given_badly_typed_port_when_decode_then_entry_is_kept_without_port() {
    for value in [json!({"id": 3, "port": 70000}), json!({"id": 3, "port": "19132"})] {
        let entry = ManifestEntry::decode(&value).unwrap();

        assert_that!(entry.id, eq(3));
        assert_that!(entry.port, none());
    }
}

#[test]
fn given_string_max_memory_when_decode_then_entry_is_kept_without_memory() {
    let entry = ManifestEntry::decode(&json!({"id": 3, "edition": "java", "maxMemoryMb": "2048"}))
        .unwrap();

    assert_that!(entry.edition, eq(Edition::Java));
    assert_that!(entry.max_memory_mb, none());
}

#[test]
fn given_numeric_or_unknown_edition_when_decode_then_bedrock() {
    let numeric = ManifestEntry::decode(&json!({"id": 3, "edition": 1})).unwrap();
    let unknown = ManifestEntry::decode(&json!({"id": 4, "edition": "pocket"})).unwrap();

    assert_that!(numeric.edition, eq(Edition::Bedrock));
    assert_that!(unknown.edition, eq(Edition::Bedrock));
}
