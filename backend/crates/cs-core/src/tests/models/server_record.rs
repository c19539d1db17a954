use crate::{Edition, ServerRecord};

use googletest::assert_that;
use googletest::prelude::{anything, eq, err, none, some};

#[test]
fn given_java_record_when_serialized_then_memory_in_camel_case() {
    // Given
    let record = ServerRecord::new(3, Edition::Java, 25565, Some(2048));

    // When
    let json = serde_json::to_value(&record).unwrap();

    // Then
    assert_eq!(
        json,
        serde_json::json!({
            "id": 3,
            "edition": "java",
            "port": 25565,
            "maxMemoryMb": 2048
        })
    );
}

#[test]
fn given_bedrock_record_with_memory_when_new_then_memory_dropped() {
    let record = ServerRecord::new(1, Edition::Bedrock, 19132, Some(4096));

    assert_that!(record.max_memory_mb, none());
    let json = serde_json::to_value(&record).unwrap();
    assert_that!(json.get("maxMemoryMb"), none());
}

#[test]
fn given_record_without_edition_when_deserialized_then_bedrock() {
    let record: ServerRecord = serde_json::from_str(r#"{"id": 9, "port": 19140}"#).unwrap();

    assert_that!(record.edition, eq(Edition::Bedrock));
    assert_that!(record.port, eq(19140));
}

#[test]
fn given_id_strings_when_parse_id_then_only_numbers_accepted() {
    assert_that!(ServerRecord::parse_id("12").ok(), some(eq(12)));
    assert_that!(ServerRecord::parse_id("-1"), err(anything()));
    assert_that!(ServerRecord::parse_id("abc"), err(anything()));
}
