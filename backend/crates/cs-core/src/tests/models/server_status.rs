use crate::ServerStatus;

use googletest::assert_that;
use googletest::prelude::{eq, none, some};

#[test]
fn given_statuses_when_serialized_then_numeric_codes() {
    // Given
    let statuses = [
        ServerStatus::Unknown,
        ServerStatus::Running,
        ServerStatus::Stopped,
    ];

    // When
    let json = serde_json::to_string(&statuses).unwrap();

    // Then
    assert_that!(json.as_str(), eq("[0,1,2]"));
}

#[test]
fn given_numeric_code_when_deserialized_then_status() {
    let status: ServerStatus = serde_json::from_str("2").unwrap();
    assert_that!(status, eq(ServerStatus::Stopped));
    assert!(serde_json::from_str::<ServerStatus>("7").is_err());
}

#[test]
fn given_code_when_from_code_then_matches() {
    assert_that!(ServerStatus::from_code(1), some(eq(ServerStatus::Running)));
    assert_that!(ServerStatus::from_code(3), none());
}

#[test]
fn test_server_status_default_is_unknown() {
    assert_eq!(ServerStatus::default(), ServerStatus::Unknown);
    assert!(!ServerStatus::default().is_running());
}
