use crate::Edition;

use std::str::FromStr;

#[test]
fn test_edition_as_str() {
    assert_eq!(Edition::Bedrock.as_str(), "bedrock");
    assert_eq!(Edition::Java.as_str(), "java");
}

#[test]
fn test_edition_from_str_is_case_insensitive() {
    assert_eq!(Edition::from_str("Java").unwrap(), Edition::Java);
    assert_eq!(Edition::from_str("BEDROCK").unwrap(), Edition::Bedrock);
    assert_eq!(Edition::from_str(" java ").unwrap(), Edition::Java);
    assert!(Edition::from_str("pocket").is_err());
}

#[test]
fn test_edition_default() {
    assert_eq!(Edition::default(), Edition::Bedrock);
}

#[test]
fn test_edition_conventional_ports() {
    assert_eq!(Edition::Bedrock.conventional_port(), 19132);
    assert_eq!(Edition::Java.conventional_port(), 25565);
}

#[test]
fn test_edition_serde_uses_lowercase_and_accepts_mixed_case() {
    assert_eq!(serde_json::to_string(&Edition::Java).unwrap(), "\"java\"");
    let parsed: Edition = serde_json::from_str("\"Bedrock\"").unwrap();
    assert_eq!(parsed, Edition::Bedrock);
}
