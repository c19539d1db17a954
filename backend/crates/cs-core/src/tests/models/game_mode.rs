use crate::GameMode;

use std::str::FromStr;

#[test]
fn test_game_mode_from_str() {
    assert_eq!(GameMode::from_str("creative").unwrap(), GameMode::Creative);
    assert_eq!(GameMode::from_str("Adventure").unwrap(), GameMode::Adventure);
    assert_eq!(GameMode::from_str("0").unwrap(), GameMode::Survival);
    assert!(GameMode::from_str("hardcore").is_err());
}

#[test]
fn test_game_mode_display_matches_properties_value() {
    assert_eq!(GameMode::Survival.to_string(), "survival");
    assert_eq!(GameMode::Creative.to_string(), "creative");
}
