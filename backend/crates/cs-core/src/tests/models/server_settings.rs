use crate::{GameMode, ServerSettings};

#[test]
fn test_server_settings_default_is_empty() {
    assert!(ServerSettings::default().is_empty());
}

#[test]
fn test_server_settings_deserializes_partial_camel_case() {
    let settings: ServerSettings =
        serde_json::from_str(r#"{"onlineMode": false, "gameMode": "creative"}"#).unwrap();

    assert_eq!(settings.online_mode, Some(false));
    assert_eq!(settings.game_mode, Some(GameMode::Creative));
    assert_eq!(settings.emit_telemetry, None);
    assert!(!settings.is_empty());
}
