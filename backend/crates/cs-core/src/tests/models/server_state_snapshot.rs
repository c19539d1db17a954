use crate::{
    BedrockConfigView, Edition, EditionConfigView, JavaConfigView, ServerStateSnapshot,
    ServerStatus,
};

fn bedrock_view() -> EditionConfigView {
    EditionConfigView::Bedrock(BedrockConfigView {
        port: 19132,
        world: Some(String::from("Bedrock level")),
        worlds: vec![String::from("Bedrock level")],
        mode: Some(String::from("survival")),
        online_mode: true,
        content_log_console_output: false,
        emit_telemetry: false,
    })
}

#[test]
fn test_snapshot_serializes_status_code_and_flat_config() {
    let snapshot = ServerStateSnapshot {
        id: 1,
        edition: Edition::Bedrock,
        status: ServerStatus::Running,
        pid: 4242,
        port: 19132,
        stdout: vec![String::from("Server started.")],
        stderr: Vec::new(),
        version: None,
        config: bedrock_view(),
        exit_code: None,
    };

    let json = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(json["status"], serde_json::json!(1));
    assert_eq!(json["config"]["world"], serde_json::json!("Bedrock level"));
    assert_eq!(json["exitCode"], serde_json::Value::Null);
}

#[test]
fn test_config_view_accessors() {
    let java = EditionConfigView::Java(JavaConfigView {
        port: 25566,
        max_memory_mb: 2048,
        eula_accepted: true,
        jar: String::from("server.jar"),
        online_mode: true,
        mode: None,
        motd: Some(String::from("Crankshaft Java Server")),
        world: Some(String::from("world")),
    });

    assert_eq!(java.edition(), Edition::Java);
    assert_eq!(java.port(), 25566);
    assert_eq!(java.world(), Some("world"));
    assert_eq!(bedrock_view().edition(), Edition::Bedrock);
}
