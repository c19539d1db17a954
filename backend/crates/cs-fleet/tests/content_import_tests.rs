#![cfg(unix)]

mod common;

use common::TestFleet;

use cs_core::{CoreError, Edition, EditionConfigView, ServerStatus};
use cs_fleet::{NewServerOptions, ServerInstance};

use std::io::{Cursor, Write};
use std::sync::Arc;

use googletest::assert_that;
use googletest::prelude::eq;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn mcworld(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

async fn stopped_bedrock(fleet: &TestFleet) -> Arc<ServerInstance> {
    let instance = fleet
        .manager
        .add_new(1, NewServerOptions::new(Edition::Bedrock))
        .await
        .unwrap();
    instance.stop().await.unwrap();
    instance
}

#[tokio::test]
async fn given_valid_world_when_import_then_world_is_active_and_listed() {
    // Given
    let fleet = TestFleet::new();
    let instance = stopped_bedrock(&fleet).await;
    let bytes = mcworld(&[("level.dat", b"level"), ("levelname.txt", b"Sky Island")]);

    // When
    let name = instance.import_content(bytes, "upload.mcworld").await.unwrap();

    // Then
    assert_that!(name, eq("Sky Island"));
    let state = instance.state().await.unwrap();
    let EditionConfigView::Bedrock(config) = state.config else {
        panic!("expected a Bedrock view");
    };
    assert_that!(config.world, googletest::prelude::some(eq("Sky Island")));
    assert!(config.worlds.contains(&String::from("Sky Island")));
    assert_that!(state.status, eq(ServerStatus::Stopped));
}

#[tokio::test]
async fn given_archive_without_level_dat_when_import_then_invalid_archive_and_content_untouched() {
    // Given
    let fleet = TestFleet::new();
    let instance = stopped_bedrock(&fleet).await;
    let existing = instance.layout().worlds_dir().join("Keep");
    std::fs::create_dir_all(&existing).unwrap();
    std::fs::write(existing.join("level.dat"), "keep").unwrap();
    let before = std::fs::read_to_string(instance.layout().properties()).unwrap();
    let bytes = mcworld(&[("levelname.txt", b"Keep"), ("db/CURRENT", b"x")]);

    // When
    let result = instance.import_content(bytes, "Keep.mcworld").await;

    // Then
    assert!(matches!(result, Err(CoreError::InvalidArchive { id: 1, .. })));
    assert_eq!(std::fs::read_to_string(existing.join("level.dat")).unwrap(), "keep");
    assert_eq!(
        std::fs::read_to_string(instance.layout().properties()).unwrap(),
        before
    );
}

#[tokio::test]
async fn given_empty_upload_when_import_then_empty_upload() {
    let fleet = TestFleet::new();
    let instance = stopped_bedrock(&fleet).await;

    let result = instance.import_content(Vec::new(), "w.mcworld").await;

    assert!(matches!(result, Err(CoreError::EmptyUpload { id: 1, .. })));
}

#[tokio::test]
async fn given_wrong_extension_when_import_then_invalid_archive() {
    let fleet = TestFleet::new();
    let instance = stopped_bedrock(&fleet).await;
    let bytes = mcworld(&[("level.dat", b"level")]);

    let result = instance.import_content(bytes, "world.zip").await;

    assert!(matches!(result, Err(CoreError::InvalidArchive { .. })));
}

#[tokio::test]
async fn given_running_server_when_import_then_not_stopped() {
    // Given
    let fleet = TestFleet::new();
    let instance = fleet
        .manager
        .add_new(1, NewServerOptions::new(Edition::Bedrock))
        .await
        .unwrap();
    let bytes = mcworld(&[("level.dat", b"level")]);

    // When
    let result = instance.import_content(bytes, "w.mcworld").await;

    // Then
    assert!(matches!(
        result,
        Err(CoreError::NotStopped {
            status: ServerStatus::Running,
            ..
        })
    ));

    fleet.manager.shutdown().await;
}

#[tokio::test]
async fn given_java_server_when_import_then_unsupported() {
    // Given
    let fleet = TestFleet::new();
    let instance = fleet
        .manager
        .add_new(1, NewServerOptions::new(Edition::Java))
        .await
        .unwrap();
    instance.stop().await.unwrap();

    // When
    let result = instance
        .import_content(mcworld(&[("level.dat", b"level")]), "w.mcworld")
        .await;

    // Then
    assert!(matches!(
        result,
        Err(CoreError::Unsupported {
            edition: Edition::Java,
            ..
        })
    ));
}
