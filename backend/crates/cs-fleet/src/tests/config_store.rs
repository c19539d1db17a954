use crate::ConfigStore;

use googletest::assert_that;
use googletest::prelude::{anything, eq, none, ok, some};
use tempfile::TempDir;

fn store_with(content: &str) -> (TempDir, ConfigStore) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("server.properties");
    std::fs::write(&path, content).unwrap();
    let store = ConfigStore::open(&path).unwrap();
    (dir, store)
}

#[test]
fn given_missing_file_when_open_then_store_is_empty() {
    let dir = TempDir::new().unwrap();

    let store = ConfigStore::open(dir.path().join("server.properties")).unwrap();

    assert_that!(store.get("server-port"), none());
}

#[test]
fn given_duplicate_keys_when_get_then_first_value_wins() {
    let (_dir, store) = store_with("level-name=first\nlevel-name=second\n");

    assert_that!(store.get("level-name"), some(eq("first")));
}

#[test]
fn given_commented_key_when_get_then_comment_is_ignored() {
    let (_dir, store) = store_with("#server-port=1\nserver-port=19132\n");

    assert_that!(store.get("server-port"), some(eq("19132")));
}

#[test]
fn given_key_that_prefixes_another_when_set_then_only_exact_key_line_changes() {
    // Given
    let (dir, mut store) = store_with("server-portv6=19133\nserver-port=19132\n");

    // When
    let changed = store.set("server-port", "20000").unwrap();

    // Then
    assert!(changed);
    let content = std::fs::read_to_string(dir.path().join("server.properties")).unwrap();
    assert_eq!(content, "server-portv6=19133\nserver-port=20000\n");
}

#[test]
fn given_unchanged_value_when_set_then_returns_false_and_file_is_untouched() {
    // Given
    let (dir, mut store) = store_with("gamemode=survival\n");
    let path = dir.path().join("server.properties");
    std::fs::write(&path, "gamemode=survival\n# edited elsewhere\n").unwrap();

    // When
    let changed = store.set("gamemode", "survival").unwrap();

    // Then
    assert!(!changed);
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "gamemode=survival\n# edited elsewhere\n");
}

#[test]
fn given_crlf_file_when_set_then_line_endings_and_comments_are_preserved() {
    // Given
    let (dir, mut store) = store_with("# header\r\nlevel-name=world\r\nmotd=hi\r\n");

    // When
    store.set("level-name", "other").unwrap();
    store.set("online-mode", "false").unwrap();

    // Then
    let content = std::fs::read_to_string(dir.path().join("server.properties")).unwrap();
    assert_eq!(
        content,
        "# header\r\nlevel-name=other\r\nmotd=hi\r\nonline-mode=false\r\n"
    );
}

#[test]
fn given_missing_file_when_set_then_file_and_parent_are_created() {
    // Given
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("eula.txt");
    let mut store = ConfigStore::open(&path).unwrap();

    // When
    let result = store.set("eula", "true");

    // Then
    assert_that!(result, ok(eq(&true)));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "eula=true\n");
}

#[test]
fn given_external_edit_when_refresh_then_cache_reflects_disk() {
    // Given
    let (dir, mut store) = store_with("motd=old\n");
    std::fs::write(dir.path().join("server.properties"), "motd=new\n").unwrap();
    assert_that!(store.get("motd"), some(eq("old")));

    // When
    store.refresh().unwrap();

    // Then
    assert_that!(store.get("motd"), some(eq("new")));
}

#[test]
fn given_bool_values_when_get_bool_then_parsed() {
    let (_dir, store) = store_with("online-mode=false\neula=true\nbroken=yes\n");

    assert_that!(store.get_bool("online-mode"), some(eq(false)));
    assert_that!(store.get_bool("eula"), some(eq(true)));
    assert_that!(store.get_bool("broken"), none());
}

#[test]
fn given_world_directories_when_list_directory_entries_then_sorted_names_without_files() {
    // Given
    let (dir, store) = store_with("");
    let worlds = dir.path().join("worlds");
    std::fs::create_dir_all(worlds.join("zeta")).unwrap();
    std::fs::create_dir_all(worlds.join("alpha")).unwrap();
    std::fs::create_dir_all(worlds.join(".import-partial")).unwrap();
    std::fs::write(worlds.join("notes.txt"), "x").unwrap();

    // When
    let names = store.list_directory_entries("worlds").unwrap();

    // Then
    assert_eq!(names, vec!["alpha", "zeta"]);
}

#[test]
fn given_missing_directory_when_list_directory_entries_then_empty() {
    let (_dir, store) = store_with("");

    assert_that!(store.list_directory_entries("worlds"), ok(anything()));
    assert!(store.list_directory_entries("worlds").unwrap().is_empty());
}
