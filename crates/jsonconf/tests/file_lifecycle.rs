//! Integration tests for loading and saving config files on the real disk.
//!
//! Each test works in its own directory under the system temp dir so tests can
//! run in parallel.  None of them touches the process-wide default options;
//! that lives in `global_options.rs`, which runs in its own process.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use jsonconf::{
    ConfigError, ConfigFile, ConfigOptions, ConfigStore, Dialect, Lifecycle, LifecycleEvent,
    OsFileSystem,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct Settings {
    text: Option<String>,
}

impl ConfigFile for Settings {}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct Appearance {
    theme: Theme,
    font_size: u16,
}

impl ConfigFile for Appearance {}

/// Counts its own loads through the `on_loaded` hook; the counter is not
/// persisted.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Counted {
    name: String,
    #[serde(skip)]
    loaded_hits: u32,
}

impl ConfigFile for Counted {
    fn on_loaded(&mut self) {
        self.loaded_hits += 1;
    }
}

fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("jsonconf_it_{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn cleanup(dir: &Path) {
    let _ = fs::remove_dir_all(dir);
}

fn defaults() -> Option<Arc<ConfigOptions>> {
    Some(ConfigOptions::default().shared())
}

// ── Round trips ──────────────────────────────────────────────────────────────

#[test]
fn test_save_then_read_round_trip() {
    // Arrange
    let dir = temp_dir();
    let path = dir.join("settings.json");
    let mut settings = jsonconf::create::<Settings>(Some(&path), defaults()).expect("create");
    settings.text = Some("Hello!".into());

    // Act
    settings.save(None, None).expect("save");
    let reread = jsonconf::read::<Settings>(Some(&path), defaults())
        .expect("read")
        .expect("not null");

    // Assert
    assert_eq!(*reread.payload(), *settings.payload());
    cleanup(&dir);
}

#[test]
fn test_load_missing_writes_readable_default() {
    let dir = temp_dir();
    let path = dir.join("settings.json");

    let loaded = jsonconf::load::<Settings>(Some(&path), defaults())
        .expect("load")
        .expect("created");

    assert!(loaded.text.is_none());
    assert_eq!(
        fs::read_to_string(&path).expect("file written"),
        "{\n  \"text\": null\n}"
    );
    let reread = jsonconf::read::<Settings>(Some(&path), defaults())
        .expect("read")
        .expect("not null");
    assert_eq!(*reread.payload(), Settings::default());
    cleanup(&dir);
}

#[test]
fn test_load_missing_without_create_leaves_no_file() {
    let dir = temp_dir();
    let path = dir.join("settings.json");
    let options = ConfigOptions::default().with_create_if_missing(false).shared();

    let loaded = jsonconf::load::<Settings>(Some(&path), Some(options)).expect("load");

    assert!(loaded.is_none());
    assert!(!path.exists());
    cleanup(&dir);
}

#[test]
fn test_save_overwrites_file_in_full() {
    let dir = temp_dir();
    let path = dir.join("settings.json");
    fs::write(&path, "{ \"text\": \"a much longer previous value\", \"stale\": true }")
        .expect("seed");

    let mut settings = jsonconf::read::<Settings>(Some(&path), defaults())
        .expect("read")
        .expect("not null");
    settings.text = Some("b".into());
    settings.save(None, None).expect("save");

    assert_eq!(
        fs::read_to_string(&path).expect("read back"),
        "{\n  \"text\": \"b\"\n}"
    );
    cleanup(&dir);
}

// ── Edge cases ───────────────────────────────────────────────────────────────

#[test]
fn test_null_file_is_absent_not_error() {
    let dir = temp_dir();
    let path = dir.join("settings.json");
    fs::write(&path, "null").expect("seed");

    let read = jsonconf::read::<Settings>(Some(&path), defaults()).expect("read");
    let loaded = jsonconf::load::<Settings>(Some(&path), defaults()).expect("load");

    assert!(read.is_none());
    assert!(loaded.is_none());
    assert_eq!(fs::read_to_string(&path).expect("untouched"), "null");
    cleanup(&dir);
}

#[test]
fn test_read_missing_file_is_not_found() {
    let dir = temp_dir();

    let err = jsonconf::read::<Settings>(Some(&dir.join("absent.json")), defaults()).unwrap_err();

    assert!(matches!(err, ConfigError::NotFound { .. }));
    cleanup(&dir);
}

#[test]
fn test_save_into_missing_directory_fails_without_dir_creation() {
    let dir = temp_dir();
    let path = dir.join("nested").join("settings.json");

    let err = jsonconf::create::<Settings>(Some(&path), defaults()).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));

    let store =
        ConfigStore::new().with_file_system(Arc::new(OsFileSystem::creating_parent_dirs()));
    store
        .create::<Settings>(Some(&path), defaults())
        .expect("create with parent dirs");
    assert!(path.exists());
    cleanup(&dir);
}

#[test]
fn test_try_load_reports_malformed_file() {
    let dir = temp_dir();
    let path = dir.join("settings.json");
    fs::write(&path, "{ \"text\": ").expect("seed");

    let outcome = jsonconf::try_load::<Settings>(Some(&path), defaults());

    assert!(outcome.failed());
    assert!(matches!(outcome.error(), Some(ConfigError::Malformed { .. })));
    cleanup(&dir);
}

// ── Dialect ──────────────────────────────────────────────────────────────────

#[test]
fn test_hand_edited_file_with_comments_and_ordinals() {
    let dir = temp_dir();
    let path = dir.join("appearance.json");
    fs::write(
        &path,
        "{\n  // edited by hand\n  \"Theme\": 1,\n  \"FONT_SIZE\": \"12\",\n}\n",
    )
    .expect("seed");

    let appearance = jsonconf::read::<Appearance>(Some(&path), defaults())
        .expect("read")
        .expect("not null");

    assert_eq!(appearance.theme, Theme::Dark);
    assert_eq!(appearance.font_size, 12);
    cleanup(&dir);
}

#[test]
fn test_enums_written_by_name_under_default_dialect() {
    let dir = temp_dir();
    let path = dir.join("appearance.json");
    let mut appearance = jsonconf::create::<Appearance>(Some(&path), defaults()).expect("create");
    appearance.theme = Theme::Dark;

    appearance.save(None, None).expect("save");

    let text = fs::read_to_string(&path).expect("read back");
    assert!(text.contains("\"theme\": \"Dark\""), "got {text}");
    cleanup(&dir);
}

#[test]
fn test_strict_dialect_rejects_comments() {
    let dir = temp_dir();
    let path = dir.join("settings.json");
    fs::write(&path, "{ /* no */ \"text\": \"x\" }").expect("seed");
    let strict = ConfigOptions::default()
        .with_dialect(Dialect::strict())
        .shared();

    let err = jsonconf::read::<Settings>(Some(&path), Some(strict)).unwrap_err();

    assert!(matches!(err, ConfigError::Malformed { .. }));
    cleanup(&dir);
}

// ── Lifecycle ────────────────────────────────────────────────────────────────

#[test]
fn test_loaded_hook_fires_once_per_load() {
    let dir = temp_dir();
    let path = dir.join("counted.json");

    let created = jsonconf::load::<Counted>(Some(&path), defaults())
        .expect("load")
        .expect("created");
    let reread = jsonconf::load::<Counted>(Some(&path), defaults())
        .expect("load")
        .expect("read");

    assert_eq!(created.loaded_hits, 1);
    assert_eq!(reread.loaded_hits, 1);
    cleanup(&dir);
}

#[test]
fn test_listeners_see_full_create_sequence_on_disk() {
    let dir = temp_dir();
    let path = dir.join("settings.json");
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let lifecycle = Lifecycle::new().with(move |event, settings: &mut Settings| {
        if event == LifecycleEvent::Creating {
            settings.text = Some("seeded".into());
        }
        sink.lock().unwrap().push(event);
    });

    let loaded = ConfigStore::new()
        .load_with(Some(&path), defaults(), lifecycle)
        .expect("load")
        .expect("created");

    assert_eq!(loaded.text.as_deref(), Some("seeded"));
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            LifecycleEvent::Creating,
            LifecycleEvent::Saving,
            LifecycleEvent::Saved,
            LifecycleEvent::Loaded,
        ]
    );
    assert!(fs::read_to_string(&path)
        .expect("written")
        .contains("\"seeded\""));
    cleanup(&dir);
}
