use std::path::PathBuf;
use std::time::{Duration, Instant};

use tempfile::TempDir;

use super::SourceWatcher;
use super::debouncer::{ChangeKind, DEBOUNCE_MS, Debouncer};
use crate::utils::path::normalize_path;

fn make_event(paths: Vec<PathBuf>, kind: notify::EventKind) -> notify::Event {
    notify::Event {
        kind,
        paths,
        attrs: Default::default(),
    }
}

fn modify_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Data(
        notify::event::DataChange::Any,
    ))
}

fn metadata_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Metadata(
        notify::event::MetadataKind::WriteTime,
    ))
}

fn create_kind() -> notify::EventKind {
    notify::EventKind::Create(notify::event::CreateKind::File)
}

fn remove_kind() -> notify::EventKind {
    notify::EventKind::Remove(notify::event::RemoveKind::File)
}

/// Debouncer over a temp root with `<root>/target` ignored.
fn make_debouncer() -> (TempDir, PathBuf, Debouncer) {
    let temp = TempDir::new().unwrap();
    let root = normalize_path(temp.path());
    std::fs::create_dir_all(root.join("target")).unwrap();
    let debouncer = Debouncer::new(&[root.join("target")]);
    (temp, root, debouncer)
}

/// Pretend the last event happened a full window ago.
fn expire_window(debouncer: &mut Debouncer) {
    debouncer.last_event = Some(Instant::now() - Duration::from_millis(DEBOUNCE_MS + 50));
}

#[test]
fn test_debouncer_empty() {
    let (_temp, _root, debouncer) = make_debouncer();
    assert!(!debouncer.is_ready());
    assert_eq!(debouncer.sleep_duration(), Duration::from_secs(86400));
}

#[test]
fn test_event_routing_by_kind() {
    let (_temp, root, mut debouncer) = make_debouncer();

    debouncer.add_event(&make_event(vec![root.join("a.mbt")], create_kind()));
    debouncer.add_event(&make_event(vec![root.join("b.mbt")], modify_kind()));
    debouncer.add_event(&make_event(vec![root.join("c.mbt")], remove_kind()));

    assert_eq!(debouncer.changes.len(), 3);
    assert_eq!(debouncer.changes[&root.join("a.mbt")], ChangeKind::Created);
    assert_eq!(debouncer.changes[&root.join("b.mbt")], ChangeKind::Modified);
    assert_eq!(debouncer.changes[&root.join("c.mbt")], ChangeKind::Removed);
}

#[test]
fn test_metadata_change_ignored() {
    let (_temp, root, mut debouncer) = make_debouncer();
    debouncer.add_event(&make_event(vec![root.join("a.mbt")], metadata_kind()));
    assert!(debouncer.changes.is_empty());
    assert!(debouncer.last_event.is_none());
}

#[test]
fn test_temp_and_hidden_files_ignored() {
    let (_temp, root, mut debouncer) = make_debouncer();

    debouncer.add_event(&make_event(
        vec![
            root.join("main.mbt.swp"),
            root.join("main.mbt~"),
            root.join(".main.mbt"),
            root.join("main.mbt"),
        ],
        modify_kind(),
    ));

    assert_eq!(debouncer.changes.len(), 1);
    assert!(debouncer.changes.contains_key(&root.join("main.mbt")));
}

#[test]
fn test_output_and_dependency_dirs_ignored() {
    let (_temp, root, mut debouncer) = make_debouncer();

    debouncer.add_event(&make_event(
        vec![
            root.join("target/js/debug/build/app/app.js"),
            root.join(".mooncakes/moonbitlang/x/lib.mbt"),
            root.join("src/.mooncakes/dep.mbt"),
        ],
        create_kind(),
    ));

    assert!(debouncer.changes.is_empty());
}

#[test]
fn test_dedup_first_event_wins() {
    let (_temp, root, mut debouncer) = make_debouncer();
    let path = root.join("a.mbt");

    debouncer.add_event(&make_event(vec![path.clone()], create_kind()));
    debouncer.add_event(&make_event(vec![path.clone()], modify_kind()));

    assert_eq!(debouncer.changes[&path], ChangeKind::Created);
}

#[test]
fn test_remove_then_create_restores() {
    let (_temp, root, mut debouncer) = make_debouncer();
    let path = root.join("a.mbt");

    debouncer.add_event(&make_event(vec![path.clone()], remove_kind()));
    debouncer.add_event(&make_event(vec![path.clone()], create_kind()));

    assert_eq!(debouncer.changes[&path], ChangeKind::Created);
}

#[test]
fn test_create_then_remove_discards() {
    let (_temp, root, mut debouncer) = make_debouncer();
    let path = root.join("scratch.mbt");

    debouncer.add_event(&make_event(vec![path.clone()], create_kind()));
    debouncer.add_event(&make_event(vec![path], remove_kind()));

    assert!(debouncer.changes.is_empty());
}

#[test]
fn test_cancelled_window_goes_idle() {
    let (_temp, root, mut debouncer) = make_debouncer();
    let path = root.join("4913");

    debouncer.add_event(&make_event(vec![path.clone()], create_kind()));
    debouncer.add_event(&make_event(vec![path], remove_kind()));
    expire_window(&mut debouncer);

    assert!(debouncer.take_if_ready().is_none());
    assert!(debouncer.last_event.is_none());
    assert_eq!(debouncer.sleep_duration(), Duration::from_secs(86400));
}

#[test]
fn test_modify_then_remove_upgrades() {
    let (_temp, root, mut debouncer) = make_debouncer();
    let path = root.join("a.mbt");

    debouncer.add_event(&make_event(vec![path.clone()], modify_kind()));
    debouncer.add_event(&make_event(vec![path.clone()], remove_kind()));

    assert_eq!(debouncer.changes[&path], ChangeKind::Removed);
}

#[test]
fn test_not_ready_inside_window() {
    let (_temp, root, mut debouncer) = make_debouncer();
    debouncer.add_event(&make_event(vec![root.join("a.mbt")], modify_kind()));

    assert!(!debouncer.is_ready());
    assert!(debouncer.take_if_ready().is_none());
    assert!(debouncer.sleep_duration() <= Duration::from_millis(DEBOUNCE_MS));
}

#[test]
fn test_take_returns_sorted_batch_and_resets() {
    let (_temp, root, mut debouncer) = make_debouncer();
    debouncer.add_event(&make_event(vec![root.join("b.mbt"), root.join("a.mbt")], modify_kind()));
    expire_window(&mut debouncer);

    let batch = debouncer.take_if_ready().unwrap();
    assert_eq!(batch, vec![root.join("a.mbt"), root.join("b.mbt")]);
    assert!(debouncer.changes.is_empty());
    assert!(debouncer.last_event.is_none());
    assert!(debouncer.take_if_ready().is_none());
}

#[test]
fn test_watcher_reports_source_edit() {
    let temp = TempDir::new().unwrap();
    let root = normalize_path(temp.path());
    let mut watcher = SourceWatcher::new(&root, &[root.join("target")]).unwrap();

    let file = root.join("main.mbt");
    std::fs::write(&file, "fn main {}").unwrap();

    let batch = watcher.next_batch().unwrap();
    assert!(batch.contains(&file), "batch: {batch:?}");
}
