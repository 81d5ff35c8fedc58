//! Save files on disk: atomic replacement, backups, and inspection.

use std::fs;

use strongbox_foundation::{ErrorKind, Namespace};
use strongbox_persist::save::backup_path;
use strongbox_persist::{
    PersistConfig, load_from_file, save_to_bytes, save_to_file, summarize,
};
use strongbox_stock::{stock_registry, tags};

use crate::{shard, snapshot};

#[test]
fn file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shard.sav");
    let shard = shard();

    let report = save_to_file(&shard.world, &path, &PersistConfig::default()).unwrap();
    assert_eq!(report.bytes as u64, fs::metadata(&path).unwrap().len());

    let (loaded, _) = load_from_file(&path, stock_registry().unwrap(), &PersistConfig::durable()).unwrap();
    assert_eq!(snapshot(&loaded), snapshot(&shard.world));
}

#[test]
fn backup_holds_the_previous_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shard.sav");
    let mut shard = shard();
    let config = PersistConfig::default();

    save_to_file(&shard.world, &path, &config).unwrap();
    let first = fs::read(&path).unwrap();
    assert!(!backup_path(&path).exists());

    shard.world.spawn(tags::ITEM).unwrap();
    save_to_file(&shard.world, &path, &config).unwrap();

    assert_eq!(fs::read(backup_path(&path)).unwrap(), first);
    assert_ne!(fs::read(&path).unwrap(), first);
}

#[test]
fn fast_config_keeps_no_backup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shard.sav");
    let shard = shard();

    save_to_file(&shard.world, &path, &PersistConfig::fast()).unwrap();
    save_to_file(&shard.world, &path, &PersistConfig::fast()).unwrap();

    assert!(!backup_path(&path).exists());
    let entries = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1, "temporary files must not be left behind");
}

#[test]
fn failed_save_leaves_previous_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shard.sav");
    let shard = shard();
    save_to_file(&shard.world, &path, &PersistConfig::fast()).unwrap();
    let before = fs::read(&path).unwrap();

    let missing = dir.path().join("nowhere").join("shard.sav");
    let err = save_to_file(&shard.world, &missing, &PersistConfig::fast()).unwrap_err();

    assert!(matches!(err.kind, ErrorKind::IoError(_)));
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn summary_lists_records_without_decoding() {
    let shard = shard();
    let (bytes, report) = save_to_bytes(&shard.world).unwrap();
    let summary = summarize(&bytes).unwrap();

    assert!(summary.counts_match());
    assert_eq!(summary.records.len(), report.records);
    assert_eq!(summary.bytes, bytes.len());
    assert_eq!(summary.header.counts.get(&Namespace::Character), Some(&2));
    assert_eq!(summary.tag_counts().get(tags::ITEM), Some(&4));
    assert_eq!(summary.tag_counts().get(tags::CORPSE), Some(&1));
}
