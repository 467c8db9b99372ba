//! Tests for the filesystem config source

use domain_fs::{ConfigSource, DomainKey, Error, FsConfigSource};
use rstest::{fixture, rstest};
use std::fs;
use tempfile::TempDir;

#[fixture]
fn config_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let org = dir.path().join("acme");
    fs::create_dir_all(&org).unwrap();
    fs::write(org.join("blog.json"), r#"{"title":"Blog","identifier":"blog"}"#).unwrap();
    fs::write(org.join("shop.json"), r#"{"title":"Shop","identifier":"shop"}"#).unwrap();
    fs::write(org.join("notes.txt"), "ignored").unwrap();
    dir
}

#[rstest]
fn lists_only_json_configs(config_dir: TempDir) {
    let source = FsConfigSource::new(config_dir.path());
    let listed: Vec<_> = source.list_available("acme").unwrap().into_iter().collect();
    assert_eq!(listed, vec!["blog".to_string(), "shop".to_string()]);
}

#[rstest]
fn unknown_organization_lists_nothing(config_dir: TempDir) {
    let source = FsConfigSource::new(config_dir.path());
    assert!(source.list_available("nobody").unwrap().is_empty());
}

#[rstest]
#[case("blog", true)]
#[case("shop", true)]
#[case("wiki", false)]
fn exists_matches_files(config_dir: TempDir, #[case] identifier: &str, #[case] expected: bool) {
    let source = FsConfigSource::new(config_dir.path());
    assert_eq!(source.exists(&DomainKey::new("acme", identifier)), expected);
}

#[rstest]
fn read_missing_is_not_found(config_dir: TempDir) {
    let source = FsConfigSource::new(config_dir.path());
    let err = source.read(&DomainKey::new("acme", "wiki")).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert_eq!(source.read_optional(&DomainKey::new("acme", "wiki")).unwrap(), None);
}

#[rstest]
fn write_creates_organization_directory(config_dir: TempDir) {
    let mut source = FsConfigSource::new(config_dir.path());
    let key = DomainKey::new("globex", "intranet");

    source.write(&key, "{}").unwrap();

    assert!(config_dir.path().join("globex").join("intranet.json").is_file());
    assert_eq!(source.read(&key).unwrap(), "{}");
}
