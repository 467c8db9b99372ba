use domain_fs::{NormalizedPath, io};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_parent_dirs() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("acme").join("blog.json"));

    io::write_atomic(&path, b"{}").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "{}");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("blog.json");
    fs::write(&file_path, "original").unwrap();

    let path = NormalizedPath::new(&file_path);
    io::write_atomic(&path, b"updated").unwrap();

    assert_eq!(fs::read_to_string(&file_path).unwrap(), "updated");
}

#[test]
fn test_write_atomic_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("blog.json"));

    io::write_text(&path, "{\"title\":\"Blog\"}").unwrap();

    let names: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["blog.json".to_string()]);
}

#[test]
fn test_read_text_locked_matches_read_text() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("store.json");
    fs::write(&file_path, "[1,2,3]").unwrap();

    let path = NormalizedPath::new(&file_path);
    assert_eq!(
        io::read_text_locked(&path).unwrap(),
        io::read_text(&path).unwrap()
    );
}

#[test]
fn test_read_text_nonexistent_file() {
    let path = NormalizedPath::new("/nonexistent/file.json");
    assert!(io::read_text(&path).is_err());
}
