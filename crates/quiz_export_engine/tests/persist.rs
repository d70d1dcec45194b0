use std::fs;

use quiz_export_engine::{ensure_output_dir, AtomicFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("exports").join("nested");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_export() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("Quiz.csv", "\u{feff}a;b".as_bytes()).unwrap();
    assert_eq!(first.file_name().unwrap(), "Quiz.csv");
    assert_eq!(fs::read_to_string(&first).unwrap(), "\u{feff}a;b");

    let second = writer.write("Quiz.csv", b"c;d").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"c;d");
}

#[test]
fn no_partial_file_when_target_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("Quiz.csv", b"data");
    assert!(matches!(result, Err(PersistError::OutputDir(_))));
    assert!(!file_path.with_file_name("Quiz.csv").exists());
}

#[test]
fn filenames_cannot_escape_the_directory() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().join("out"));

    for name in ["../Quiz.csv", "a/b.csv", "a\\b.csv", "..", ""] {
        let result = writer.write(name, b"x");
        assert!(
            matches!(result, Err(PersistError::InvalidFilename(_))),
            "{name:?} was accepted"
        );
    }
    assert!(!temp.path().join("Quiz.csv").exists());
}

#[test]
fn replacing_an_export_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());
    writer.write("Quiz.csv", b"old").unwrap();
    writer.write("Quiz.csv", b"new").unwrap();

    let names: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(names, vec!["Quiz.csv"]);
    assert_eq!(fs::read(temp.path().join("Quiz.csv")).unwrap(), b"new");
}
