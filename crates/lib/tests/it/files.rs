//! Reading and writing documents on disk.

use seria::format::{self, FormatOptions, LineEnding};

use crate::helpers::{DESIGN, SAVE};

#[test]
fn test_read_modify_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("world.seria");
    std::fs::write(&path, SAVE).unwrap();

    let mut save = format::read_file(&path).unwrap();
    assert_eq!(save.get_as::<i64>("m_time").unwrap(), Some(77));
    format::write_file(&path, &save).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), SAVE);

    save.set("m_time", 78).unwrap();
    format::write_file(&path, &save).unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        SAVE.replace("m_time=77", "m_time=78")
    );

    // the temporary file is gone after the rename
    let names: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(names.len(), 1);
}

#[test]
fn test_write_file_with_options() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("built.seria");

    let mut ship = seria::Node::new("Ship", 7);
    ship.set("m_name", "BRIG").unwrap();
    let options = FormatOptions {
        indent: "    ".to_string(),
        line_ending: LineEnding::CrLf,
    };
    format::write_file_with(&path, &ship, &options).unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "Ship 7\r\n{\r\n    m_name=BRIG\r\n}\r\n"
    );
    assert_eq!(format::read_file(&path).unwrap(), ship);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.seria");

    let err = format::read_file(&path).unwrap_err();
    assert!(err.is_io_error());
    assert_eq!(err.module(), "io");
    assert!(err.to_string().contains("absent.seria"));
}

#[test]
fn test_invalid_utf8_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("binary.seria");
    std::fs::write(&path, [0x53, 0x68, 0xff, 0xfe, 0x20, 0x37]).unwrap();

    assert!(format::read_file(&path).unwrap_err().is_io_error());
}

#[test]
fn test_malformed_file_reports_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.seria");
    std::fs::write(&path, &DESIGN[..DESIGN.len() - 3]).unwrap();

    let err = format::read_file(&path).unwrap_err();
    assert!(err.is_malformed());
    assert!(!err.is_io_error());
}

#[test]
fn test_write_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("out.seria");
    let err = format::write_file(&path, &seria::Node::new("Ship", 7)).unwrap_err();
    assert!(err.is_io_error());
}
