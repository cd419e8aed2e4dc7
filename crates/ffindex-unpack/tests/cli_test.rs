#![allow(clippy::unwrap_used)]
//! Integration tests for the ffindex-unpack command line

use assert_cmd::Command;
use predicates::prelude::*;

fn write_archive(dir: &std::path::Path) {
    std::fs::write(dir.join("db.ffdata"), b"HELLO\0WORLD\0FOO\0").unwrap();
    std::fs::write(dir.join("db.ffindex"), "h\t0\t6\nw\t6\t6\nf\t12\t4\n").unwrap();
    std::fs::create_dir(dir.join("out")).unwrap();
}

fn unpack_cmd(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("ffindex-unpack").unwrap();
    cmd.env_remove("FFINDEX_UNPACK_BATCHES")
        .env_remove("FFINDEX_UNPACK_LENIENT")
        .current_dir(dir);
    cmd
}

#[test]
fn test_help() {
    let mut cmd = Command::cargo_bin("ffindex-unpack").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("DATA_FILENAME"))
        .stdout(predicate::str::contains("INDEX_FILENAME"))
        .stdout(predicate::str::contains("OUT_DIR"))
        .stdout(predicate::str::contains("--batches"))
        .stdout(predicate::str::contains("--lenient"));
}

#[test]
fn test_missing_arguments_print_usage() {
    let dir = tempfile::tempdir().unwrap();
    unpack_cmd(dir.path())
        .args(["db.ffdata", "db.ffindex"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_unpack_single_batch() {
    let dir = tempfile::tempdir().unwrap();
    write_archive(dir.path());

    unpack_cmd(dir.path())
        .args(["--batches", "1", "db.ffdata", "db.ffindex", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 entries, in 1 batches, batch_size: 3"))
        .stdout(predicate::str::contains("0, from 0 to 3"))
        .stdout(predicate::str::contains("0, written: 13"));

    assert_eq!(
        std::fs::read(dir.path().join("out/0.txt")).unwrap(),
        b"HELLOWORLDFOO"
    );
}

#[test]
fn test_batches_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    write_archive(dir.path());

    unpack_cmd(dir.path())
        .env("FFINDEX_UNPACK_BATCHES", "3")
        .args(["db.ffdata", "db.ffindex", "out"])
        .assert()
        .success();

    for (name, expected) in [("0.txt", "HELLO"), ("1.txt", "WORLD"), ("2.txt", "FOO")] {
        assert_eq!(
            std::fs::read_to_string(dir.path().join("out").join(name)).unwrap(),
            expected
        );
    }
}

#[test]
fn test_missing_data_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_archive(dir.path());

    unpack_cmd(dir.path())
        .args(["missing.ffdata", "db.ffindex", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.ffdata"));
}

#[test]
fn test_missing_output_dir_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_archive(dir.path());

    unpack_cmd(dir.path())
        .args(["db.ffdata", "db.ffindex", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid output directory"));
}

#[test]
fn test_malformed_index_strict_and_lenient() {
    let dir = tempfile::tempdir().unwrap();
    write_archive(dir.path());
    std::fs::write(dir.path().join("db.ffindex"), "h\t0\t6\nbroken line\n").unwrap();

    unpack_cmd(dir.path())
        .args(["db.ffdata", "db.ffindex", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid index line 2"));

    unpack_cmd(dir.path())
        .args(["--lenient", "--batches", "1", "db.ffdata", "db.ffindex", "out"])
        .assert()
        .success();

    assert_eq!(
        std::fs::read(dir.path().join("out/0.txt")).unwrap(),
        b"HELLO"
    );
}
