//! Runs the real pixel-dump binary against temporary directories

use assert_cmd::Command;
use image::{GrayImage, Luma};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[allow(deprecated)]
fn pixel_dump_cmd() -> Command {
    Command::cargo_bin("pixel-dump").unwrap()
}

#[test]
fn test_help_output() {
    pixel_dump_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Directory of images to dump"))
        .stdout(predicate::str::contains("--threshold"));
}

#[test]
fn test_directory_is_required() {
    pixel_dump_cmd().assert().failure();
}

#[test]
fn test_dumps_given_directory() {
    let dir = TempDir::new().unwrap();
    GrayImage::from_pixel(2, 1, Luma([49]))
        .save(dir.path().join("low.png"))
        .unwrap();

    pixel_dump_cmd().arg(dir.path()).assert().success();

    let text = fs::read_to_string(dir.path().join("Output.txt")).unwrap();
    assert_eq!(text, "0;0;");
}

#[test]
fn test_threshold_flag() {
    let dir = TempDir::new().unwrap();
    GrayImage::from_pixel(2, 1, Luma([49]))
        .save(dir.path().join("low.png"))
        .unwrap();

    pixel_dump_cmd()
        .arg(dir.path())
        .args(["--threshold", "40", "--output-name", "dump.txt"])
        .assert()
        .success();

    let text = fs::read_to_string(dir.path().join("dump.txt")).unwrap();
    assert_eq!(text, "49;49;");
}

#[test]
fn test_invalid_entry_fails_run() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("readme.md"), "# not an image").unwrap();

    pixel_dump_cmd()
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("readme.md"));
}

#[test]
fn test_skip_invalid_flag() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("readme.md"), "# not an image").unwrap();
    GrayImage::from_pixel(1, 1, Luma([200]))
        .save(dir.path().join("img.png"))
        .unwrap();

    pixel_dump_cmd()
        .arg(dir.path())
        .arg("--skip-invalid")
        .assert()
        .success();

    let text = fs::read_to_string(dir.path().join("Output.txt")).unwrap();
    assert_eq!(text, "200;");
}

#[test]
fn test_channel_out_of_range() {
    let dir = TempDir::new().unwrap();
    pixel_dump_cmd()
        .arg(dir.path())
        .args(["--channel", "4"])
        .assert()
        .failure();
}

#[test]
fn test_not_a_directory() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("file.png");
    fs::write(&file, []).unwrap();
    pixel_dump_cmd().arg(&file).assert().failure();
}
