//! End-to-end tests for the stamp binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// `stamp` isolated from the caller's config files and environment
fn stamp_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("stamp").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("STAMP_SOURCE_DIR")
        .env_remove("STAMP_OUTPUT_DIR")
        .env_remove("STAMP_MANIFEST")
        .env_remove("STAMP_EXTENSIONS")
        .env_remove("RUST_LOG");
    cmd
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn shader_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "shaders/fx/bloom.v2.frag", "X");
    write(dir.path(), "shaders/common/utils.glsl", "float luma();");
    write(dir.path(), "shaders/notes.txt", "not a shader");
    dir
}

fn read_manifest(path: &Path) -> serde_json::Map<String, serde_json::Value> {
    let text = fs::read_to_string(path).unwrap();
    match serde_json::from_str(&text).unwrap() {
        serde_json::Value::Object(map) => map,
        other => panic!("manifest is not an object: {}", other),
    }
}

#[test]
fn test_hash_with_defaults() {
    let dir = shader_project();

    stamp_cmd(dir.path())
        .arg("hash")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hashed 2 file(s)"));

    let manifest = read_manifest(&dir.path().join("build/shader_manifest.json"));
    assert_eq!(manifest.len(), 2);
    assert_eq!(manifest["fx/bloom.v2.frag"], "fx/bloom.v2.4b68ab38.frag");
    assert!(dir.path().join("build/shaders/fx/bloom.v2.4b68ab38.frag").is_file());
    assert!(!dir.path().join("build/shaders/notes.txt").exists());
}

#[test]
fn test_hash_with_flags_and_list() {
    let dir = shader_project();

    stamp_cmd(dir.path())
        .args([
            "hash", "--src", "shaders", "--out", "dist/gl", "--manifest", "dist/map.json", "--ext",
            "glsl", "--list",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("common/utils.glsl -> common/utils."));

    let manifest = read_manifest(&dir.path().join("dist/map.json"));
    assert_eq!(manifest.len(), 1);
    assert!(manifest.contains_key("common/utils.glsl"));
}

#[test]
fn test_hash_reads_project_config() {
    let dir = shader_project();
    write(
        dir.path(),
        "stamp.toml",
        "[hash]\nsource_dir = \"shaders\"\noutput_dir = \"out\"\nmanifest = \"out.json\"\nextensions = [\".frag\"]\n",
    );

    stamp_cmd(dir.path()).arg("hash").assert().success();

    let manifest = read_manifest(&dir.path().join("out.json"));
    assert_eq!(manifest.len(), 1);
    assert!(dir.path().join("out/fx").is_dir());
}

#[test]
fn test_missing_source_fails_without_writes() {
    let dir = TempDir::new().unwrap();

    stamp_cmd(dir.path())
        .args(["hash", "--src", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Source directory not found"));

    assert!(!dir.path().join("build").exists());
}

#[test]
fn test_resolve() {
    let dir = shader_project();
    stamp_cmd(dir.path()).arg("hash").assert().success();

    stamp_cmd(dir.path())
        .args(["resolve", "./fx/bloom.v2.frag"])
        .assert()
        .success()
        .stdout("fx/bloom.v2.4b68ab38.frag\n");

    stamp_cmd(dir.path())
        .args(["resolve", "fx/missing.frag"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not in"));
}

#[test]
fn test_verify_clean_and_tampered() {
    let dir = shader_project();
    stamp_cmd(dir.path()).arg("hash").assert().success();

    stamp_cmd(dir.path())
        .arg("verify")
        .assert()
        .success()
        .stdout(predicate::str::contains("All 2 file(s) verified."));

    fs::write(dir.path().join("build/shaders/fx/bloom.v2.4b68ab38.frag"), "Y").unwrap();

    stamp_cmd(dir.path())
        .args(["verify", "--format", "json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"clean\": false"));
}

#[test]
fn test_fingerprint() {
    let dir = shader_project();

    stamp_cmd(dir.path())
        .args(["fingerprint", "shaders/fx/bloom.v2.frag"])
        .assert()
        .success()
        .stdout("4b68ab38  shaders/fx/bloom.v2.frag\n");

    stamp_cmd(dir.path())
        .args(["fingerprint", "--full", "shaders/fx/bloom.v2.frag"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "4b68ab3847feda7d6c62c1fbcbeebfa35eab7351ed5e78f4ddadea5df64b8015",
        ));
}
