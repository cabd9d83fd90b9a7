use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn setup_home() -> tempfile::TempDir {
    let dir = tempdir().unwrap();

    write_file(
        dir.path(),
        ".keep",
        "# rules for the base home\nb config/settings.ini\nbi cache/**\n",
    );
    write_file(dir.path(), "config/settings.ini", "[main]");
    write_file(dir.path(), "config/other.txt", "other");
    write_file(dir.path(), "cache/a/b.tmp", "tmp");
    write_file(dir.path(), "extra.log", "log");

    dir
}

fn keepengine() -> Command {
    let mut cmd = Command::cargo_bin("keepengine").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_dry_run_lists_deletions() {
    let dir = setup_home();
    let rules = dir.path().join(".keep");

    keepengine()
        .arg("base")
        .arg(&rules)
        .arg(dir.path())
        .arg("--dryrun")
        .assert()
        .success()
        .stdout(predicate::str::contains("[Delete] file: config/other.txt"))
        .stdout(predicate::str::contains("[Delete] file: extra.log"))
        .stdout(predicate::str::contains("settings.ini").not())
        .stdout(predicate::str::contains("Dry run mode: No files were deleted."));

    assert!(dir.path().join("config/other.txt").exists());
    assert!(dir.path().join("extra.log").exists());
}

#[test]
fn test_dry_run_alias() {
    let dir = setup_home();

    keepengine()
        .arg("base")
        .arg(dir.path().join(".keep"))
        .arg(dir.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("[Delete] file: extra.log"));

    assert!(dir.path().join("extra.log").exists());
}

#[test]
fn test_base_mode_deletes() {
    let dir = setup_home();

    keepengine()
        .arg("base")
        .arg(dir.path().join(".keep"))
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2 paths"));

    assert!(dir.path().join(".keep").exists());
    assert!(dir.path().join("config/settings.ini").exists());
    assert!(dir.path().join("cache/a/b.tmp").exists());
    assert!(!dir.path().join("config/other.txt").exists());
    assert!(!dir.path().join("extra.log").exists());
}

#[test]
fn test_user_mode_deletes_always_rules() {
    let base = setup_home();
    let user = tempdir().unwrap();
    write_file(user.path(), "config/settings.ini", "[main]");
    write_file(user.path(), "config/other.txt", "other");
    write_file(user.path(), "cache/a/b.tmp", "tmp");
    write_file(user.path(), "extra.log", "log");

    keepengine()
        .arg("user")
        .arg(base.path().join(".keep"))
        .arg(user.path())
        .arg("--verbose")
        .assert()
        .success()
        .stdout(predicate::str::contains("[Delete] file: config/settings.ini"))
        .stdout(predicate::str::contains("Removed 1 paths"));

    assert!(!user.path().join("config/settings.ini").exists());
    assert!(user.path().join("config/other.txt").exists());
    assert!(user.path().join("cache/a/b.tmp").exists());
    assert!(user.path().join("extra.log").exists());
}

#[test]
fn test_sizes_flag_reports_total() {
    let dir = setup_home();

    keepengine()
        .arg("base")
        .arg(dir.path().join(".keep"))
        .arg(dir.path())
        .arg("--dryrun")
        .arg("--sizes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Size Found: 8 B"));
}

#[test]
fn test_explain_path() {
    let dir = setup_home();

    keepengine()
        .arg("base")
        .arg(dir.path().join(".keep"))
        .arg(dir.path())
        .arg("--explain")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("keep=true descend=true"));

    keepengine()
        .arg("user")
        .arg(dir.path().join(".keep"))
        .arg(dir.path())
        .arg("--explain")
        .arg("config/settings.ini")
        .assert()
        .success()
        .stdout(predicate::str::contains("keep=false descend=false"));

    // explaining never touches the tree
    assert!(dir.path().join("extra.log").exists());
}

#[test]
fn test_config_adds_rules() {
    let dir = setup_home();
    let config_dir = tempdir().unwrap();
    let config = config_dir.path().join("keepengine.toml");
    fs::write(&config, "[rules]\ninitially = [\"*.log\"]\n").unwrap();

    keepengine()
        .arg("base")
        .arg(dir.path().join(".keep"))
        .arg(dir.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 paths"));

    assert!(dir.path().join("extra.log").exists());
    assert!(!dir.path().join("config/other.txt").exists());
}

#[test]
fn test_missing_folder_fails() {
    let dir = setup_home();

    keepengine()
        .arg("base")
        .arg(dir.path().join(".keep"))
        .arg(dir.path().join("does-not-exist"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_missing_rules_file_fails() {
    let dir = setup_home();

    keepengine()
        .arg("base")
        .arg(dir.path().join("missing.keep"))
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load keep rules"));

    assert!(dir.path().join("extra.log").exists());
}

#[test]
fn test_invalid_rule_fails_before_cleanup() {
    let dir = setup_home();
    fs::write(dir.path().join(".keep"), "b config/settings.ini\nbi /cache\n").unwrap();

    keepengine()
        .arg("base")
        .arg(dir.path().join(".keep"))
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));

    assert!(dir.path().join("extra.log").exists());
    assert!(dir.path().join("config/other.txt").exists());
}

#[test]
fn test_invalid_mode_rejected() {
    let dir = setup_home();

    keepengine()
        .arg("everything")
        .arg(dir.path().join(".keep"))
        .arg(dir.path())
        .assert()
        .failure();

    assert!(dir.path().join("extra.log").exists());
}
