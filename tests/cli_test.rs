// tests/cli_test.rs
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn verbump(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_verbump"))
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .expect("Failed to execute verbump")
}

fn project(version: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("package.json"),
        format!("{{\"name\": \"app\", \"version\": \"{}\"}}\n", version),
    )
    .unwrap();
    dir
}

#[test]
fn test_verbump_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_verbump"))
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("verbump"));
    assert!(stdout.contains("--dry-run"));
}

#[test]
fn test_patch_bump_non_interactive() {
    let dir = project("1.2.3");
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(
        dir.path().join("src/version.ts"),
        "export const version = \"1.2.3\";\n",
    )
    .unwrap();

    let output = verbump(dir.path(), &["-f", "package.json", "src/version.ts"]);

    assert_eq!(output.status.code(), Some(0));
    let package = fs::read_to_string(dir.path().join("package.json")).unwrap();
    assert!(package.contains("\"version\": \"1.2.4\""));
    let source = fs::read_to_string(dir.path().join("src/version.ts")).unwrap();
    assert_eq!(source, "export const version = \"1.2.4\";\n");
}

#[test]
fn test_set_implies_manual_mode() {
    let dir = project("1.2.3");

    let output = verbump(dir.path(), &["--set", "2.0.0-beta.1"]);

    assert_eq!(output.status.code(), Some(0));
    let package = fs::read_to_string(dir.path().join("package.json")).unwrap();
    assert!(package.contains("2.0.0-beta.1"));
}

#[test]
fn test_manual_without_target_is_usage_error() {
    let dir = project("1.2.3");

    let output = verbump(dir.path(), &["--mode", "manual"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("ERROR:"));
    let package = fs::read_to_string(dir.path().join("package.json")).unwrap();
    assert!(package.contains("1.2.3"));
}

#[test]
fn test_invalid_mode_is_usage_error() {
    let dir = project("1.2.3");
    let output = verbump(dir.path(), &["--mode", "huge"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_missing_manifest_is_fatal() {
    let dir = tempfile::tempdir().unwrap();

    let output = verbump(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stderr.lines().filter(|l| l.contains("ERROR:")).count(), 1);
}

#[test]
fn test_dry_run_leaves_files() {
    let dir = project("1.0.0");

    let output = verbump(dir.path(), &["--dry-run", "--mode", "major"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("2.0.0"));
    let package = fs::read_to_string(dir.path().join("package.json")).unwrap();
    assert!(package.contains("1.0.0"));
}

#[test]
fn test_check_exits_one_on_mismatch() {
    let dir = project("1.0.0");
    fs::write(dir.path().join("version.py"), "__version__ = \"0.9.0\"\n").unwrap();

    let output = verbump(dir.path(), &["--check", "-f", "version.py"]);
    assert_eq!(output.status.code(), Some(1));

    fs::write(dir.path().join("version.py"), "__version__ = \"1.0.0\"\n").unwrap();
    let output = verbump(dir.path(), &["--check", "-f", "version.py"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_config_file_supplies_filters() {
    let dir = project("3.1.4");
    fs::write(dir.path().join("VERSION.rb"), "VERSION = '3.1.4'\n").unwrap();
    fs::write(
        dir.path().join("verbump.toml"),
        "[bump]\nfilter = [\"package.json\", \"VERSION.rb\"]\nmode = \"minor\"\n",
    )
    .unwrap();

    let output = verbump(dir.path(), &["--yes"]);

    assert_eq!(output.status.code(), Some(0));
    let ruby = fs::read_to_string(dir.path().join("VERSION.rb")).unwrap();
    assert_eq!(ruby, "VERSION = '3.2.0'\n");
}
