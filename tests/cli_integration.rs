//! CLI integration tests for sbpt.
//!
//! These tests drive the `sbpt` binary against temporary source trees. The
//! home directory is redirected so no user configuration or cache leaks in,
//! and the remote catalog is disabled.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the sbpt binary command, isolated from the user's environment.
fn sbpt(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sbpt").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("XDG_CACHE_HOME", home.join(".cache"))
        .env("SBPT_OFFLINE", "true")
        .env_remove("RUST_LOG");
    cmd
}

/// Create a temporary directory for test trees.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Write a subproject manifest (and its exported headers) into `dir`.
fn subproject(dir: &Path, deps: &str, exports: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join("sbpt.ini"),
        format!(
            "[subproject]\ndependencies = {}\nexport = {}\ntags = \n",
            deps, exports
        ),
    )
    .unwrap();
    for export in exports.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        fs::write(dir.join(export), "").unwrap();
    }
}

// ============================================================================
// sbpt list
// ============================================================================

#[test]
fn test_list_prints_subprojects() {
    let tmp = temp_dir();
    let root = tmp.path().join("src");
    subproject(&root.join("alpha"), "beta", "alpha.hpp");
    subproject(&root.join("libs/beta"), "", "beta.hpp");

    sbpt(tmp.path())
        .args(["list"])
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha"))
        .stdout(predicate::str::contains("beta"))
        .stdout(predicate::str::contains(
            root.join("libs/beta").display().to_string(),
        ));
}

#[test]
fn test_list_json() {
    let tmp = temp_dir();
    let root = tmp.path().join("src");
    subproject(&root.join("window"), "", "window.hpp");

    let output = sbpt(tmp.path())
        .args(["list", "--json"])
        .arg(&root)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let subprojects = json["subprojects"].as_array().unwrap();
    assert_eq!(subprojects.len(), 1);
    assert_eq!(subprojects[0]["name"], "window");
    assert_eq!(subprojects[0]["exports"][0], "window.hpp");
    assert!(json["problems"].as_array().unwrap().is_empty());
}

#[test]
fn test_list_json_reports_errors_on_stdout() {
    let tmp = temp_dir();

    let output = sbpt(tmp.path())
        .args(["list", "--json"])
        .arg(tmp.path().join("missing"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let event: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(event["reason"], "error");
    assert!(event["message"]
        .as_str()
        .unwrap()
        .contains("is not a directory"));
}

#[test]
fn test_list_rejects_malformed_manifest() {
    let tmp = temp_dir();
    let root = tmp.path().join("src");
    fs::create_dir_all(root.join("broken")).unwrap();
    fs::write(
        root.join("broken/sbpt.ini"),
        "[subproject]\ndependencies = a\nstray\nexport = x.hpp\n",
    )
    .unwrap();

    sbpt(tmp.path())
        .args(["list", "--color", "never"])
        .arg(&root)
        .assert()
        .success()
        .stderr(predicate::str::contains("found `stray` (line 3"))
        .stdout(predicate::str::contains("broken").not());
}

#[test]
fn test_list_reports_duplicate_names() {
    let tmp = temp_dir();
    let root = tmp.path().join("src");
    subproject(&root.join("libs/util"), "", "util.hpp");
    subproject(&root.join("a/b/util"), "", "util.hpp");

    sbpt(tmp.path())
        .args(["list", "--color", "never"])
        .arg(&root)
        .assert()
        .success()
        .stderr(predicate::str::contains("duplicate subproject name `util`"))
        .stdout(predicate::str::contains(
            root.join("libs/util").display().to_string(),
        ));
}

// ============================================================================
// sbpt create
// ============================================================================

#[test]
fn test_create_scaffolds_subproject() {
    let tmp = temp_dir();
    let dir = tmp.path().join("shader_cache");

    sbpt(tmp.path())
        .args(["create"])
        .arg(&dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("subproject `shader_cache` created"));

    assert!(dir.join("shader_cache.hpp").exists());
    assert!(dir.join("shader_cache.cpp").exists());
    let manifest = fs::read_to_string(dir.join("sbpt.ini")).unwrap();
    assert!(manifest.contains("[subproject]"));
    assert!(manifest.contains("export = shader_cache.hpp"));
}

#[test]
fn test_create_skips_existing_files() {
    let tmp = temp_dir();
    let dir = tmp.path().join("util");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("util.hpp"), "// keep me\n").unwrap();

    sbpt(tmp.path())
        .args(["create", "--color", "never"])
        .arg(&dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("Skipped"));

    assert_eq!(
        fs::read_to_string(dir.join("util.hpp")).unwrap(),
        "// keep me\n"
    );
}

// ============================================================================
// sbpt init
// ============================================================================

#[test]
fn test_init_generates_includes() {
    let tmp = temp_dir();
    let root = tmp.path().join("src");
    subproject(&root.join("alpha"), "beta", "alpha.hpp");
    subproject(&root.join("beta"), "", "beta.hpp");

    sbpt(tmp.path())
        .args(["init"])
        .arg(&root)
        .assert()
        .success()
        .stderr(predicate::str::contains("subprojects successfully configured"));

    assert_eq!(
        fs::read_to_string(root.join("alpha/sbpt_generated_includes.hpp")).unwrap(),
        "#include \"../beta/beta.hpp\""
    );
    assert_eq!(
        fs::read_to_string(root.join("alpha/.gitignore")).unwrap(),
        ".gitignore\nsbpt_generated_includes.hpp\n"
    );
    assert!(root.join("beta/sbpt_generated_includes.hpp").exists());
}

#[test]
fn test_init_aborts_on_unacquirable_dependency() {
    let tmp = temp_dir();
    let root = tmp.path().join("src");
    subproject(&root.join("app"), "ghost", "app.hpp");

    sbpt(tmp.path())
        .args(["init", "--color", "never"])
        .arg(&root)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("could not acquire `ghost`"));

    assert!(!root.join("app/sbpt_generated_includes.hpp").exists());
}

#[test]
fn test_init_requires_directory() {
    let tmp = temp_dir();

    sbpt(tmp.path())
        .args(["init"])
        .arg(tmp.path().join("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));
}

// ============================================================================
// misc
// ============================================================================

#[test]
fn test_completions() {
    let tmp = temp_dir();

    sbpt(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sbpt"));
}

#[test]
fn test_help_lists_commands() {
    let tmp = temp_dir();

    sbpt(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("refresh-known-repos"));
}
