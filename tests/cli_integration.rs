//! CLI integration tests for Slipway.
//!
//! These exercise resolution and validation end to end through the
//! binary. The build pipeline itself needs network access and CMake, so
//! it is only tested up to its early failure points.

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the slipway binary command.
fn slipway() -> Command {
    Command::cargo_bin("slipway").unwrap()
}

/// Create a temporary working directory so the repository's own
/// slipway.toml is never picked up.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

// ============================================================================
// slipway resolve
// ============================================================================

#[test]
fn test_resolve_defaults() {
    let tmp = temp_dir();

    slipway()
        .args(["resolve", "--version", "2.5.10.1"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("OpenImageIO 2.5.10.1"))
        .stdout(predicate::str::contains("zlib/"))
        .stdout(predicate::str::contains("fmt/10.2.1"))
        .stdout(predicate::str::contains("libjpeg/9e"));
}

#[test]
fn test_resolve_fmt_version_gate() {
    let tmp = temp_dir();

    slipway()
        .args(["resolve", "--version", "2.4.16.0"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("fmt/9.1.0"));
}

#[test]
fn test_resolve_json_output() {
    let tmp = temp_dir();

    let output = slipway()
        .args(["resolve", "--version", "2.5.10.1", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let manifest: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(manifest["version"], "2.5.10.1");

    let names: Vec<&str> = manifest["requirements"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"zlib"));
    assert!(names.contains(&"openexr"));
    // opencv is off by default
    assert!(!names.contains(&"opencv"));
}

#[test]
fn test_resolve_reads_config_file() {
    let tmp = temp_dir();
    fs::write(
        tmp.path().join("slipway.toml"),
        r#"
        version = "2.5.10.1"

        [options]
        with_libjpeg = "libjpeg-turbo"
        with_openvdb = false
        "#,
    )
    .unwrap();

    slipway()
        .arg("resolve")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("libjpeg-turbo/3.0.2"))
        .stdout(predicate::str::contains("openvdb").not());
}

#[test]
fn test_enable_and_disable_flags() {
    let tmp = temp_dir();

    slipway()
        .args([
            "resolve",
            "--version",
            "2.5.10.1",
            "--enable",
            "with_tbb",
            "--disable",
            "with_ptex",
        ])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("onetbb/"))
        .stdout(predicate::str::contains("ptex/").not());
}

#[test]
fn test_unknown_option_rejected() {
    let tmp = temp_dir();

    slipway()
        .args([
            "resolve",
            "--version",
            "2.5.10.1",
            "--enable",
            "with_quicktime",
        ])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown option `with_quicktime`"));
}

// ============================================================================
// validation failures
// ============================================================================

#[test]
fn test_raw_without_thread_safe_libraw_fails() {
    let tmp = temp_dir();

    slipway()
        .args(["resolve", "--version", "2.5.10.1", "--enable", "with_raw"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("build_thread_safe"));
}

#[test]
fn test_raw_with_thread_safe_peer_succeeds() {
    let tmp = temp_dir();
    fs::write(
        tmp.path().join("slipway.toml"),
        r#"
        version = "2.5.10.1"

        [options]
        with_raw = true

        [peers]
        libraw_thread_safe = true
        "#,
    )
    .unwrap();

    slipway()
        .arg("resolve")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("libraw/0.21.3"));
}

#[test]
fn test_shared_with_msvc_static_runtime_fails() {
    let tmp = temp_dir();
    fs::write(
        tmp.path().join("slipway.toml"),
        r#"
        version = "2.5.10.1"

        [options]
        shared = true

        [settings]
        os = "windows"
        compiler = "msvc"
        msvc_static_runtime = true
        "#,
    )
    .unwrap();

    slipway()
        .arg("resolve")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("static runtime"));
}

#[test]
fn test_opencv_ffmpeg_mismatch_fails() {
    let tmp = temp_dir();
    fs::write(
        tmp.path().join("slipway.toml"),
        r#"
        version = "2.5.10.1"

        [options]
        with_opencv = true
        with_ffmpeg = false
        "#,
    )
    .unwrap();

    slipway()
        .arg("resolve")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "with_ffmpeg to be the same as opencv",
        ));
}

// ============================================================================
// slipway components
// ============================================================================

#[test]
fn test_components_graph() {
    let tmp = temp_dir();

    slipway()
        .args(["components", "--version", "2.5.10.1"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("OpenImageIO::OpenImageIO_Util"))
        .stdout(predicate::str::contains("OpenImageIO::OpenImageIO"))
        .stdout(predicate::str::contains("OIIO_STATIC_DEFINE"));
}

#[test]
fn test_components_json_shape() {
    let tmp = temp_dir();

    let output = slipway()
        .args(["components", "--version", "2.5.10.1", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let graph: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let components = graph["components"].as_array().unwrap();
    assert_eq!(components.len(), 2);
    assert_eq!(components[0]["key"], "openimageio_util");

    // The main component requires the utility one, never the reverse
    let util_requires = components[0]["requires"].as_array().unwrap();
    assert!(!util_requires.iter().any(|r| r == "openimageio_main"));
    let main_requires = components[1]["requires"].as_array().unwrap();
    assert!(main_requires.iter().any(|r| r == "openimageio_util"));
}

// ============================================================================
// slipway build
// ============================================================================

#[test]
fn test_build_rejects_unknown_version() {
    let tmp = temp_dir();

    // Resolution accepts any version; the pipeline is what looks the
    // version up in the recipe data, so it reports the unknown one.
    slipway()
        .args(["build", "--version", "9.9.9.9"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no source for version 9.9.9.9"));
}

#[test]
fn test_build_validates_before_fetching() {
    let tmp = temp_dir();

    slipway()
        .args(["build", "--version", "2.5.10.1", "--enable", "with_raw"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration is invalid"));
}

// ============================================================================
// misc
// ============================================================================

#[test]
fn test_completions_generate() {
    slipway()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("slipway"));
}
