use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

const PRIMESLOT: &str = r#"
application_id = "primeslot.com"
core_library_desugaring = true
framework_source = "../.."
plugins = ["com.android.application", "kotlin-android", "dev.flutter.flutter-gradle-plugin"]

[sdk]
min = "flutter.minSdkVersion"
target = 34
compile = "flutter.compileSdkVersion"

[language]
source = "11"
target = "11"

[build_variants]
release = "debug"

[[dependencies]]
coordinate = "com.android.tools:desugar_jdk_libs:2.0.4"
configuration = "coreLibraryDesugaring"
"#;

const CONFIG: &str = r#"
[framework]
min_sdk_version = 21
compile_sdk_version = 34
"#;

fn workspace(descriptor: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("build-target.toml"), descriptor).unwrap();
    std::fs::write(dir.path().join(".apkcfg.toml"), CONFIG).unwrap();
    dir
}

fn apkcfg(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("apkcfg").unwrap();
    cmd.current_dir(dir)
        .env_remove("APKCFG_DESCRIPTOR")
        .env_remove("APKCFG_FRAMEWORK_VALUES")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

#[test]
fn check_accepts_valid_descriptor() {
    let dir = workspace(PRIMESLOT);
    apkcfg(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("primeslot.com"))
        .stdout(predicate::str::contains("1 variant"));
}

#[test]
fn check_reports_language_mismatch() {
    let dir = workspace(&PRIMESLOT.replace("target = \"11\"", "target = \"17\""));
    apkcfg(dir.path())
        .args(["check", "--json"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"valid\": false"))
        .stdout(predicate::str::contains("LANGUAGE_MISMATCH"));
}

#[test]
fn check_reports_unresolved_framework_value_without_config() {
    let dir = workspace(PRIMESLOT);
    std::fs::remove_file(dir.path().join(".apkcfg.toml")).unwrap();
    apkcfg(dir.path())
        .arg("check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("E4010"));
}

#[test]
fn framework_values_file_overrides_config() {
    let dir = workspace(PRIMESLOT);
    let values = dir.path().join("flutter-values.json");
    std::fs::write(&values, r#"{"minSdkVersion": 23}"#).unwrap();

    apkcfg(dir.path())
        .args(["resolve", "--format", "json", "--framework-values"])
        .arg(&values)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"min\": 23"))
        .stdout(predicate::str::contains("\"compile\": 34"));
}

#[test]
fn resolve_output_resolves_again() {
    let dir = workspace(PRIMESLOT);
    let output = apkcfg(dir.path()).arg("resolve").output().unwrap();
    assert!(output.status.success());

    let canonical = dir.path().join("canonical.toml");
    std::fs::write(&canonical, &output.stdout).unwrap();

    let again = apkcfg(dir.path())
        .args(["resolve", "--descriptor"])
        .arg(&canonical)
        .output()
        .unwrap();
    assert!(again.status.success());
    assert_eq!(output.stdout, again.stdout);
}

#[test]
fn render_writes_gradle_script() {
    let dir = workspace(PRIMESLOT);
    apkcfg(dir.path())
        .args(["render", "--output", "build.gradle.kts"])
        .assert()
        .success();

    let script = std::fs::read_to_string(dir.path().join("build.gradle.kts")).unwrap();
    assert!(script.contains("compileSdk = 34"));
    assert!(script.contains("minSdk = 21"));
    assert!(script.contains("coreLibraryDesugaring(\"com.android.tools:desugar_jdk_libs:2.0.4\")"));
}

#[test]
fn missing_descriptor_fails() {
    let dir = tempfile::tempdir().unwrap();
    apkcfg(dir.path())
        .args(["check", "--descriptor", "nope.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn explicit_missing_config_is_config_error() {
    let dir = workspace(PRIMESLOT);
    apkcfg(dir.path())
        .args(["--config", "missing.toml", "check"])
        .assert()
        .code(3);
}
