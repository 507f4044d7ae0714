#![allow(deprecated)] // cargo_bin is deprecated but still functional

use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use tempfile::TempDir;

const RSA_A: &[u8] = include_bytes!("../../tsl-core/testdata/rsa2048_a.der");
const RSA_A_REISSUED: &[u8] = include_bytes!("../../tsl-core/testdata/rsa2048_a_reissued.der");

fn collector() -> Command {
    let mut cmd = Command::cargo_bin("tsl-collector").unwrap();
    for var in [
        "TSL_CONFIG",
        "TSL_URL",
        "TSL_DATABASE",
        "TSL_DOWNLOAD_DIR",
        "TSL_INSECURE",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn write_container(dir: &TempDir) -> std::path::PathBuf {
    let mut raw = Vec::new();
    for der in [RSA_A, RSA_A_REISSUED] {
        raw.extend_from_slice(b"--End\r\nContent-Type: application/pkix-cert\r\n\r\n");
        raw.extend_from_slice(der);
    }
    raw.extend_from_slice(b"\r\n--End");

    let path = dir.path().join("FR01.der");
    fs::write(&path, raw).unwrap();
    path
}

#[test]
fn inspect_prints_json_report() {
    let temp = TempDir::new().unwrap();
    let file = write_container(&temp);

    let output = collector()
        .arg("inspect")
        .arg(&file)
        .arg("--output")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = report["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["key_type"], "RSA");
    assert_eq!(records[0]["key_format"], "SPKI");
    assert_eq!(records[0]["subject_name"], "RSA Signer A");
    assert_eq!(records[1]["ordinal"], 2);
    assert_eq!(report["unique_keys"], 1);
    assert_eq!(report["duplicates"][0]["ordinal"], 2);
    assert_eq!(report["duplicates"][0]["first_ordinal"], 1);
}

#[test]
fn inspect_missing_file_fails() {
    let temp = TempDir::new().unwrap();

    collector()
        .arg("inspect")
        .arg(temp.path().join("absent.der"))
        .assert()
        .failure()
        .stderr(contains("reading"));
}

#[test]
fn collect_refuses_directory_database() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("config.toml");
    fs::write(&config_path, "").unwrap();

    collector()
        .arg("--config")
        .arg(&config_path)
        .arg("collect")
        .arg("--database")
        .arg(temp.path())
        .arg("--url")
        .arg("http://127.0.0.1:9/tsl_signed.xml")
        .assert()
        .failure()
        .stderr(contains("is a directory"));
}

#[test]
fn bare_invocation_honours_environment() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("config.toml");
    fs::write(&config_path, "").unwrap();
    let database = temp.path().join("wanted.db");

    collector()
        .current_dir(temp.path())
        .arg("--config")
        .arg(&config_path)
        .env("TSL_URL", "http://127.0.0.1:9/tsl_signed.xml")
        .env("TSL_DATABASE", &database)
        .env("TSL_DOWNLOAD_DIR", temp.path().join("dl"))
        .assert()
        .success()
        .stdout(contains("could not download trust list"))
        .stdout(contains("processing complete"));

    assert!(database.is_file());
    assert!(temp.path().join("dl").is_dir());
    assert!(!temp.path().join("certificates.db").exists());
}

#[test]
fn config_set_then_show() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("config.toml");

    collector()
        .arg("--config")
        .arg(&config_path)
        .args(["config", "set", "timeout_secs", "7"])
        .assert()
        .success();

    let value: toml::Value = toml::from_str(&fs::read_to_string(&config_path).unwrap()).unwrap();
    assert_eq!(value.get("timeout_secs").and_then(toml::Value::as_integer), Some(7));

    collector()
        .arg("--config")
        .arg(&config_path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("timeout_secs = 7"))
        .stdout(contains("database_path = \"certificates.db\""));
}

#[test]
fn config_set_unknown_key_fails() {
    let temp = TempDir::new().unwrap();

    collector()
        .arg("--config")
        .arg(temp.path().join("config.toml"))
        .args(["config", "set", "api_key", "x"])
        .assert()
        .failure()
        .stderr(contains("Unknown config key"));
}
