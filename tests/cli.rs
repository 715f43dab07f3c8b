use std::fs;

use assert_cmd::Command;
use predicates::str::contains;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("devpkey").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn prints_default_key() {
    cmd()
        .assert()
        .success()
        .stdout("{4340A6C5-93FA-4706-972C-7B648208A5E2},8\n");
}

#[test]
fn default_output_is_stable() {
    let first = cmd().output().unwrap();
    let second = cmd().output().unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn logging_stays_off_stdout() {
    cmd()
        .env("RUST_LOG", "trace")
        .assert()
        .success()
        .stdout("{4340A6C5-93FA-4706-972C-7B648208A5E2},8\n");
}

#[test]
fn prints_named_key() {
    cmd()
        .arg("DEVPKEY_Device_Children")
        .assert()
        .success()
        .stdout("{4340A6C5-93FA-4706-972C-7B648208A5E2},9\n");
}

#[test]
fn normalizes_literal_key() {
    cmd()
        .arg("78c34fc8104a4aca9ea4524d52996e57, 256")
        .assert()
        .success()
        .stdout("{78C34FC8-104A-4ACA-9EA4-524D52996E57},256\n");
}

#[test]
fn names_literal_key() {
    cmd()
        .args(["--name", "{4340a6c5-93fa-4706-972c-7b648208a5e2}, 9"])
        .assert()
        .success()
        .stdout("DEVPKEY_Device_Children = {4340A6C5-93FA-4706-972C-7B648208A5E2},9\n");

    cmd()
        .args(["-n", "--format", "json", "d04e05a6-594b-4fb6-a80d-01af5eed7d1d,13"])
        .assert()
        .success()
        .stdout(contains(
            "\"PKEY_CompositeFX_StreamEffectClsid\": \"{D04E05A6-594B-4FB6-A80D-01AF5EED7D1D},13\"",
        ));
}

#[test]
fn unknown_key_fails() {
    cmd()
        .arg("DEVPKEY_Device_Nope")
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(contains("DEVPKEY_Device_Nope"));
}

#[test]
fn json_output() {
    cmd()
        .args(["--format", "json", "DEVPKEY_Device_InstanceId"])
        .assert()
        .success()
        .stdout(contains(
            "\"DEVPKEY_Device_InstanceId\": \"{78C34FC8-104A-4ACA-9EA4-524D52996E57},256\"",
        ));
}

#[test]
fn lists_keys() {
    cmd()
        .arg("--list")
        .assert()
        .success()
        .stdout(contains(
            "DEVPKEY_Device_Parent = {4340A6C5-93FA-4706-972C-7B648208A5E2},8\n",
        ))
        .stdout(contains("PKEY_DeviceInterface_FriendlyName = "));
}

#[test]
fn rejects_unknown_format() {
    cmd().args(["--format", "xml"]).assert().failure();
}

#[test]
fn uses_key_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keys.toml");
    fs::write(
        &path,
        "[keys]\nPKEY_SOUNDCORECTL_CLSID_Z = \"{c949c6aa-132b-4511-bb1b-35261a2a6333},0\"\n",
    )
    .unwrap();

    cmd()
        .arg("--keys")
        .arg(&path)
        .arg("pkey_soundcorectl_clsid_z")
        .assert()
        .success()
        .stdout("{C949C6AA-132B-4511-BB1B-35261A2A6333},0\n");

    cmd()
        .arg("--keys")
        .arg(&path)
        .args(["--list", "--format", "yaml"])
        .assert()
        .success()
        .stdout(contains("PKEY_SOUNDCORECTL_CLSID_Z:"));
}

#[test]
fn bad_key_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keys.ini");
    fs::write(&path, "nothing").unwrap();

    cmd()
        .arg("--keys")
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(contains("unsupported key file format"));
}
