//! Integration tests for the PassVault CLI.
//!
//! These tests run the binary end-to-end using `assert_cmd`.  The master
//! password comes from `PASSVAULT_PASSWORD` so no test needs a terminal.

use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::prelude::*;

const PASSWORD: &str = "Secret1!";

/// Helper: get a Command pointing at the passvault binary.
fn passvault() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("passvault").expect("binary should exist");
    cmd.env_remove("PASSVAULT_DIR").env_remove("PASSVAULT_PASSWORD");
    cmd
}

/// Helper: a command running in `dir` with the master password preset.
fn passvault_in(dir: &TempDir) -> Command {
    let mut cmd = passvault();
    cmd.current_dir(dir.path()).env("PASSVAULT_PASSWORD", PASSWORD);
    cmd
}

fn init_alice(dir: &TempDir) {
    passvault_in(dir).args(["init", "alice"]).assert().success();
}

#[test]
fn help_flag_shows_usage() {
    passvault()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Encrypted per-user password manager"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("update"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("import"))
        .stdout(predicate::str::contains("generate"));
}

#[test]
fn version_flag_shows_version() {
    passvault()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("passvault"));
}

#[test]
fn no_args_shows_help() {
    passvault()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn init_creates_encrypted_vault() {
    let tmp = TempDir::new().unwrap();
    passvault_in(&tmp)
        .args(["init", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Account setup completed"));

    let vault = tmp.path().join(".passvault").join("alice_passwords.enc");
    assert!(std::fs::read(vault).unwrap().starts_with(b"PVLT"));
}

#[test]
fn init_twice_fails() {
    let tmp = TempDir::new().unwrap();
    init_alice(&tmp);

    passvault_in(&tmp)
        .args(["init", "alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn init_with_weak_password_fails() {
    let tmp = TempDir::new().unwrap();
    passvault_in(&tmp)
        .env("PASSVAULT_PASSWORD", "abc123")
        .args(["init", "alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("complexity"));
}

#[test]
fn add_then_list_shows_entry() {
    let tmp = TempDir::new().unwrap();
    init_alice(&tmp);

    passvault_in(&tmp)
        .args(["add", "alice", "email", "alice@x.com"])
        .assert()
        .success();

    passvault_in(&tmp)
        .args(["list", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("email"))
        .stdout(predicate::str::contains("alice@x.com"));
}

#[test]
fn add_duplicate_label_fails() {
    let tmp = TempDir::new().unwrap();
    init_alice(&tmp);

    passvault_in(&tmp)
        .args(["add", "alice", "email", "one"])
        .assert()
        .success();
    passvault_in(&tmp)
        .args(["add", "alice", "email", "two"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn list_with_wrong_password_fails() {
    let tmp = TempDir::new().unwrap();
    init_alice(&tmp);

    passvault_in(&tmp)
        .env("PASSVAULT_PASSWORD", "Wrong1!")
        .args(["list", "alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid master password"));
}

#[test]
fn list_unknown_account_fails() {
    let tmp = TempDir::new().unwrap();
    passvault_in(&tmp)
        .args(["list", "bob"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No account found"));
}

#[test]
fn update_and_delete() {
    let tmp = TempDir::new().unwrap();
    init_alice(&tmp);
    passvault_in(&tmp)
        .args(["add", "alice", "bank", "1234"])
        .assert()
        .success();

    passvault_in(&tmp)
        .args(["update", "alice", "bank", "5678"])
        .assert()
        .success();
    passvault_in(&tmp)
        .args(["list", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5678"));

    passvault_in(&tmp)
        .args(["delete", "alice", "bank", "--force"])
        .assert()
        .success();
    passvault_in(&tmp)
        .args(["list", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5678").not());
}

#[test]
fn export_then_import_into_other_directory() {
    let src = TempDir::new().unwrap();
    init_alice(&src);
    passvault_in(&src)
        .args(["add", "alice", "email", "alice@x.com"])
        .assert()
        .success();

    let bundle = src.path().join("alice_passwords.txt");
    passvault_in(&src)
        .args(["export", "alice"])
        .assert()
        .success();
    let text = std::fs::read_to_string(&bundle).unwrap();
    assert!(text.starts_with("username: alice\nmaster_password: Secret1!\n"));

    let dst = TempDir::new().unwrap();
    init_alice(&dst);
    passvault_in(&dst)
        .args(["import", bundle.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 passwords"));

    passvault_in(&dst)
        .args(["list", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice@x.com"));
}

#[test]
fn export_refuses_enc_destination() {
    let tmp = TempDir::new().unwrap();
    init_alice(&tmp);
    passvault_in(&tmp)
        .args(["export", "alice", "--output", "out.enc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(".enc"));
}

#[test]
fn export_over_existing_file_is_refused_and_not_audited() {
    let tmp = TempDir::new().unwrap();
    init_alice(&tmp);
    let existing = tmp.path().join("alice_passwords.txt");
    std::fs::write(&existing, "keep me").unwrap();

    passvault_in(&tmp)
        .args(["export", "alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to overwrite"));

    assert_eq!(std::fs::read_to_string(&existing).unwrap(), "keep me");
    let log = std::fs::read_to_string(tmp.path().join(".passvault").join("password_manager.log"))
        .unwrap();
    assert!(!log.contains("Exported all passwords"));

    passvault_in(&tmp)
        .args(["export", "alice", "--force"])
        .assert()
        .success();
    let log = std::fs::read_to_string(tmp.path().join(".passvault").join("password_manager.log"))
        .unwrap();
    assert!(log.contains("Exported all passwords for alice."));
}

#[test]
fn import_missing_file_fails() {
    let tmp = TempDir::new().unwrap();
    passvault_in(&tmp)
        .args(["import", "nope.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File does not exist"));
}

#[test]
fn generate_prints_strong_password() {
    passvault()
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\S+0A!\n$").unwrap());
}

#[test]
fn vault_dir_flag_overrides_default() {
    let tmp = TempDir::new().unwrap();
    passvault_in(&tmp)
        .args(["init", "alice", "--vault-dir", "store"])
        .assert()
        .success();
    assert!(tmp.path().join("store").join("alice_passwords.enc").exists());
}

#[test]
fn audit_shows_recorded_events() {
    let tmp = TempDir::new().unwrap();
    init_alice(&tmp);
    passvault_in(&tmp)
        .args(["add", "alice", "email", "alice@x.com"])
        .assert()
        .success();

    passvault_in(&tmp)
        .args(["audit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stored password for email under alice."));
}

#[test]
fn completions_bash() {
    passvault()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("passvault"));
}
