//! End-to-end tests driving the `slate` binary against a scratch store.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `slate` invocation pinned to a scratch store and isolated from any user
/// config or environment overrides.
fn slate(store: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("slate").unwrap();
    cmd.env("SLATE_TEST_MODE", "1")
        .env_remove("SLATE_STORE_DIR")
        .env_remove("SLATE_POLL_INTERVAL_MS")
        .env_remove("SLATE_DEBOUNCE_MS")
        .arg("--store-dir")
        .arg(store.path());
    cmd
}

#[test]
fn test_help_describes_the_binary() {
    Command::cargo_bin("slate")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("synchronized persistent values"));
}

#[test]
fn test_set_then_get_roundtrip() {
    let store = TempDir::new().unwrap();

    slate(&store)
        .args(["set", "theme", r#""dark""#])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stored"));

    slate(&store)
        .args(["get", "theme"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""dark""#));
}

#[test]
fn test_plain_strings_are_stored_as_json() {
    let store = TempDir::new().unwrap();

    slate(&store).args(["set", "greeting", "hello"]).assert().success();

    slate(&store)
        .args(["get", "greeting"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""hello""#));
}

#[test]
fn test_get_missing_key() {
    let store = TempDir::new().unwrap();

    slate(&store)
        .args(["get", "nothing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(not set)"));
}

#[test]
fn test_keys_lists_entries_sorted() {
    let store = TempDir::new().unwrap();

    slate(&store).args(["set", "beta", "2"]).assert().success();
    slate(&store).args(["set", "alpha", "1"]).assert().success();

    slate(&store)
        .args(["keys"])
        .assert()
        .success()
        .stdout(predicate::str::diff("alpha\nbeta\n"));
}

#[test]
fn test_remove_deletes_the_entry() {
    let store = TempDir::new().unwrap();

    slate(&store).args(["set", "scratch", "1"]).assert().success();
    slate(&store).args(["remove", "scratch"]).assert().success();

    slate(&store)
        .args(["get", "scratch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(not set)"));
}

#[test]
fn test_counter_operations_accumulate_across_runs() {
    let store = TempDir::new().unwrap();

    slate(&store)
        .args(["counter", "show"])
        .assert()
        .success()
        .stdout(predicate::str::diff("0\n"));

    slate(&store)
        .args(["counter", "inc"])
        .assert()
        .success()
        .stdout(predicate::str::diff("1\n"));

    slate(&store)
        .args(["counter", "inc", "4"])
        .assert()
        .success()
        .stdout(predicate::str::diff("5\n"));

    slate(&store)
        .args(["counter", "dec"])
        .assert()
        .success()
        .stdout(predicate::str::diff("4\n"));

    slate(&store)
        .args(["counter", "set", "10"])
        .assert()
        .success()
        .stdout(predicate::str::diff("10\n"));

    slate(&store)
        .args(["counter", "reset"])
        .assert()
        .success()
        .stdout(predicate::str::diff("0\n"));
}

#[test]
fn test_tools_lists_counter_tool() {
    let store = TempDir::new().unwrap();

    slate(&store)
        .args(["tools"])
        .assert()
        .success()
        .stdout(predicate::str::contains("update_counter"));
}

#[test]
fn test_call_writes_through_to_counter() {
    let store = TempDir::new().unwrap();

    slate(&store)
        .args(["call", "update_counter", "--args", r#"{"count": 9}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("success"));

    slate(&store)
        .args(["counter", "show"])
        .assert()
        .success()
        .stdout(predicate::str::diff("9\n"));

    slate(&store)
        .args(["get", "counter"])
        .assert()
        .success()
        .stdout(predicate::str::contains("9"));
}

#[test]
fn test_call_rejects_bad_arguments() {
    let store = TempDir::new().unwrap();

    slate(&store)
        .args(["call", "update_counter", "--args", r#"{"count": "ten"}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid arguments"));
}

#[test]
fn test_no_subcommand_lists_keys() {
    let store = TempDir::new().unwrap();

    slate(&store).args(["set", "only", "1"]).assert().success();

    slate(&store)
        .assert()
        .success()
        .stdout(predicate::str::diff("only\n"));
}
