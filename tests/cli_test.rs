use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn passbook(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("passbook").expect("binary exists");
    cmd.env_remove("RUST_LOG")
        .env("PASSBOOK_FILE", temp.path().join("contas.json"));
    cmd
}

#[test]
fn test_create_deposit_and_balance() {
    let temp = TempDir::new().unwrap();

    passbook(&temp)
        .args(["create", "001", "Ana", "--type", "checking", "--limit", "200"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Created checking account 001 for Ana, overdraft limit 200.00",
        ));

    passbook(&temp)
        .args(["deposit", "001", "50.25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Balance of account 001 (Ana): 50.25"));

    passbook(&temp)
        .args(["balance", "001"])
        .assert()
        .success()
        .stdout("Balance of account 001 (Ana): 50.25\n");
}

#[test]
fn test_transfer_and_interest() {
    let temp = TempDir::new().unwrap();

    passbook(&temp)
        .args(["create", "001", "Ana", "-b", "100"])
        .assert()
        .success();
    passbook(&temp)
        .args(["create", "002", "Bia", "-t", "savings", "--rate", "5"])
        .assert()
        .success();

    passbook(&temp)
        .args(["transfer", "100", "--from", "001", "--to", "002"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transferred 100.00 from 001 to 002"));

    passbook(&temp)
        .arg("interest")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Applied interest of 5.00 to account 002 (balance 105.00)",
        ));

    passbook(&temp)
        .arg("balance")
        .assert()
        .success()
        .stdout(predicate::str::contains("002").and(predicate::str::contains("105.00")));
}

#[test]
fn test_errors_exit_non_zero() {
    let temp = TempDir::new().unwrap();

    passbook(&temp)
        .args(["create", "001", "Ana", "-b", "10"])
        .assert()
        .success();

    passbook(&temp)
        .args(["withdraw", "001", "20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Insufficient funds"));

    passbook(&temp)
        .args(["create", "001", "Bia"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Account already exists: 001"));

    passbook(&temp)
        .args(["deposit", "404", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Account not found: 404"));

    passbook(&temp)
        .args(["create", "002", "Bia", "--type", "brokerage"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid account type 'brokerage'"));
}

#[test]
fn test_file_flag_overrides_environment() {
    let temp = TempDir::new().unwrap();
    let explicit = temp.path().join("other.json");

    passbook(&temp)
        .args(["--file", explicit.to_str().unwrap(), "create", "7", "Eva"])
        .assert()
        .success();

    assert!(explicit.exists());
    assert!(!temp.path().join("contas.json").exists());
}

#[test]
fn test_balance_on_empty_ledger() {
    let temp = TempDir::new().unwrap();

    passbook(&temp)
        .arg("balance")
        .assert()
        .success()
        .stdout("No accounts found.\n");
}

#[test]
fn test_negative_amounts_reach_the_ledger_checks() {
    let temp = TempDir::new().unwrap();

    passbook(&temp)
        .args(["create", "001", "Ana", "-b", "10"])
        .assert()
        .success();

    passbook(&temp)
        .args(["deposit", "001", "-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Invalid amount: -5.00 (must be positive)",
        ));

    passbook(&temp)
        .args(["withdraw", "001", "-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Invalid amount: -5.00 (must be positive)",
        ));

    passbook(&temp)
        .args(["balance", "001"])
        .assert()
        .success()
        .stdout("Balance of account 001 (Ana): 10.00\n");
}
