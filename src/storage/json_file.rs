use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::domain::{Account, AccountRecord, Ledger};

use super::DEFAULT_LEDGER_FILE;

/// Persists the whole ledger as a JSON array in a single file.
///
/// Every save rewrites the file in full. A crash halfway through a write can
/// leave a truncated file behind.
#[derive(Debug, Clone)]
pub struct AccountStore {
    path: PathBuf,
}

impl AccountStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by `contas.json` in the working directory.
    pub fn default_path() -> Self {
        Self::new(DEFAULT_LEDGER_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the ledger. A missing file is an empty ledger, not an error.
    pub fn load(&self) -> Result<Ledger> {
        let accounts = load_accounts(&self.path)?;
        Ledger::from_accounts(accounts)
            .with_context(|| format!("Invalid ledger file: {}", self.path.display()))
    }

    /// Overwrite the file with every account in the ledger.
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        save_accounts(ledger.accounts(), &self.path)
    }
}

/// Read every account from `path`, in file order.
pub fn load_accounts(path: &Path) -> Result<Vec<Account>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "ledger file not found, starting empty");
        return Ok(Vec::new());
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read ledger file: {}", path.display()))?;
    let records: Vec<AccountRecord> = serde_json::from_str(&data)
        .with_context(|| format!("Malformed ledger file: {}", path.display()))?;

    let accounts: Vec<Account> = records
        .into_iter()
        .map(|record| {
            if record.account_type().is_none() {
                tracing::warn!(
                    account = %record.number,
                    tag = ?record.tag,
                    "unrecognised account type, loading as basic account"
                );
            }
            Account::try_from(record)
                .with_context(|| format!("Malformed ledger file: {}", path.display()))
        })
        .collect::<Result<_>>()?;

    tracing::debug!(path = %path.display(), count = accounts.len(), "ledger loaded");
    Ok(accounts)
}

/// Serialise `accounts` and replace the contents of `path`.
pub fn save_accounts(accounts: &[Account], path: &Path) -> Result<()> {
    let records: Vec<AccountRecord> = accounts.iter().map(AccountRecord::from).collect();

    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    records
        .serialize(&mut serializer)
        .context("Failed to serialise ledger")?;
    buf.push(b'\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, &buf)
        .with_context(|| format!("Failed to write ledger file: {}", path.display()))?;

    tracing::debug!(path = %path.display(), count = records.len(), "ledger saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::domain::AccountKind;

    fn one_of_each() -> Ledger {
        Ledger::from_accounts(vec![
            Account::basic("001", "Ana", 10050),
            Account::checking("002", "Bia", -15000, 20000),
            Account::savings("003", "Caio", 100000, 0.5),
        ])
        .unwrap()
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = AccountStore::new(temp.path().join("nope.json"));

        let ledger = store.load().unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_round_trip_preserves_every_variant() {
        let temp = TempDir::new().unwrap();
        let store = AccountStore::new(temp.path().join("contas.json"));
        let ledger = one_of_each();

        store.save(&ledger).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, ledger);
    }

    #[test]
    fn test_saved_file_uses_tagged_records() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("contas.json");
        save_accounts(one_of_each().accounts(), &path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let tags: Vec<&str> = raw
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["type"].as_str().unwrap())
            .collect();

        assert_eq!(tags, vec!["account", "checking", "savings"]);
        assert_eq!(raw[1]["saldo"], -150.0);
        assert_eq!(raw[1]["limite"], 200.0);
        assert_eq!(raw[2]["taxa_juros"], 0.5);
    }

    #[test]
    fn test_save_overwrites_previous_contents() {
        let temp = TempDir::new().unwrap();
        let store = AccountStore::new(temp.path().join("contas.json"));

        store.save(&one_of_each()).unwrap();
        store
            .save(&Ledger::from_accounts(vec![Account::basic("9", "Eva", 0)]).unwrap())
            .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.accounts()[0].number(), "9");
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let store = AccountStore::new(temp.path().join("nested/dir/contas.json"));

        store.save(&one_of_each()).unwrap();
        assert_eq!(store.load().unwrap().len(), 3);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("contas.json");
        fs::write(
            &path,
            r#"[
                {"type": "checking", "number": "1", "titular": "Ana", "saldo": 10.0},
                {"type": "savings", "number": "2", "titular": "Bia", "saldo": 20.0},
                {"type": "mystery", "number": "3", "titular": "Caio", "saldo": 30.0}
            ]"#,
        )
        .unwrap();

        let ledger = AccountStore::new(&path).load().unwrap();
        let kinds: Vec<&AccountKind> = ledger.iter().map(|a| a.kind()).collect();

        assert_eq!(
            kinds,
            vec![
                &AccountKind::Checking { overdraft_limit: 0 },
                &AccountKind::Savings {
                    monthly_interest_rate: 0.0
                },
                &AccountKind::Basic,
            ]
        );
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("contas.json");
        fs::write(&path, "{ not json").unwrap();

        let err = AccountStore::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("Malformed ledger file"));
    }

    #[test]
    fn test_duplicate_numbers_in_file_are_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("contas.json");
        fs::write(
            &path,
            r#"[
                {"type": "account", "number": "1", "titular": "Ana", "saldo": 1.0},
                {"type": "account", "number": "1", "titular": "Bia", "saldo": 2.0}
            ]"#,
        )
        .unwrap();

        assert!(AccountStore::new(&path).load().is_err());
    }

    #[test]
    fn test_out_of_range_balance_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("contas.json");
        fs::write(
            &path,
            r#"[{"type": "account", "number": "1", "titular": "Ana", "saldo": 1e30}]"#,
        )
        .unwrap();

        let err = AccountStore::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("Malformed ledger file"));
        assert!(format!("{:#}", err).contains("saldo"));
    }
}
