// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::path::PathBuf;

use anyhow::Result;
use passbook::application::{LedgerService, NewAccount};
use passbook::domain::AccountType;
use tempfile::TempDir;

/// Helper to create a service over a ledger file in a temporary directory
pub fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = LedgerService::open(ledger_path(&temp_dir))?;
    Ok((service, temp_dir))
}

/// Path of the ledger file used by [`test_service`]
pub fn ledger_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("contas.json")
}

/// Re-open the ledger file from disk, as a new process would
pub fn reopen(temp_dir: &TempDir) -> Result<LedgerService> {
    Ok(LedgerService::open(ledger_path(temp_dir))?)
}

/// Test fixture: one account of each kind
pub struct StandardAccounts;

impl StandardAccounts {
    pub const BASIC: &'static str = "001";
    pub const CHECKING: &'static str = "002";
    pub const SAVINGS: &'static str = "003";

    /// Basic with 100.00, checking with 0.00 and a 200.00 overdraft,
    /// savings with 1000.00 at 5% a month
    pub fn create(service: &mut LedgerService) -> Result<()> {
        service.create_account(
            NewAccount::new(AccountType::Basic, Self::BASIC, "Ana").with_balance(10000),
        )?;
        service.create_account(
            NewAccount::new(AccountType::Checking, Self::CHECKING, "Bia")
                .with_overdraft_limit(20000),
        )?;
        service.create_account(
            NewAccount::new(AccountType::Savings, Self::SAVINGS, "Caio")
                .with_balance(100000)
                .with_interest_rate(5.0),
        )?;
        Ok(())
    }
}
