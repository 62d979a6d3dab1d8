use std::path::Path;

use crate::domain::{
    Account, AccountKind, AccountType, BalanceStatement, Cents, Ledger, format_cents,
};
use crate::storage::AccountStore;

use super::AppError;

/// Application service providing the banking operations over a ledger file.
/// This is the primary interface for any client (CLI, tests, etc.).
///
/// The ledger is loaded once when the service is opened and written back
/// in full after every successful mutation. If writing fails the in-memory
/// ledger is rolled back, so memory and file never disagree.
pub struct LedgerService {
    store: AccountStore,
    ledger: Ledger,
}

/// Parameters for opening a new account
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub account_type: AccountType,
    pub number: String,
    pub holder: String,
    pub initial_balance: Cents,
    /// Only used by checking accounts
    pub overdraft_limit: Cents,
    /// Monthly percentage, only used by savings accounts
    pub interest_rate: f64,
}

impl NewAccount {
    pub fn new(
        account_type: AccountType,
        number: impl Into<String>,
        holder: impl Into<String>,
    ) -> Self {
        Self {
            account_type,
            number: number.into(),
            holder: holder.into(),
            initial_balance: 0,
            overdraft_limit: 0,
            interest_rate: 0.0,
        }
    }

    /// Same as [`NewAccount::new`] but with the type given as text,
    /// as typed by a user.
    pub fn parse(
        account_type: &str,
        number: impl Into<String>,
        holder: impl Into<String>,
    ) -> Result<Self, AppError> {
        let account_type: AccountType = account_type
            .parse()
            .map_err(|_| AppError::InvalidAccountType(account_type.to_string()))?;
        Ok(Self::new(account_type, number, holder))
    }

    pub fn with_balance(mut self, initial_balance: Cents) -> Self {
        self.initial_balance = initial_balance;
        self
    }

    pub fn with_overdraft_limit(mut self, overdraft_limit: Cents) -> Self {
        self.overdraft_limit = overdraft_limit;
        self
    }

    pub fn with_interest_rate(mut self, interest_rate: f64) -> Self {
        self.interest_rate = interest_rate;
        self
    }

    fn into_account(self) -> Result<Account, AppError> {
        let number = self.number.trim().to_string();
        if number.is_empty() {
            return Err(AppError::InvalidInput(
                "Account number cannot be empty".to_string(),
            ));
        }

        let kind = match self.account_type {
            AccountType::Basic => AccountKind::Basic,
            AccountType::Checking => {
                if self.overdraft_limit < 0 {
                    return Err(AppError::InvalidInput(format!(
                        "Overdraft limit cannot be negative: {}",
                        format_cents(self.overdraft_limit)
                    )));
                }
                AccountKind::Checking {
                    overdraft_limit: self.overdraft_limit,
                }
            }
            AccountType::Savings => {
                if !self.interest_rate.is_finite() || self.interest_rate < 0.0 {
                    return Err(AppError::InvalidInput(format!(
                        "Interest rate must be a non-negative percentage: {}",
                        self.interest_rate
                    )));
                }
                AccountKind::Savings {
                    monthly_interest_rate: self.interest_rate,
                }
            }
        };

        if self
            .initial_balance
            .saturating_add(kind.overdraft_allowance())
            < 0
        {
            return Err(AppError::InvalidInput(format!(
                "Initial balance {} is below what a {} account allows",
                format_cents(self.initial_balance),
                self.account_type
            )));
        }

        Ok(Account::new(
            number,
            self.holder.trim(),
            self.initial_balance,
            kind,
        ))
    }
}

/// Result of a transfer between two accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResult {
    pub amount: Cents,
    pub source: BalanceStatement,
    pub destination: BalanceStatement,
}

/// Interest credited to one savings account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestApplied {
    pub number: String,
    pub interest: Cents,
    pub balance: Cents,
}

impl LedgerService {
    /// Create a service over an already loaded ledger.
    pub fn new(store: AccountStore, ledger: Ledger) -> Self {
        Self { store, ledger }
    }

    /// Load the ledger from `path`. A missing file starts an empty ledger.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        Self::with_store(AccountStore::new(path.as_ref()))
    }

    /// Load the ledger from `contas.json` in the working directory.
    pub fn open_default() -> Result<Self, AppError> {
        Self::with_store(AccountStore::default_path())
    }

    pub fn with_store(store: AccountStore) -> Result<Self, AppError> {
        let ledger = store.load()?;
        tracing::debug!(
            path = %store.path().display(),
            accounts = ledger.len(),
            "ledger opened"
        );
        Ok(Self::new(store, ledger))
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    // ========================
    // Account operations
    // ========================

    /// Open a new account. The number must not already be in use.
    pub fn create_account(&mut self, new_account: NewAccount) -> Result<&Account, AppError> {
        let number = new_account.number.trim().to_string();
        if self.ledger.contains(&number) {
            return Err(AppError::AccountAlreadyExists(number));
        }
        let account = new_account.into_account()?;

        let previous = self.ledger.clone();
        self.ledger.insert(account)?;
        self.commit(previous)?;

        tracing::info!(account = %number, "account created");
        self.ledger
            .find(&number)
            .ok_or(AppError::AccountNotFound(number))
    }

    /// Get the balance statement of a single account.
    pub fn balance(&self, number: &str) -> Result<BalanceStatement, AppError> {
        let number = number.trim();
        self.ledger
            .find(number)
            .map(Account::statement)
            .ok_or_else(|| AppError::AccountNotFound(number.to_string()))
    }

    /// Balance statements for every account, in ledger order.
    pub fn balances(&self) -> Vec<BalanceStatement> {
        self.ledger.iter().map(Account::statement).collect()
    }

    // ========================
    // Money movements
    // ========================

    pub fn deposit(&mut self, number: &str, amount: Cents) -> Result<BalanceStatement, AppError> {
        let previous = self.ledger.clone();
        let account = self.account_mut(number)?;
        account.deposit(amount)?;
        let statement = account.statement();
        self.commit(previous)?;
        Ok(statement)
    }

    pub fn withdraw(&mut self, number: &str, amount: Cents) -> Result<BalanceStatement, AppError> {
        let previous = self.ledger.clone();
        let account = self.account_mut(number)?;
        account.withdraw(amount)?;
        let statement = account.statement();
        self.commit(previous)?;
        Ok(statement)
    }

    /// Move `amount` from `source` to `destination`. Nothing changes unless
    /// the source can cover the amount.
    pub fn transfer(
        &mut self,
        source: &str,
        destination: &str,
        amount: Cents,
    ) -> Result<TransferResult, AppError> {
        let (source, destination) = (source.trim(), destination.trim());
        for number in [source, destination] {
            if !self.ledger.contains(number) {
                return Err(AppError::AccountNotFound(number.to_string()));
            }
        }
        if source == destination {
            return Err(AppError::SameAccount(source.to_string()));
        }

        let previous = self.ledger.clone();
        let (from, to) = self
            .ledger
            .pair_mut(source, destination)
            .ok_or_else(|| AppError::AccountNotFound(source.to_string()))?;
        from.transfer(amount, to)?;
        let result = TransferResult {
            amount,
            source: from.statement(),
            destination: to.statement(),
        };
        self.commit(previous)?;
        Ok(result)
    }

    /// Credit one month of interest to every savings account. The ledger is
    /// saved even when there are no savings accounts. If any account cannot
    /// take its interest, no account is credited.
    pub fn accrue_interest(&mut self) -> Result<Vec<InterestApplied>, AppError> {
        let previous = self.ledger.clone();
        let accrued: Result<Vec<_>, _> = self
            .ledger
            .savings_mut()
            .map(|account| -> Result<InterestApplied, AppError> {
                let interest = account.apply_interest()?;
                Ok(InterestApplied {
                    number: account.number().to_string(),
                    interest,
                    balance: account.balance(),
                })
            })
            .collect();

        let applied = match accrued {
            Ok(applied) => applied,
            Err(err) => {
                self.ledger = previous;
                return Err(err);
            }
        };
        self.commit(previous)?;
        Ok(applied)
    }

    fn account_mut(&mut self, number: &str) -> Result<&mut Account, AppError> {
        let number = number.trim();
        self.ledger
            .find_mut(number)
            .ok_or_else(|| AppError::AccountNotFound(number.to_string()))
    }

    /// Persist the current ledger, restoring `previous` if the write fails.
    fn commit(&mut self, previous: Ledger) -> Result<(), AppError> {
        if let Err(err) = self.store.save(&self.ledger) {
            tracing::warn!(error = %err, "save failed, rolling back in-memory ledger");
            self.ledger = previous;
            return Err(AppError::Storage(err));
        }
        Ok(())
    }
}
