use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::{Cents, format_cents};

/// The three kinds of account the ledger knows about, without their
/// kind-specific data. This is what the `type` tag in the ledger file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountType {
    /// Plain account, can never go below zero
    Basic,
    /// Account with an overdraft limit
    Checking,
    /// Account accruing monthly interest
    Savings,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Basic => "account",
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    /// Accepts the canonical tags plus the legacy Portuguese ones
    /// (`conta`, `corrente`, `poupanca`) found in older ledger files.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "account" | "basic" | "conta" => Ok(AccountType::Basic),
            "checking" | "corrente" => Ok(AccountType::Checking),
            "savings" | "poupanca" => Ok(AccountType::Savings),
            other => Err(format!("unknown account type '{}'", other)),
        }
    }
}

/// Kind-specific data of an account. The withdrawal rule is driven by
/// [`AccountKind::overdraft_allowance`].
#[derive(Debug, Clone, PartialEq)]
pub enum AccountKind {
    Basic,
    Checking {
        /// How far below zero the balance may go (never negative)
        overdraft_limit: Cents,
    },
    Savings {
        /// Monthly rate as a percentage, e.g. 0.5 for 0.5%
        monthly_interest_rate: f64,
    },
}

impl AccountKind {
    pub fn account_type(&self) -> AccountType {
        match self {
            AccountKind::Basic => AccountType::Basic,
            AccountKind::Checking { .. } => AccountType::Checking,
            AccountKind::Savings { .. } => AccountType::Savings,
        }
    }

    /// Extra funds available on top of the balance when withdrawing.
    pub fn overdraft_allowance(&self) -> Cents {
        match self {
            AccountKind::Checking { overdraft_limit } => *overdraft_limit,
            AccountKind::Basic | AccountKind::Savings { .. } => 0,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AccountError {
    #[error("Invalid amount: {} (must be positive)", display_cents(.0))]
    InvalidAmount(Cents),

    #[error(
        "Insufficient funds in account {number}: available {}, requested {}",
        display_cents(.available),
        display_cents(.requested)
    )]
    InsufficientFunds {
        number: String,
        available: Cents,
        requested: Cents,
    },

    #[error("Amount out of range for account {number}: {}", display_cents(.amount))]
    AmountOutOfRange { number: String, amount: Cents },

    #[error("Account number already in use: {0}")]
    DuplicateNumber(String),

    #[error("Account {0} is not a savings account")]
    NotSavings(String),
}

fn display_cents(cents: &Cents) -> String {
    format_cents(*cents)
}

/// A single account in the ledger.
///
/// The number and balance are private: the number never changes after
/// creation and the balance only moves through deposit, withdraw and
/// interest accrual.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    number: String,
    holder: String,
    balance: Cents,
    kind: AccountKind,
}

impl Account {
    pub fn new(
        number: impl Into<String>,
        holder: impl Into<String>,
        balance: Cents,
        kind: AccountKind,
    ) -> Self {
        Self {
            number: number.into(),
            holder: holder.into(),
            balance,
            kind,
        }
    }

    pub fn basic(number: impl Into<String>, holder: impl Into<String>, balance: Cents) -> Self {
        Self::new(number, holder, balance, AccountKind::Basic)
    }

    pub fn checking(
        number: impl Into<String>,
        holder: impl Into<String>,
        balance: Cents,
        overdraft_limit: Cents,
    ) -> Self {
        Self::new(
            number,
            holder,
            balance,
            AccountKind::Checking { overdraft_limit },
        )
    }

    pub fn savings(
        number: impl Into<String>,
        holder: impl Into<String>,
        balance: Cents,
        monthly_interest_rate: f64,
    ) -> Self {
        Self::new(
            number,
            holder,
            balance,
            AccountKind::Savings {
                monthly_interest_rate,
            },
        )
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    pub fn balance(&self) -> Cents {
        self.balance
    }

    pub fn kind(&self) -> &AccountKind {
        &self.kind
    }

    pub fn account_type(&self) -> AccountType {
        self.kind.account_type()
    }

    pub fn is_savings(&self) -> bool {
        matches!(self.kind, AccountKind::Savings { .. })
    }

    /// Balance plus whatever overdraft the account kind allows.
    pub fn available_funds(&self) -> Cents {
        self.balance.saturating_add(self.kind.overdraft_allowance())
    }

    pub fn can_withdraw(&self, amount: Cents) -> bool {
        amount > 0 && self.available_funds() >= amount
    }

    /// Add `amount` to the balance and return the new balance.
    pub fn deposit(&mut self, amount: Cents) -> Result<Cents, AccountError> {
        if amount <= 0 {
            return Err(AccountError::InvalidAmount(amount));
        }
        self.balance = self.credited(amount)?;
        tracing::info!(
            account = %self.number,
            amount = %format_cents(amount),
            balance = %format_cents(self.balance),
            "deposit applied"
        );
        Ok(self.balance)
    }

    /// Take `amount` from the balance and return the new balance.
    /// On failure the balance is untouched.
    pub fn withdraw(&mut self, amount: Cents) -> Result<Cents, AccountError> {
        if amount <= 0 {
            return Err(AccountError::InvalidAmount(amount));
        }
        let available = self.available_funds();
        if available < amount {
            return Err(AccountError::InsufficientFunds {
                number: self.number.clone(),
                available,
                requested: amount,
            });
        }
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or_else(|| self.out_of_range(amount))?;
        tracing::info!(
            account = %self.number,
            amount = %format_cents(amount),
            balance = %format_cents(self.balance),
            "withdrawal applied"
        );
        Ok(self.balance)
    }

    /// Move `amount` from this account into `destination`.
    /// The destination is only touched if the withdrawal succeeds.
    pub fn transfer(&mut self, amount: Cents, destination: &mut Account) -> Result<(), AccountError> {
        if amount <= 0 {
            return Err(AccountError::InvalidAmount(amount));
        }
        destination.credited(amount)?;
        self.withdraw(amount)?;
        destination.deposit(amount)?;
        tracing::info!(
            from = %self.number,
            to = %destination.number,
            amount = %format_cents(amount),
            "transfer completed"
        );
        Ok(())
    }

    /// Credit one month of interest and return the amount credited,
    /// rounded to the nearest cent.
    pub fn apply_interest(&mut self) -> Result<Cents, AccountError> {
        let AccountKind::Savings {
            monthly_interest_rate,
        } = self.kind
        else {
            return Err(AccountError::NotSavings(self.number.clone()));
        };
        let raw = (self.balance as f64 * monthly_interest_rate / 100.0).round();
        if !raw.is_finite() || raw < i64::MIN as f64 || raw >= i64::MAX as f64 {
            return Err(self.out_of_range(self.balance));
        }
        let interest = raw as Cents;
        self.balance = self.credited(interest)?;
        tracing::info!(
            account = %self.number,
            interest = %format_cents(interest),
            balance = %format_cents(self.balance),
            "interest applied"
        );
        Ok(interest)
    }

    /// Balance after adding `amount`, or an error if it does not fit.
    fn credited(&self, amount: Cents) -> Result<Cents, AccountError> {
        self.balance
            .checked_add(amount)
            .ok_or_else(|| self.out_of_range(amount))
    }

    fn out_of_range(&self, amount: Cents) -> AccountError {
        AccountError::AmountOutOfRange {
            number: self.number.clone(),
            amount,
        }
    }

    pub fn statement(&self) -> BalanceStatement {
        BalanceStatement {
            number: self.number.clone(),
            holder: self.holder.clone(),
            balance: self.balance,
            account_type: self.account_type(),
        }
    }
}

/// Read-only snapshot of an account's balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceStatement {
    pub number: String,
    pub holder: String,
    pub balance: Cents,
    pub account_type: AccountType,
}

impl fmt::Display for BalanceStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Balance of account {} ({}): {}",
            self.number,
            self.holder,
            format_cents(self.balance)
        )
    }
}
