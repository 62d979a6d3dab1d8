use super::{Account, AccountError};

/// The in-memory, ordered set of accounts managed by the process.
///
/// Lookups are linear scans; a personal ledger holds tens of accounts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    accounts: Vec<Account>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from existing accounts, rejecting duplicate numbers.
    pub fn from_accounts(accounts: Vec<Account>) -> Result<Self, AccountError> {
        let mut ledger = Self::new();
        for account in accounts {
            ledger.insert(account)?;
        }
        Ok(ledger)
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn contains(&self, number: &str) -> bool {
        self.position(number).is_some()
    }

    pub fn find(&self, number: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.number() == number)
    }

    pub fn find_mut(&mut self, number: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.number() == number)
    }

    /// Append an account. Fails without touching the ledger if the number
    /// is already taken.
    pub fn insert(&mut self, account: Account) -> Result<(), AccountError> {
        if self.contains(account.number()) {
            return Err(AccountError::DuplicateNumber(account.number().to_string()));
        }
        self.accounts.push(account);
        Ok(())
    }

    /// Borrow two different accounts mutably at the same time.
    /// Returns `None` if either is missing or both numbers are the same.
    pub fn pair_mut(&mut self, first: &str, second: &str) -> Option<(&mut Account, &mut Account)> {
        let i = self.position(first)?;
        let j = self.position(second)?;
        if i == j {
            return None;
        }
        if i < j {
            let (left, right) = self.accounts.split_at_mut(j);
            Some((&mut left[i], &mut right[0]))
        } else {
            let (left, right) = self.accounts.split_at_mut(i);
            Some((&mut right[0], &mut left[j]))
        }
    }

    pub fn savings_mut(&mut self) -> impl Iterator<Item = &mut Account> {
        self.accounts.iter_mut().filter(|a| a.is_savings())
    }

    fn position(&self, number: &str) -> Option<usize> {
        self.accounts.iter().position(|a| a.number() == number)
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Account;
    type IntoIter = std::slice::Iter<'a, Account>;

    fn into_iter(self) -> Self::IntoIter {
        self.accounts.iter()
    }
}
