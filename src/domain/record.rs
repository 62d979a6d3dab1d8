use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Account, AccountKind, AccountType, cents_to_decimal, decimal_to_cents};

/// One entry of the ledger file. Field names follow the on-disk format:
///
/// ```json
/// {"type": "checking", "number": "001", "titular": "Ana", "saldo": 150.0, "limite": 200.0}
/// ```
///
/// `limite` is only written for checking accounts and `taxa_juros` only for
/// savings accounts; both read back as 0 when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    #[serde(rename = "type", alias = "tipo", default)]
    pub tag: Option<String>,
    #[serde(alias = "numero")]
    pub number: String,
    pub titular: String,
    pub saldo: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limite: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxa_juros: Option<f64>,
}

impl AccountRecord {
    /// The account type named by the tag, `None` if the tag is missing or
    /// not one we recognise.
    pub fn account_type(&self) -> Option<AccountType> {
        self.tag.as_deref().and_then(|tag| tag.parse().ok())
    }
}

impl From<&Account> for AccountRecord {
    fn from(account: &Account) -> Self {
        let (limite, taxa_juros) = match account.kind() {
            AccountKind::Basic => (None, None),
            AccountKind::Checking { overdraft_limit } => {
                (Some(cents_to_decimal(*overdraft_limit)), None)
            }
            AccountKind::Savings {
                monthly_interest_rate,
            } => (None, Some(*monthly_interest_rate)),
        };
        Self {
            tag: Some(account.account_type().as_str().to_string()),
            number: account.number().to_string(),
            titular: account.holder().to_string(),
            saldo: cents_to_decimal(account.balance()),
            limite,
            taxa_juros,
        }
    }
}

/// A record whose values cannot become a valid account.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("Account {number}: {field} value {value} is out of range")]
    OutOfRange {
        number: String,
        field: &'static str,
        value: f64,
    },

    #[error("Account {number}: taxa_juros {rate} must be a non-negative percentage")]
    InvalidRate { number: String, rate: f64 },
}

/// Unknown or missing tags fall back to a basic account.
/// A negative overdraft limit in the file is treated as no overdraft.
impl TryFrom<AccountRecord> for Account {
    type Error = RecordError;

    fn try_from(record: AccountRecord) -> Result<Self, Self::Error> {
        let to_cents = |field: &'static str, value: f64| {
            decimal_to_cents(value).ok_or_else(|| RecordError::OutOfRange {
                number: record.number.clone(),
                field,
                value,
            })
        };

        let kind = match record.account_type().unwrap_or(AccountType::Basic) {
            AccountType::Basic => AccountKind::Basic,
            AccountType::Checking => AccountKind::Checking {
                overdraft_limit: to_cents("limite", record.limite.unwrap_or(0.0))?.max(0),
            },
            AccountType::Savings => {
                let rate = record.taxa_juros.unwrap_or(0.0);
                if !rate.is_finite() || rate < 0.0 {
                    return Err(RecordError::InvalidRate {
                        number: record.number.clone(),
                        rate,
                    });
                }
                AccountKind::Savings {
                    monthly_interest_rate: rate,
                }
            }
        };
        let balance = to_cents("saldo", record.saldo)?;

        Ok(Account::new(record.number, record.titular, balance, kind))
    }
}
