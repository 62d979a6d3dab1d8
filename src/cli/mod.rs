use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::{LedgerService, NewAccount};
use crate::domain::{AccountKind, BalanceStatement, format_cents, parse_cents};
use crate::storage::DEFAULT_LEDGER_FILE;
use crate::telemetry;

/// Passbook - Personal Banking Ledger
#[derive(Parser)]
#[command(name = "passbook")]
#[command(about = "A single-user banking ledger: accounts, transfers and interest in one JSON file")]
#[command(version)]
pub struct Cli {
    /// Ledger file path
    #[arg(short, long, env = "PASSBOOK_FILE", default_value = DEFAULT_LEDGER_FILE, global = true)]
    pub file: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open a new account
    Create {
        /// Account number (must be unique)
        number: String,

        /// Account holder name
        holder: String,

        /// Account type: account, checking, savings
        #[arg(short = 't', long = "type", default_value = "account")]
        account_type: String,

        /// Initial balance (e.g., "100.00" or "100")
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        balance: String,

        /// Overdraft limit for checking accounts
        #[arg(long)]
        limit: Option<String>,

        /// Monthly interest rate in percent for savings accounts
        #[arg(long)]
        rate: Option<f64>,
    },

    /// Deposit money into an account
    Deposit {
        /// Account number
        number: String,

        /// Amount to deposit (e.g., "50.00" or "50")
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Withdraw money from an account
    Withdraw {
        /// Account number
        number: String,

        /// Amount to withdraw (e.g., "50.00" or "50")
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Transfer money between two accounts
    Transfer {
        /// Amount to transfer (e.g., "50.00" or "50")
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Source account number
        #[arg(long)]
        from: String,

        /// Destination account number
        #[arg(long)]
        to: String,
    },

    /// Show balance for an account or all accounts
    Balance {
        /// Account number (omit for all accounts)
        number: Option<String>,
    },

    /// Apply one month of interest to every savings account
    Interest,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        telemetry::init_tracing(self.verbose);

        let mut service = LedgerService::open(&self.file)
            .with_context(|| format!("Failed to open ledger {}", self.file))?;

        match self.command {
            Commands::Create {
                number,
                holder,
                account_type,
                balance,
                limit,
                rate,
            } => {
                let initial_balance = parse_amount(&balance)?;
                let mut new_account =
                    NewAccount::parse(&account_type, number, holder)?.with_balance(initial_balance);
                if let Some(limit) = limit {
                    new_account = new_account.with_overdraft_limit(parse_amount(&limit)?);
                }
                if let Some(rate) = rate {
                    new_account = new_account.with_interest_rate(rate);
                }

                let account = service.create_account(new_account)?;
                let details = match account.kind() {
                    AccountKind::Basic => String::new(),
                    AccountKind::Checking { overdraft_limit } => {
                        format!(", overdraft limit {}", format_cents(*overdraft_limit))
                    }
                    AccountKind::Savings {
                        monthly_interest_rate,
                    } => format!(", interest {}% per month", monthly_interest_rate),
                };
                println!(
                    "Created {} account {} for {}{}",
                    account.account_type(),
                    account.number(),
                    account.holder(),
                    details
                );
            }

            Commands::Deposit { number, amount } => {
                let amount = parse_amount(&amount)?;
                let statement = service.deposit(&number, amount)?;
                println!("Deposited {} into account {}", format_cents(amount), number);
                println!("{}", statement);
            }

            Commands::Withdraw { number, amount } => {
                let amount = parse_amount(&amount)?;
                let statement = service.withdraw(&number, amount)?;
                println!("Withdrew {} from account {}", format_cents(amount), number);
                println!("{}", statement);
            }

            Commands::Transfer { amount, from, to } => {
                let amount = parse_amount(&amount)?;
                let result = service.transfer(&from, &to, amount)?;
                println!(
                    "Transferred {} from {} to {}",
                    format_cents(result.amount),
                    result.source.number,
                    result.destination.number
                );
                println!("{}", result.source);
                println!("{}", result.destination);
            }

            Commands::Balance { number } => match number {
                Some(number) => println!("{}", service.balance(&number)?),
                None => print_balances(&service.balances()),
            },

            Commands::Interest => {
                let applied = service.accrue_interest()?;
                if applied.is_empty() {
                    println!("No savings accounts found.");
                }
                for entry in applied {
                    println!(
                        "Applied interest of {} to account {} (balance {})",
                        format_cents(entry.interest),
                        entry.number,
                        format_cents(entry.balance)
                    );
                }
            }
        }

        Ok(())
    }
}

fn parse_amount(input: &str) -> Result<i64> {
    parse_cents(input).with_context(|| format!("Invalid amount '{}'. Use '50.00' or '50'", input))
}

fn print_balances(statements: &[BalanceStatement]) {
    if statements.is_empty() {
        println!("No accounts found.");
        return;
    }
    println!(
        "{:<12} {:<20} {:<10} {:>14}",
        "NUMBER", "HOLDER", "TYPE", "BALANCE"
    );
    println!("{}", "-".repeat(59));
    for statement in statements {
        println!(
            "{:<12} {:<20} {:<10} {:>14}",
            statement.number,
            statement.holder,
            statement.account_type,
            format_cents(statement.balance)
        );
    }
}
