mod json_file;

pub use json_file::*;

/// Ledger file used when no path is given.
pub const DEFAULT_LEDGER_FILE: &str = "contas.json";
