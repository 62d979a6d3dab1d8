mod account;
mod ledger;
mod money;
mod record;

pub use account::*;
pub use ledger::*;
pub use money::*;
pub use record::*;
