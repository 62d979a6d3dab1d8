// Application layer: the operations a client (CLI, tests, a future menu)
// runs against the ledger. Every successful mutation is persisted before
// the call returns.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
