pub use commands::CreateTransactionCmd;
pub use error::EngineError;
pub use money::Amount;
pub use ops::{Balance, Engine, EngineBuilder};
pub use transactions::{Transaction, TransactionKind};

mod categories;
mod commands;
mod error;
mod money;
mod ops;
mod transactions;

type ResultEngine<T> = Result<T, EngineError>;
