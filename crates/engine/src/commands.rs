//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use crate::TransactionKind;

/// Create a transaction.
#[derive(Clone, Debug)]
pub struct CreateTransactionCmd {
    pub title: String,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub category: String,
}

impl CreateTransactionCmd {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        kind: TransactionKind,
        amount_minor: i64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            kind,
            amount_minor,
            category: category.into(),
        }
    }
}
