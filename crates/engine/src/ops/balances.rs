use sea_orm::{ConnectionTrait, Statement};
use serde::{Deserialize, Serialize};

use crate::{ResultEngine, TransactionKind};

use super::Engine;

/// Aggregated totals over all recorded transactions, in minor units.
///
/// `total_minor` is income minus outcome. It can go below zero: bulk imports
/// are not balance-checked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub income_minor: i64,
    pub outcome_minor: i64,
    pub total_minor: i64,
}

impl Engine {
    /// Returns income/outcome/total over all transactions.
    pub async fn balance(&self) -> ResultEngine<Balance> {
        self.balance_with(&self.database).await
    }

    /// Same as [`Engine::balance`], but against the caller's connection so the
    /// outcome check can run inside an open DB transaction.
    pub(super) async fn balance_with<C: ConnectionTrait>(&self, conn: &C) -> ResultEngine<Balance> {
        let income_minor = Self::sum_for_kind(conn, TransactionKind::Income).await?;
        let outcome_minor = Self::sum_for_kind(conn, TransactionKind::Outcome).await?;

        Ok(Balance {
            income_minor,
            outcome_minor,
            total_minor: income_minor - outcome_minor,
        })
    }

    async fn sum_for_kind<C: ConnectionTrait>(
        conn: &C,
        kind: TransactionKind,
    ) -> ResultEngine<i64> {
        let backend = conn.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT COALESCE(SUM(amount_minor), 0) AS sum \
             FROM transactions \
             WHERE kind = ?",
            vec![kind.as_str().into()],
        );
        let row = conn.query_one(stmt).await?;
        Ok(row
            .and_then(|r| r.try_get::<i64>("", "sum").ok())
            .unwrap_or(0))
    }
}
