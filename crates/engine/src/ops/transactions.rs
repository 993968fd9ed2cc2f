use chrono::Utc;
use sea_orm::{ActiveValue, QueryOrder, QuerySelect, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    CreateTransactionCmd, EngineError, ResultEngine, Transaction, TransactionKind, categories,
    transactions,
};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Records a new transaction.
    ///
    /// An `outcome` is rejected with [`EngineError::InsufficientFunds`] when
    /// it exceeds the current total balance. The category is looked up by
    /// title and created when missing, inside the same DB transaction as the
    /// insert.
    pub async fn create_transaction(
        &self,
        cmd: CreateTransactionCmd,
    ) -> ResultEngine<Transaction> {
        let title = normalize_required_text(&cmd.title, "transaction")?;
        let category_title = normalize_required_text(&cmd.category, "category")?;
        if cmd.amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }

        let created_at = Utc::now();
        with_tx!(self, |db_tx| {
            if cmd.kind == TransactionKind::Outcome {
                let balance = self.balance_with(&db_tx).await?;
                if balance.total_minor < cmd.amount_minor {
                    return Err(EngineError::InsufficientFunds(
                        "not enough balance for this outcome".to_string(),
                    ));
                }
            }

            let category = self.resolve_category(&db_tx, &category_title).await?;

            let id = Uuid::new_v4();
            let model = transactions::ActiveModel {
                id: ActiveValue::Set(id.to_string()),
                title: ActiveValue::Set(title.clone()),
                kind: ActiveValue::Set(cmd.kind.as_str().to_string()),
                amount_minor: ActiveValue::Set(cmd.amount_minor),
                category_id: ActiveValue::Set(category.id.clone()),
                created_at: ActiveValue::Set(created_at),
            };
            model.insert(&db_tx).await?;

            Ok(Transaction {
                id,
                title,
                kind: cmd.kind,
                amount_minor: cmd.amount_minor,
                category: category.title,
                created_at,
            })
        })
    }

    /// Deletes a transaction by id.
    ///
    /// Categories are never deleted, even when their last transaction goes.
    pub async fn delete_transaction(&self, transaction_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(transaction_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;

            model.delete(&db_tx).await?;
            Ok(())
        })
    }

    /// Lists transactions, newest first, with their category titles.
    pub async fn list_transactions(&self, limit: u64) -> ResultEngine<Vec<Transaction>> {
        let rows: Vec<(transactions::Model, Option<categories::Model>)> =
            transactions::Entity::find()
                .find_also_related(categories::Entity)
                .order_by_desc(transactions::Column::CreatedAt)
                .limit(limit)
                .all(&self.database)
                .await?;

        let mut out = Vec::with_capacity(rows.len());
        for (model, category) in rows {
            let category = category
                .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;
            out.push(Transaction::try_from((model, category))?);
        }
        Ok(out)
    }
}
