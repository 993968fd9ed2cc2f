use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{ResultEngine, categories};

use super::Engine;

impl Engine {
    /// Finds a category by its (trimmed) title, creating it when missing.
    ///
    /// Runs inside the caller's DB transaction so the created row shares the
    /// fate of the transaction insert.
    pub(super) async fn resolve_category(
        &self,
        db_tx: &DatabaseTransaction,
        title: &str,
    ) -> ResultEngine<categories::Model> {
        if let Some(model) = categories::Entity::find()
            .filter(categories::Column::Title.eq(title))
            .one(db_tx)
            .await?
        {
            return Ok(model);
        }

        let active = categories::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            title: ActiveValue::Set(title.to_string()),
        };
        Ok(active.insert(db_tx).await?)
    }

    /// Fetches all categories whose title appears in `titles`, in one query.
    pub(super) async fn categories_by_titles(
        &self,
        db_tx: &DatabaseTransaction,
        titles: &[String],
    ) -> ResultEngine<Vec<categories::Model>> {
        if titles.is_empty() {
            return Ok(Vec::new());
        }

        Ok(categories::Entity::find()
            .filter(categories::Column::Title.is_in(titles.iter().cloned()))
            .all(db_tx)
            .await?)
    }
}
