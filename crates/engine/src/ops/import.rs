use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::Utc;
use csv::{ReaderBuilder, StringRecord, Trim};
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Amount, EngineError, ResultEngine, Transaction, TransactionKind, categories, transactions};

use super::{Engine, with_tx};

/// A CSV row that passed field validation.
#[derive(Clone, Debug, PartialEq, Eq)]
struct CsvRow {
    title: String,
    kind: TransactionKind,
    amount_minor: i64,
    category: String,
}

/// Parses one record of a `title, type, value, category` file.
///
/// Returns `None` for rows that must be skipped: missing or empty fields, an
/// unknown kind, or a value that is not a positive decimal amount.
fn parse_row(record: &StringRecord) -> Option<CsvRow> {
    let title = record.get(0)?.trim();
    let kind = record.get(1)?.trim();
    let value = record.get(2)?.trim();
    let category = record.get(3)?.trim();

    if title.is_empty() || kind.is_empty() || value.is_empty() || category.is_empty() {
        return None;
    }

    let kind = TransactionKind::try_from(kind).ok()?;
    let amount = value.parse::<Amount>().ok()?;
    if amount.minor() <= 0 {
        return None;
    }

    Some(CsvRow {
        title: title.to_string(),
        kind,
        amount_minor: amount.minor(),
        category: category.to_string(),
    })
}

impl Engine {
    /// Imports transactions from a CSV file with `title, type, value,
    /// category` columns (header row skipped, cells trimmed).
    ///
    /// Categories and transactions are inserted in bulk rather than row by
    /// row, inside a single DB transaction. Category titles already present
    /// in the database are reused; new titles are deduplicated before the
    /// insert. The source file is deleted once the import commits.
    ///
    /// Imported outcomes are not balance-checked: the insufficient-funds rule
    /// applies to [`Engine::create_transaction`] only.
    pub async fn import_transactions(&self, path: &Path) -> ResultEngine<Vec<Transaction>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .flexible(true)
            .from_path(path)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            if let Some(row) = parse_row(&record) {
                rows.push(row);
            }
        }
        drop(reader);

        let created_at = Utc::now();
        let created = with_tx!(self, |db_tx| {
            let titles: Vec<String> = rows.iter().map(|row| row.category.clone()).collect();

            let existing = self.categories_by_titles(&db_tx, &titles).await?;
            let mut category_ids: HashMap<String, String> = existing
                .into_iter()
                .map(|category| (category.title, category.id))
                .collect();

            // New titles, deduplicated in first-seen order.
            let mut seen = HashSet::new();
            let new_titles: Vec<&String> = titles
                .iter()
                .filter(|title| !category_ids.contains_key(*title))
                .filter(|title| seen.insert((*title).clone()))
                .collect();

            if !new_titles.is_empty() {
                let new_models: Vec<categories::ActiveModel> = new_titles
                    .into_iter()
                    .map(|title| {
                        let id = Uuid::new_v4().to_string();
                        category_ids.insert(title.clone(), id.clone());
                        categories::ActiveModel {
                            id: ActiveValue::Set(id),
                            title: ActiveValue::Set(title.clone()),
                        }
                    })
                    .collect();
                categories::Entity::insert_many(new_models)
                    .exec(&db_tx)
                    .await?;
            }

            let mut created = Vec::with_capacity(rows.len());
            let mut models = Vec::with_capacity(rows.len());
            for row in &rows {
                let category_id = category_ids
                    .get(&row.category)
                    .cloned()
                    .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;

                let id = Uuid::new_v4();
                models.push(transactions::ActiveModel {
                    id: ActiveValue::Set(id.to_string()),
                    title: ActiveValue::Set(row.title.clone()),
                    kind: ActiveValue::Set(row.kind.as_str().to_string()),
                    amount_minor: ActiveValue::Set(row.amount_minor),
                    category_id: ActiveValue::Set(category_id),
                    created_at: ActiveValue::Set(created_at),
                });
                created.push(Transaction {
                    id,
                    title: row.title.clone(),
                    kind: row.kind,
                    amount_minor: row.amount_minor,
                    category: row.category.clone(),
                    created_at,
                });
            }

            if !models.is_empty() {
                transactions::Entity::insert_many(models).exec(&db_tx).await?;
            }

            Ok(created)
        })?;

        std::fs::remove_file(path)?;
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn parse_row_accepts_complete_rows() {
        let row = parse_row(&record(&["Loan", "income", "1500", "Others"])).unwrap();
        assert_eq!(row.title, "Loan");
        assert_eq!(row.kind, TransactionKind::Income);
        assert_eq!(row.amount_minor, 150_000);
        assert_eq!(row.category, "Others");
    }

    #[test]
    fn parse_row_skips_incomplete_rows() {
        assert!(parse_row(&record(&["Loan", "income", "1500"])).is_none());
        assert!(parse_row(&record(&["", "income", "1500", "Others"])).is_none());
        assert!(parse_row(&record(&["Loan", "income", "", "Others"])).is_none());
        assert!(parse_row(&record(&["Loan", "income", "1500", ""])).is_none());
    }

    #[test]
    fn parse_row_skips_malformed_fields() {
        assert!(parse_row(&record(&["Gift", "present", "10", "Fun"])).is_none());
        assert!(parse_row(&record(&["Gift", "income", "ten", "Fun"])).is_none());
        assert!(parse_row(&record(&["Gift", "income", "0", "Fun"])).is_none());
    }
}
