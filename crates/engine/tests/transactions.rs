use engine::{Balance, CreateTransactionCmd, Engine, EngineError, TransactionKind};
use migration::MigratorTrait;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn category_count(db: &DatabaseConnection) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            "SELECT COUNT(*) AS count FROM categories",
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get::<i64>("", "count").unwrap()
}

fn income(title: &str, amount_minor: i64, category: &str) -> CreateTransactionCmd {
    CreateTransactionCmd::new(title, TransactionKind::Income, amount_minor, category)
}

fn outcome(title: &str, amount_minor: i64, category: &str) -> CreateTransactionCmd {
    CreateTransactionCmd::new(title, TransactionKind::Outcome, amount_minor, category)
}

#[tokio::test]
async fn income_updates_balance() {
    let (engine, _db) = engine_with_db().await;

    let tx = engine
        .create_transaction(income("Salary", 300_000, "Salary"))
        .await
        .unwrap();
    assert_eq!(tx.kind, TransactionKind::Income);
    assert_eq!(tx.category, "Salary");

    let balance = engine.balance().await.unwrap();
    assert_eq!(
        balance,
        Balance {
            income_minor: 300_000,
            outcome_minor: 0,
            total_minor: 300_000,
        }
    );
}

#[tokio::test]
async fn outcome_exceeding_balance_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_transaction(income("Salary", 10_000, "Salary"))
        .await
        .unwrap();

    let err = engine
        .create_transaction(outcome("Laptop", 20_000, "Hardware"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));

    let txs = engine.list_transactions(10).await.unwrap();
    assert_eq!(txs.len(), 1);
}

#[tokio::test]
async fn outcome_within_balance_updates_totals() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_transaction(income("Salary", 50_000, "Salary"))
        .await
        .unwrap();
    engine
        .create_transaction(outcome("Groceries", 20_000, "Food"))
        .await
        .unwrap();

    let balance = engine.balance().await.unwrap();
    assert_eq!(balance.income_minor, 50_000);
    assert_eq!(balance.outcome_minor, 20_000);
    assert_eq!(balance.total_minor, 30_000);
}

#[tokio::test]
async fn same_category_title_is_created_once() {
    let (engine, db) = engine_with_db().await;
    engine
        .create_transaction(income("Salary", 10_000, "Recurring"))
        .await
        .unwrap();
    engine
        .create_transaction(income("Dividends", 5_000, "Recurring"))
        .await
        .unwrap();

    assert_eq!(category_count(&db).await, 1);
}

#[tokio::test]
async fn titles_are_trimmed() {
    let (engine, db) = engine_with_db().await;
    let tx = engine
        .create_transaction(income("  Salary  ", 10_000, "  Work  "))
        .await
        .unwrap();
    assert_eq!(tx.title, "Salary");
    assert_eq!(tx.category, "Work");

    engine
        .create_transaction(income("Bonus", 5_000, "Work"))
        .await
        .unwrap();
    assert_eq!(category_count(&db).await, 1);
}

#[tokio::test]
async fn empty_titles_are_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_transaction(income("   ", 10_000, "Work"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));

    let err = engine
        .create_transaction(income("Salary", 10_000, " "))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));
}

#[tokio::test]
async fn non_positive_amount_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_transaction(income("Salary", 0, "Work"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .create_transaction(income("Salary", -100, "Work"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn delete_removes_transaction_and_restores_balance() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_transaction(income("Salary", 10_000, "Salary"))
        .await
        .unwrap();
    let tx = engine
        .create_transaction(outcome("Lunch", 4_000, "Food"))
        .await
        .unwrap();

    engine.delete_transaction(tx.id).await.unwrap();

    let balance = engine.balance().await.unwrap();
    assert_eq!(balance.total_minor, 10_000);

    let txs = engine.list_transactions(10).await.unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].title, "Salary");
}

#[tokio::test]
async fn deleting_nonexistent_transaction_errors() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.delete_transaction(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn delete_keeps_the_category() {
    let (engine, db) = engine_with_db().await;
    let tx = engine
        .create_transaction(income("Salary", 10_000, "Salary"))
        .await
        .unwrap();

    engine.delete_transaction(tx.id).await.unwrap();
    assert_eq!(category_count(&db).await, 1);
}

#[tokio::test]
async fn list_returns_newest_first_with_category() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_transaction(income("Salary", 10_000, "Salary"))
        .await
        .unwrap();
    engine
        .create_transaction(outcome("Lunch", 2_000, "Food"))
        .await
        .unwrap();

    let txs = engine.list_transactions(10).await.unwrap();
    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0].title, "Lunch");
    assert_eq!(txs[0].category, "Food");
    assert_eq!(txs[1].title, "Salary");
    assert_eq!(txs[1].category, "Salary");
}
