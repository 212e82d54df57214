mod common;

use anyhow::Result;
use budget_ledger::domain::{NewTransaction, TransactionType};
use budget_ledger::storage::Repository;
use common::{database_url, parse_date, test_repository};

fn lunch() -> NewTransaction {
    NewTransaction::new(
        parse_date("2024-01-05"),
        "Jedzenie",
        42.5,
        TransactionType::Income,
    )
    .with_description("lunch")
}

#[tokio::test]
async fn test_insert_and_find_by_id() -> Result<()> {
    let (repo, _temp) = test_repository().await?;

    let id = repo.insert(&lunch()).await?;
    let found = repo.find_by_id(id).await?.expect("transaction should exist");

    assert_eq!(found, lunch().with_id(id));
    assert_eq!(found.date_string(), "2024-01-05");

    Ok(())
}

#[tokio::test]
async fn test_find_missing_id_returns_none() -> Result<()> {
    let (repo, _temp) = test_repository().await?;
    assert!(repo.find_by_id(9999).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_description_is_optional() -> Result<()> {
    let (repo, _temp) = test_repository().await?;

    let tx = NewTransaction::new(
        parse_date("2024-01-05"),
        "Paliwo",
        200.0,
        TransactionType::Expense,
    );
    let id = repo.insert(&tx).await?;

    let found = repo.find_by_id(id).await?.unwrap();
    assert_eq!(found.description, None);

    Ok(())
}

#[tokio::test]
async fn test_ids_are_not_reused_after_delete() -> Result<()> {
    let (repo, _temp) = test_repository().await?;

    let first = repo.insert(&lunch()).await?;
    let second = repo.insert(&lunch()).await?;
    assert!(second > first);

    assert!(repo.delete(second).await?);
    let third = repo.insert(&lunch()).await?;
    assert!(third > second);

    Ok(())
}

#[tokio::test]
async fn test_update_overwrites_every_field() -> Result<()> {
    let (repo, _temp) = test_repository().await?;

    let id = repo.insert(&lunch()).await?;
    let changed = NewTransaction::new(
        parse_date("2024-02-10"),
        "Transport",
        -7.25,
        TransactionType::Expense,
    );

    assert!(repo.update(id, &changed).await?);

    let found = repo.find_by_id(id).await?.unwrap();
    assert_eq!(found, changed.with_id(id));
    // The old description is cleared, not kept
    assert_eq!(found.description, None);
    assert_eq!(repo.count().await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_update_and_delete_missing_id_are_noops() -> Result<()> {
    let (repo, _temp) = test_repository().await?;
    repo.insert(&lunch()).await?;

    assert!(!repo.update(9999, &lunch()).await?);
    assert!(!repo.delete(9999).await?);
    assert_eq!(repo.count().await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_list_all_orders_by_date_descending() -> Result<()> {
    let (repo, _temp) = test_repository().await?;

    for date in ["2024-01-01", "2024-03-15", "2024-02-01"] {
        repo.insert(&NewTransaction::new(
            parse_date(date),
            "Inne",
            1.0,
            TransactionType::Expense,
        ))
        .await?;
    }

    let dates: Vec<String> = repo
        .list_all()
        .await?
        .iter()
        .map(|tx| tx.date_string())
        .collect();
    assert_eq!(dates, vec!["2024-03-15", "2024-02-01", "2024-01-01"]);

    Ok(())
}

#[tokio::test]
async fn test_sum_by_type() -> Result<()> {
    let (repo, _temp) = test_repository().await?;

    assert_eq!(repo.sum_by_type(TransactionType::Income).await?, 0.0);
    assert_eq!(repo.sum_by_type(TransactionType::Expense).await?, 0.0);

    let date = parse_date("2024-01-10");
    repo.insert(&NewTransaction::new(date, "Wypłata", 250.0, TransactionType::Income))
        .await?;
    repo.insert(&NewTransaction::new(date, "Darowizna", 50.0, TransactionType::Income))
        .await?;
    repo.insert(&NewTransaction::new(date, "Jedzenie", 120.0, TransactionType::Expense))
        .await?;

    assert_eq!(repo.sum_by_type(TransactionType::Income).await?, 300.0);
    assert_eq!(repo.sum_by_type(TransactionType::Expense).await?, 120.0);

    Ok(())
}

#[tokio::test]
async fn test_initialize_is_idempotent_and_keeps_rows() -> Result<()> {
    let (repo, temp) = test_repository().await?;
    let id = repo.insert(&lunch()).await?;

    repo.initialize().await?;
    repo.initialize().await?;
    assert_eq!(repo.count().await?, 1);
    drop(repo);

    // Reopening runs the table creation again
    let reopened = Repository::init(&database_url(&temp)).await?;
    assert_eq!(reopened.find_by_id(id).await?, Some(lunch().with_id(id)));

    Ok(())
}

#[tokio::test]
async fn test_stored_layout_matches_transactions_table() -> Result<()> {
    let (repo, temp) = test_repository().await?;
    repo.insert(&lunch()).await?;
    drop(repo);

    let pool = sqlx::SqlitePool::connect(&database_url(&temp)).await?;
    let row: (i64, String, String, f64, String, Option<String>) = sqlx::query_as(
        "SELECT Id, Date, Category, Amount, Type, Description FROM Transactions",
    )
    .fetch_one(&pool)
    .await?;

    assert_eq!(row.1, "2024-01-05");
    assert_eq!(row.2, "Jedzenie");
    assert_eq!(row.3, 42.5);
    assert_eq!(row.4, "Income");
    assert_eq!(row.5.as_deref(), Some("lunch"));

    Ok(())
}
