//! Transaction command handlers.

use crate::api::{self, DateRange, Mode};
use crate::args::{InsertTransactionArgs, ListTransactionsArgs};
use crate::commands::{listing, transaction_line, Out};
use crate::model::{NewTransaction, Transaction};
use crate::{Config, Result};
use anyhow::{bail, Context};
use chrono::Local;
use tracing::warn;

/// Lists the transactions of a year, newest first.
pub async fn list_transactions(
    config: &Config,
    mode: Mode,
    args: &ListTransactionsArgs,
) -> Result<Out<Vec<Transaction>>> {
    let mut backend = api::backend(config, mode).await?;
    let range = DateRange::year(args.year())?;
    let transactions = backend
        .fetch_transactions(&range)
        .await
        .context("Unable to fetch transactions")?;
    let message = listing(
        &format!("{} transactions in {}:", transactions.len(), args.year()),
        transactions.iter().map(transaction_line),
    );
    Ok(Out::new(message, transactions))
}

/// Creates a transaction and returns it as stored.
///
/// The amount is stored as given; its sign comes from the kind. When a category is given it must
/// exist, and a warning is logged if its kind does not accept the transaction's kind.
///
/// # Errors
/// - Returns an error if the description is empty, the amount is zero or negative, the category
///   does not exist, or the backend rejects the row.
pub async fn insert_transaction(
    config: &Config,
    mode: Mode,
    args: &InsertTransactionArgs,
) -> Result<Out<Transaction>> {
    let description = args.description.trim();
    if description.is_empty() {
        bail!("The description must not be empty");
    }
    if args.amount.is_zero() || args.amount.is_negative() {
        bail!("The amount must be greater than zero, got {}", args.amount);
    }

    let mut backend = api::backend(config, mode).await?;
    if let Some(category_id) = &args.category_id {
        let categories = backend.list_categories().await?;
        let category = categories
            .iter()
            .find(|c| &c.id == category_id)
            .with_context(|| format!("Category '{category_id}' does not exist"))?;
        if !category.kind.accepts(args.kind) {
            warn!(
                "Category '{}' is meant for {} transactions, this one is {}",
                category.name, category.kind, args.kind
            );
        }
    }

    let new = NewTransaction {
        description: description.to_string(),
        amount: args.amount,
        kind: args.kind,
        date: args.date.unwrap_or_else(|| Local::now().naive_local()),
        category_id: args.category_id.clone(),
    };
    let created = backend
        .create_transaction(&new)
        .await
        .context("Unable to create the transaction")?;
    Ok(Out::new(
        format!("Created transaction {}", transaction_line(&created)),
        created,
    ))
}

/// Deletes the transaction with `id`.
pub async fn delete_transaction(config: &Config, mode: Mode, id: &str) -> Result<Out<String>> {
    let mut backend = api::backend(config, mode).await?;
    backend
        .delete_transaction(id)
        .await
        .with_context(|| format!("Unable to delete transaction '{id}'"))?;
    Ok(Out::new(format!("Deleted transaction {id}"), id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{parse_timestamp, Amount, TransactionKind};
    use crate::test::TestEnv;

    fn insert_args(category_id: Option<&str>) -> InsertTransactionArgs {
        InsertTransactionArgs {
            description: " Pizza ".to_string(),
            amount: Amount::from(60),
            kind: TransactionKind::Expense,
            date: Some(parse_timestamp("2025-12-24T20:00:00").unwrap()),
            category_id: category_id.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_insert_list_delete() {
        let env = TestEnv::new().await;
        let config = env.config();
        let out = insert_transaction(&config, Mode::Test, &insert_args(Some("cat-01")))
            .await
            .unwrap();
        let created = out.structure().unwrap().clone();
        assert_eq!(created.description, "Pizza");
        assert_eq!(created.category_name(), Some("Alimentação"));

        let list_args = ListTransactionsArgs { year: Some(2025) };
        let listed = list_transactions(&config, Mode::Test, &list_args)
            .await
            .unwrap();
        let rows = listed.structure().unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].id, created.id);
        assert!(listed.message().starts_with("6 transactions in 2025:"));

        delete_transaction(&config, Mode::Test, &created.id)
            .await
            .unwrap();
        let listed = list_transactions(&config, Mode::Test, &list_args)
            .await
            .unwrap();
        assert_eq!(listed.structure().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_insert_rejects_bad_input() {
        let env = TestEnv::new().await;
        let config = env.config();

        let mut args = insert_args(None);
        args.amount = Amount::ZERO;
        assert!(insert_transaction(&config, Mode::Test, &args).await.is_err());

        let mut args = insert_args(None);
        args.description = "   ".to_string();
        assert!(insert_transaction(&config, Mode::Test, &args).await.is_err());

        let args = insert_args(Some("missing"));
        let message = format!(
            "{:#}",
            insert_transaction(&config, Mode::Test, &args)
                .await
                .unwrap_err()
        );
        assert!(message.contains("Category 'missing' does not exist"));
    }

    #[tokio::test]
    async fn test_delete_missing_transaction() {
        let env = TestEnv::new().await;
        assert!(delete_transaction(&env.config(), Mode::Test, "nope")
            .await
            .is_err());
    }
}
