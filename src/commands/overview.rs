//! The `finboard balance` and `finboard recent` commands.

use crate::api::{self, Mode};
use crate::commands::{listing, transaction_line, Out};
use crate::dashboard::aggregate;
use crate::model::{Amount, Transaction};
use crate::{Config, Result};
use anyhow::Context;
use serde::Serialize;

/// The all-time balance and how many transactions it covers.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Balance {
    pub balance: Amount,
    pub transactions: usize,
}

/// Sums every transaction of the signed-in user: income adds and expense subtracts.
pub async fn balance(config: &Config, mode: Mode) -> Result<Out<Balance>> {
    let mut backend = api::backend(config, mode).await?;
    let amounts = backend
        .amounts()
        .await
        .context("Unable to fetch the balance")?;
    let result = Balance {
        transactions: amounts.len(),
        balance: aggregate::balance(amounts),
    };
    Ok(Out::new(format!("Balance: {}", result.balance), result))
}

/// Shows the newest `limit` transactions regardless of year.
pub async fn recent(config: &Config, mode: Mode, limit: usize) -> Result<Out<Vec<Transaction>>> {
    let mut backend = api::backend(config, mode).await?;
    let transactions = backend
        .recent_transactions(limit)
        .await
        .context("Unable to fetch recent transactions")?;
    let message = listing(
        "Recent transactions:",
        transactions.iter().map(transaction_line),
    );
    Ok(Out::new(message, transactions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_balance_of_seed_data() {
        let env = TestEnv::new().await;
        let out = balance(&env.config(), Mode::Test).await.unwrap();
        let result = out.structure().unwrap();
        assert_eq!(result.transactions, 39);
        assert_eq!(result.balance, "38571.71".parse::<Amount>().unwrap());
        assert_eq!(out.message(), "Balance: R$ 38.571,71");
    }

    #[tokio::test]
    async fn test_recent() {
        let env = TestEnv::new().await;
        let out = recent(&env.config(), Mode::Test, 3).await.unwrap();
        let ids: Vec<&str> = out
            .structure()
            .unwrap()
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["tx-0039", "tx-0038", "tx-0037"]);
        assert!(out.message().contains("Padaria"));
    }
}
