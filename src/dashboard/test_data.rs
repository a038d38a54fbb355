//! Transaction fixtures shared by the dashboard tests.

use crate::model::{parse_timestamp, Amount, CategoryRef, Transaction, TransactionKind};

/// Builds a transaction owned by `user-1`. A category gets its built-in color.
pub(crate) fn tx(
    id: &str,
    date: &str,
    kind: TransactionKind,
    amount: i64,
    category: Option<&str>,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        description: format!("transaction {id}"),
        amount: Amount::from(amount),
        kind,
        category: category.map(|name| CategoryRef {
            name: name.to_string(),
            color: crate::model::category_style(name).color.to_string(),
        }),
        date: parse_timestamp(date).unwrap(),
        owner: Some("user-1".to_string()),
    }
}

/// An income of 100 on 2024-03-05 and a "Food" expense of 40 on 2024-03-10.
pub(crate) fn scenario() -> Vec<Transaction> {
    vec![
        tx("1", "2024-03-05", TransactionKind::Income, 100, None),
        tx("2", "2024-03-10", TransactionKind::Expense, 40, Some("Food")),
    ]
}
