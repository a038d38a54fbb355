//! Command handlers for the finboard CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod categories;
mod dashboard;
mod init;
mod login;
mod overview;
mod transactions;

use crate::model::Transaction;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use categories::{delete_category, insert_category, list_categories};
pub use dashboard::{dashboard, DashboardReport};
pub use init::init;
pub use login::login;
pub use overview::{balance, recent, Balance};
pub use transactions::{delete_transaction, insert_transaction, list_transactions};

/// The output type for a command: a message for the user and, optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// One line of a transaction listing, e.g. `2026-03-09  -R$ 1.850,00  Aluguel [Moradia] (tx-1)`.
pub(crate) fn transaction_line(t: &Transaction) -> String {
    let category = t
        .category_name()
        .map(|name| format!(" [{name}]"))
        .unwrap_or_default();
    format!(
        "{}  {:>14}  {}{} ({})",
        t.date.format("%Y-%m-%d"),
        t.signed_amount().to_string(),
        t.description,
        category,
        t.id
    )
}

/// Joins a heading with one indented line per item, or a note when there are none.
pub(crate) fn listing<I>(heading: &str, lines: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut out = heading.to_string();
    let mut empty = true;
    for line in lines {
        empty = false;
        out.push_str("\n  ");
        out.push_str(&line);
    }
    if empty {
        out.push_str("\n  (none)");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{parse_timestamp, Amount, CategoryRef, TransactionKind};

    #[test]
    fn test_transaction_line() {
        let t = Transaction {
            id: "tx-1".to_string(),
            description: "Aluguel".to_string(),
            amount: Amount::from(1850),
            kind: TransactionKind::Expense,
            category: Some(CategoryRef {
                name: "Moradia".to_string(),
                color: "#ec4899".to_string(),
            }),
            date: parse_timestamp("2026-03-09T08:00:00").unwrap(),
            owner: None,
        };
        let line = transaction_line(&t);
        assert!(line.starts_with("2026-03-09"));
        assert!(line.contains("-R$ 1.850,00"));
        assert!(line.ends_with("Aluguel [Moradia] (tx-1)"));
    }

    #[test]
    fn test_listing() {
        assert_eq!(listing("Things:", Vec::new()), "Things:\n  (none)");
        assert_eq!(
            listing("Things:", vec!["a".to_string(), "b".to_string()]),
            "Things:\n  a\n  b"
        );
    }

    #[test]
    fn test_out() {
        let out: Out<u32> = Out::new("done", 3);
        assert_eq!(out.message(), "done");
        assert_eq!(out.structure(), Some(&3));
        let out: Out<()> = "hello".into();
        assert!(out.structure().is_none());
    }
}
