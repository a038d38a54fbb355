//! Implements the `Backend` trait using in-memory data for testing purposes.
//!
//! This is compiled into the release binary too, so that the whole app can run top-to-bottom
//! without a hosted backend. When opened with a path, the data is written back to that file after
//! every change so that separate invocations see each other's edits.

use crate::api::{Backend, DateRange, User};
use crate::model::{
    parse_timestamp, Amount, Category, CategoryKind, CategoryRef, NewCategory, NewTransaction,
    Transaction, TransactionKind,
};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::PathBuf;
use tracing::debug;

/// The user that owns the seed data.
pub(crate) const TEST_USER_ID: &str = "test-user";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct State {
    user: User,
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
}

/// An implementation of `Backend` that holds everything in memory and, by default, is seeded with
/// some existing data.
#[derive(Debug, Clone)]
pub(crate) struct TestBackend {
    state: State,
    path: Option<PathBuf>,
    failure: Option<String>,
}

impl TestBackend {
    /// Creates a `TestBackend` for `user_id` holding exactly the given rows.
    pub(crate) fn with_data(
        user_id: &str,
        transactions: Vec<Transaction>,
        categories: Vec<Category>,
    ) -> Self {
        Self {
            state: State {
                user: User {
                    id: user_id.to_string(),
                    email: None,
                },
                transactions,
                categories,
            },
            path: None,
            failure: None,
        }
    }

    /// Loads the data stored at `path`, or seeds it when the file does not exist yet.
    pub(crate) async fn open(path: PathBuf) -> Result<Self> {
        let state = if path.is_file() {
            utils::deserialize(&path).await?
        } else {
            debug!("Seeding test data at {}", path.display());
            let state = seed()?;
            utils::serialize(&path, &state, false).await?;
            state
        };
        Ok(Self {
            state,
            path: Some(path),
            failure: None,
        })
    }

    /// Makes the next call fail with `message`.
    #[cfg(test)]
    pub(crate) fn fail_next(&mut self, message: impl Into<String>) {
        self.failure = Some(message.into());
    }

    fn check_failure(&mut self) -> Result<()> {
        match self.failure.take() {
            Some(message) => bail!("{message}"),
            None => Ok(()),
        }
    }

    async fn save(&self) -> Result<()> {
        if let Some(path) = &self.path {
            utils::serialize(path, &self.state, false).await?;
        }
        Ok(())
    }

    fn owned(&self) -> impl Iterator<Item = &Transaction> {
        let user_id = self.state.user.id.as_str();
        self.state
            .transactions
            .iter()
            .filter(move |t| t.owner.as_deref().map_or(true, |owner| owner == user_id))
    }

    fn newest_first<'a>(rows: impl Iterator<Item = &'a Transaction>) -> Vec<Transaction> {
        let mut rows: Vec<Transaction> = rows.cloned().collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows
    }
}

impl Default for TestBackend {
    /// Holds the seed data from this module.
    fn default() -> Self {
        match seed() {
            Ok(state) => Self {
                state,
                path: None,
                failure: None,
            },
            Err(_) => Self::with_data(TEST_USER_ID, Vec::new(), Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl Backend for TestBackend {
    async fn user(&mut self) -> Result<User> {
        self.check_failure()?;
        Ok(self.state.user.clone())
    }

    async fn fetch_transactions(&mut self, range: &DateRange) -> Result<Vec<Transaction>> {
        self.check_failure()?;
        Ok(Self::newest_first(
            self.owned().filter(|t| range.contains(&t.date)),
        ))
    }

    async fn recent_transactions(&mut self, limit: usize) -> Result<Vec<Transaction>> {
        self.check_failure()?;
        let mut rows = Self::newest_first(self.owned());
        rows.truncate(limit);
        Ok(rows)
    }

    async fn amounts(&mut self) -> Result<Vec<(Amount, TransactionKind)>> {
        self.check_failure()?;
        Ok(self.owned().map(|t| (t.amount, t.kind)).collect())
    }

    async fn create_transaction(&mut self, new: &NewTransaction) -> Result<Transaction> {
        self.check_failure()?;
        let category = match &new.category_id {
            Some(id) => {
                let category = self
                    .state
                    .categories
                    .iter()
                    .find(|c| &c.id == id)
                    .with_context(|| format!("Category '{id}' does not exist"))?;
                Some(CategoryRef {
                    name: category.name.clone(),
                    color: category.color.clone(),
                })
            }
            None => None,
        };
        let transaction = Transaction {
            id: uuid::Uuid::new_v4().to_string(),
            description: new.description.clone(),
            amount: new.amount,
            kind: new.kind,
            category,
            date: new.date,
            owner: Some(self.state.user.id.clone()),
        };
        self.state.transactions.push(transaction.clone());
        self.save().await?;
        Ok(transaction)
    }

    async fn delete_transaction(&mut self, id: &str) -> Result<()> {
        self.check_failure()?;
        let before = self.state.transactions.len();
        self.state.transactions.retain(|t| t.id != id);
        if self.state.transactions.len() == before {
            bail!("Transaction '{id}' does not exist");
        }
        self.save().await
    }

    async fn list_categories(&mut self) -> Result<Vec<Category>> {
        self.check_failure()?;
        let mut categories = self.state.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn create_category(&mut self, new: &NewCategory) -> Result<Category> {
        self.check_failure()?;
        let category = Category {
            id: uuid::Uuid::new_v4().to_string(),
            name: new.name.clone(),
            kind: new.kind,
            color: new.color.clone(),
            icon: new.icon.clone(),
        };
        self.state.categories.push(category.clone());
        self.save().await?;
        Ok(category)
    }

    async fn delete_category(&mut self, id: &str) -> Result<()> {
        self.check_failure()?;
        let before = self.state.categories.len();
        self.state.categories.retain(|c| c.id != id);
        if self.state.categories.len() == before {
            bail!("Category '{id}' does not exist");
        }
        self.save().await
    }
}

/// Builds the seed state from the CSV data in this module.
fn seed() -> Result<State> {
    let categories = load_categories(CATEGORY_DATA)?;
    let transactions = load_transactions(TRANSACTION_DATA, &categories)?;
    Ok(State {
        user: User {
            id: TEST_USER_ID.to_string(),
            email: Some("test@example.com".to_string()),
        },
        transactions,
        categories,
    })
}

#[derive(Debug, Deserialize)]
struct TransactionRow {
    id: String,
    date: String,
    description: String,
    kind: String,
    amount: String,
    category: String,
}

#[derive(Debug, Deserialize)]
struct CategoryRow {
    id: String,
    name: String,
    kind: String,
    color: String,
}

fn load_categories(csv_data: &str) -> Result<Vec<Category>> {
    let mut rdr = csv::Reader::from_reader(Cursor::new(csv_data.as_bytes()));
    let mut categories = Vec::new();
    for result in rdr.deserialize() {
        let row: CategoryRow = result.context("Bad category seed row")?;
        let kind: CategoryKind = row
            .kind
            .parse()
            .with_context(|| format!("Bad category kind '{}'", row.kind))?;
        categories.push(Category {
            id: row.id,
            name: row.name,
            kind,
            color: row.color,
            icon: None,
        });
    }
    Ok(categories)
}

fn load_transactions(csv_data: &str, categories: &[Category]) -> Result<Vec<Transaction>> {
    let mut rdr = csv::Reader::from_reader(Cursor::new(csv_data.as_bytes()));
    let mut transactions = Vec::new();
    for result in rdr.deserialize() {
        let row: TransactionRow = result.context("Bad transaction seed row")?;
        let category = categories
            .iter()
            .find(|c| c.name == row.category)
            .map(|c| CategoryRef {
                name: c.name.clone(),
                color: c.color.clone(),
            });
        transactions.push(Transaction {
            id: row.id,
            description: row.description,
            amount: row
                .amount
                .parse()
                .with_context(|| format!("Bad amount '{}'", row.amount))?,
            kind: TransactionKind::from_tag(&row.kind)?,
            category,
            date: parse_timestamp(&row.date)?,
            owner: Some(TEST_USER_ID.to_string()),
        });
    }
    Ok(transactions)
}

/// Seed category data.
const CATEGORY_DATA: &str = r##"id,name,kind,color
cat-01,Alimentação,expense,#3b82f6
cat-02,Lazer,expense,#f97316
cat-03,Moradia,expense,#ec4899
cat-04,Transporte,expense,#22c55e
cat-05,Renda,income,#10b981
"##;

/// Seed transaction data. Rows with an empty category are uncategorized.
const TRANSACTION_DATA: &str = r##"id,date,description,kind,amount,category
tx-0001,2025-11-05T09:00:00,Salário,receita,5200.00,Renda
tx-0002,2025-11-08T12:30:00,Supermercado Pão de Açúcar,gasto,412.37,Alimentação
tx-0003,2025-11-10T08:00:00,Aluguel,gasto,1850.00,Moradia
tx-0004,2025-12-05T09:00:00,Salário,receita,5200.00,Renda
tx-0005,2025-12-20T21:15:00,Cinema,gasto,64.00,Lazer
tx-0006,2026-01-05T09:00:00,Salário,receita,5200.00,Renda
tx-0007,2026-01-09T08:00:00,Aluguel,gasto,1850.00,Moradia
tx-0008,2026-01-14T18:40:00,Uber,gasto,27.90,Transporte
tx-0009,2026-01-22T13:05:00,Restaurante,gasto,88.50,Alimentação
tx-0010,2026-02-05T09:00:00,Salário,receita,5200.00,Renda
tx-0011,2026-02-09T08:00:00,Aluguel,gasto,1850.00,Moradia
tx-0012,2026-02-17T10:20:00,Feira,gasto,73.15,Alimentação
tx-0013,2026-02-28T22:00:00,Show,despesa,240.00,Lazer
tx-0014,2026-03-05T09:00:00,Salário,receita,5200.00,Renda
tx-0015,2026-03-09T08:00:00,Aluguel,gasto,1850.00,Moradia
tx-0016,2026-03-12T07:45:00,Combustível,gasto,210.00,Transporte
tx-0017,2026-03-18T16:00:00,Farmácia,gasto,45.60,
tx-0018,2026-04-05T09:00:00,Salário,receita,5200.00,Renda
tx-0019,2026-04-09T08:00:00,Aluguel,gasto,1850.00,Moradia
tx-0020,2026-04-15T19:30:00,Supermercado,gasto,389.02,Alimentação
tx-0021,2026-04-26T11:00:00,Venda de livro usado,receita,35.00,
tx-0022,2026-05-05T09:00:00,Salário,receita,5200.00,Renda
tx-0023,2026-05-09T08:00:00,Aluguel,gasto,1850.00,Moradia
tx-0024,2026-05-21T20:10:00,Bar com amigos,gasto,132.40,Lazer
tx-0025,2026-06-05T09:00:00,Salário,receita,5200.00,Renda
tx-0026,2026-06-09T08:00:00,Aluguel,gasto,1850.00,Moradia
tx-0027,2026-06-13T09:30:00,Ônibus,gasto,4.40,Transporte
tx-0028,2026-07-05T09:00:00,Salário,receita,5200.00,Renda
tx-0029,2026-07-09T08:00:00,Aluguel,gasto,1850.00,Moradia
tx-0030,2026-07-19T12:00:00,Supermercado,gasto,455.80,Alimentação
tx-0031,2026-08-05T09:00:00,Salário,receita,5200.00,Renda
tx-0032,2026-08-09T08:00:00,Aluguel,gasto,1850.00,Moradia
tx-0033,2026-08-23T15:00:00,Viagem,gasto,1320.00,Lazer
tx-0034,2026-09-05T09:00:00,Salário,receita,5200.00,Renda
tx-0035,2026-09-09T08:00:00,Aluguel,gasto,1850.00,Moradia
tx-0036,2026-09-30T18:00:00,Uber,gasto,31.25,Transporte
tx-0037,2026-10-05T09:00:00,Salário,receita,5200.00,Renda
tx-0038,2026-10-09T08:00:00,Aluguel,gasto,1850.00,Moradia
tx-0039,2026-10-12T10:00:00,Padaria,gasto,18.90,Alimentação
"##;
