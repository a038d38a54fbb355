//! Access to the hosted backend that stores transactions and categories.
//!
//! The `Backend` trait is the only way the rest of the crate talks to the backend. `RestBackend`
//! implements it over the backend's REST API and `TestBackend` implements it in memory.

mod rest;
mod session;
mod test_backend;

use crate::model::{Amount, Category, NewCategory, NewTransaction, Transaction, TransactionKind};
use crate::{Config, Result};
use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub(crate) use rest::RestBackend;
pub(crate) use session::SessionProvider;
pub(crate) use test_backend::TestBackend;

/// The environment variable that selects `Mode::Test`.
pub const TEST_MODE_ENV: &str = "FINBOARD_IN_TEST_MODE";

/// The signed-in user that owns the data.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// An inclusive range of timestamps.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateRange {
    /// `year-01-01T00:00:00` through `year-12-31T23:59:59`.
    pub fn year(year: i32) -> Result<Self> {
        let first = NaiveDate::from_ymd_opt(year, 1, 1)
            .with_context(|| format!("Year {year} is out of range"))?;
        let last = NaiveDate::from_ymd_opt(year, 12, 31)
            .with_context(|| format!("Year {year} is out of range"))?;
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59)
            .context("Unable to construct the end of the day")?;
        Ok(Self {
            start: first.and_time(NaiveTime::MIN),
            end: last.and_time(end_of_day),
        })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn contains(&self, dt: &NaiveDateTime) -> bool {
        self.start <= *dt && *dt <= self.end
    }
}

/// The operations the app needs from the backend. Every query is scoped to the signed-in user.
#[async_trait::async_trait]
pub trait Backend {
    /// The signed-in user.
    async fn user(&mut self) -> Result<User>;

    /// Transactions dated within `range`, newest first, joined with their category.
    async fn fetch_transactions(&mut self, range: &DateRange) -> Result<Vec<Transaction>>;

    /// The newest `limit` transactions.
    async fn recent_transactions(&mut self, limit: usize) -> Result<Vec<Transaction>>;

    /// Amount and kind of every transaction, for computing the balance.
    async fn amounts(&mut self) -> Result<Vec<(Amount, TransactionKind)>>;

    /// Stores a new transaction and returns it as stored.
    async fn create_transaction(&mut self, new: &NewTransaction) -> Result<Transaction>;

    async fn delete_transaction(&mut self, id: &str) -> Result<()>;

    /// Every category, ordered by name.
    async fn list_categories(&mut self) -> Result<Vec<Category>>;

    /// Stores a new category and returns it as stored.
    async fn create_category(&mut self, new: &NewCategory) -> Result<Category>;

    async fn delete_category(&mut self, id: &str) -> Result<()>;
}

/// Selects which `Backend` implementation is used.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    /// Talk to the hosted backend.
    #[default]
    Rest,
    /// Use an in-memory backend persisted in the home directory.
    Test,
}

impl Mode {
    /// `Mode::Test` when `FINBOARD_IN_TEST_MODE` is set and non-empty, otherwise `Mode::Rest`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Rest,
        }
    }
}

/// Creates the `Backend` for `mode`. `Mode::Rest` requires a signed-in session.
pub(crate) async fn backend(config: &Config, mode: Mode) -> Result<Box<dyn Backend + Send>> {
    debug!("Creating backend in {mode:?} mode");
    match mode {
        Mode::Rest => {
            let session = SessionProvider::load(config).await.context(
                "No usable session was found. Run 'finboard login' to sign in first.",
            )?;
            Ok(Box::new(RestBackend::new(config, session)?))
        }
        Mode::Test => Ok(Box::new(
            TestBackend::open(config.test_backend_path()).await?,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_range() {
        let range = DateRange::year(2024).unwrap();
        assert_eq!(
            range.start().format("%Y-%m-%dT%H:%M:%S").to_string(),
            "2024-01-01T00:00:00"
        );
        assert_eq!(
            range.end().format("%Y-%m-%dT%H:%M:%S").to_string(),
            "2024-12-31T23:59:59"
        );
        let inside = crate::model::parse_timestamp("2024-12-31T23:59:59").unwrap();
        let outside = crate::model::parse_timestamp("2025-01-01").unwrap();
        assert!(range.contains(&inside));
        assert!(!range.contains(&outside));
    }

    #[test]
    fn test_year_out_of_range() {
        assert!(DateRange::year(i32::MAX).is_err());
    }
}
