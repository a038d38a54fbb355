//! The stateful side of the dashboard: the fetched transactions and the current filters.

use crate::api::{Backend, DateRange};
use crate::dashboard::aggregate::{self, AvailableCategory};
use crate::dashboard::filters::Filters;
use crate::dashboard::views;
use crate::model::{NewTransaction, Transaction};
use crate::Result;
use anyhow::bail;
use tracing::{debug, error};

/// Holds one year of transactions for the signed-in user along with the filter state, and hands
/// out the derived views.
///
/// `refresh` holds `&mut self` for the whole fetch. Callers that drive the fetch themselves use
/// `begin_refresh` and `finish_refresh`, which drop results for a year that is no longer selected.
#[derive(Debug, Clone)]
pub struct Dashboard {
    transactions: Vec<Transaction>,
    filters: Filters,
    loading: bool,
    last_error: Option<String>,
}

impl Dashboard {
    /// An empty dashboard for `year` with default filters. Call `refresh` to fetch data.
    pub fn new(year: i32) -> Self {
        Self {
            transactions: Vec::new(),
            filters: Filters::new(year),
            loading: false,
            last_error: None,
        }
    }

    /// Creates a dashboard for `year` and fetches it. Check `last_error` to see whether the fetch
    /// succeeded.
    pub async fn load(year: i32, backend: &mut (dyn Backend + Send)) -> Self {
        let mut dashboard = Self::new(year);
        dashboard.refresh(backend).await;
        dashboard
    }

    pub fn year(&self) -> i32 {
        self.filters.year()
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Every fetched transaction, newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The message of the most recent failed fetch, cleared by the next successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Switches to `year`, resets the month filters and chart filters, and fetches that year.
    /// Returns whether the fetch succeeded; on failure the previous transactions are kept.
    pub async fn set_year(&mut self, year: i32, backend: &mut (dyn Backend + Send)) -> bool {
        self.filters = self.filters.with_year(year);
        self.refresh(backend).await
    }

    /// Re-fetches the selected year. On failure the error is logged and remembered, and the
    /// previous transactions stay in place.
    pub async fn refresh(&mut self, backend: &mut (dyn Backend + Send)) -> bool {
        let range = match self.begin_refresh() {
            Ok(range) => range,
            Err(e) => return self.fail(e),
        };
        let result = backend.fetch_transactions(&range).await;
        self.finish_refresh(&range, result)
    }

    /// Marks the dashboard as loading and returns the range to fetch for the selected year.
    /// Hand the outcome of that fetch to `finish_refresh`.
    pub fn begin_refresh(&mut self) -> Result<DateRange> {
        let range = DateRange::year(self.year())?;
        self.loading = true;
        Ok(range)
    }

    /// Applies the outcome of a fetch started with `begin_refresh` and clears the loading flag.
    ///
    /// A result for a range other than the selected year arrived late and is dropped; the flag
    /// then stays set until the current fetch finishes.
    pub fn finish_refresh(&mut self, range: &DateRange, result: Result<Vec<Transaction>>) -> bool {
        let current = DateRange::year(self.year()).ok();
        if current.as_ref() != Some(range) {
            debug!("Dropping a fetch for a year that is no longer selected");
            return false;
        }
        self.loading = false;
        match result {
            Ok(transactions) => {
                debug!(
                    "Fetched {} transactions for {}",
                    transactions.len(),
                    self.year()
                );
                self.transactions = transactions;
                self.last_error = None;
                true
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail(&mut self, e: anyhow::Error) -> bool {
        error!("Error fetching dashboard data: {e:#}");
        self.last_error = Some(format!("{e:#}"));
        false
    }

    /// Replaces the filter state with the result of `f`. Changing the year this way is refused
    /// because it needs a fetch; use `set_year` instead.
    pub fn update_filters(&mut self, f: impl FnOnce(&Filters) -> Filters) -> Result<()> {
        let next = f(&self.filters);
        if next.year() != self.filters.year() {
            bail!(
                "The year cannot change from {} to {} without a fetch",
                self.filters.year(),
                next.year()
            );
        }
        self.filters = next;
        Ok(())
    }

    /// Swaps in a new filter snapshot for the same year.
    pub fn set_filters(&mut self, filters: Filters) -> Result<()> {
        self.update_filters(|_| filters)
    }

    pub fn overview(&self) -> Vec<&Transaction> {
        views::derive_overview(&self.transactions, &self.filters)
    }

    pub fn month_view(&self) -> Vec<&Transaction> {
        views::derive_month_view(&self.transactions, &self.filters)
    }

    pub fn transaction_list(&self) -> Vec<&Transaction> {
        views::derive_transaction_list(&self.transactions, &self.filters)
    }

    /// Categories present in the fetched data, for populating the category filter.
    pub fn available_categories(&self) -> Vec<AvailableCategory> {
        aggregate::available_categories(&self.transactions)
    }

    /// Puts a transaction that was just created at the front of the list.
    pub fn insert_transaction(&mut self, transaction: Transaction) {
        self.transactions.insert(0, transaction);
    }

    /// Drops a transaction that was just deleted. Returns it if it was present.
    pub fn remove_transaction(&mut self, id: &str) -> Option<Transaction> {
        let ix = self.transactions.iter().position(|t| t.id == id)?;
        Some(self.transactions.remove(ix))
    }

    /// Creates a transaction through `backend` and, once it is stored, prepends it locally.
    pub async fn create_transaction(
        &mut self,
        backend: &mut (dyn Backend + Send),
        new: NewTransaction,
    ) -> Result<&Transaction> {
        let created = backend.create_transaction(&new).await?;
        self.insert_transaction(created);
        Ok(&self.transactions[0])
    }

    /// Deletes a transaction through `backend` and, once that succeeds, removes it locally.
    pub async fn delete_transaction(
        &mut self,
        backend: &mut (dyn Backend + Send),
        id: &str,
    ) -> Result<()> {
        backend.delete_transaction(id).await?;
        let _ = self.remove_transaction(id);
        Ok(())
    }
}
