//! The dashboard's filtering and aggregation engine.
//!
//! `Filters` holds the selected year and both filter layers. The functions in `views` derive the
//! overview, month and list views from a slice of transactions, `aggregate` turns those into chart
//! data, and `Dashboard` ties them to a `Backend` fetch.

pub mod aggregate;
mod filters;
mod session;
#[cfg(test)]
pub(crate) mod test_data;
mod views;

pub use aggregate::{AvailableCategory, CategorySlice, MonthlyPoint, Totals};
pub use filters::{BlockFilters, ChartFilters, Filters, MonthIndex};
pub use session::Dashboard;
pub use views::{derive_month_view, derive_overview, derive_transaction_list, matches};
