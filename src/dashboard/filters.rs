//! The two filter layers of the dashboard.
//!
//! Block filters come from the filter panel and are multi-valued. Chart filters come from clicking
//! on a chart and hold at most one month and one category. Every mutator returns a new `Filters`
//! snapshot and leaves `self` untouched.

use crate::model::TransactionKind;
use crate::Result;
use anyhow::ensure;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// A zero-based month of the year, `0` is January and `11` is December.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct MonthIndex(u32);

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl MonthIndex {
    pub fn new(index: u32) -> Result<Self> {
        ensure!(index < 12, "Month index must be between 0 and 11, got {index}");
        Ok(Self(index))
    }

    pub fn index(&self) -> u32 {
        self.0
    }

    /// All twelve months in calendar order.
    pub fn all() -> impl Iterator<Item = MonthIndex> {
        (0..12).map(MonthIndex)
    }

    pub fn of(date: &impl Datelike) -> Self {
        Self(date.month0())
    }

    pub fn abbreviation(&self) -> &'static str {
        MONTH_ABBREVIATIONS[self.0 as usize]
    }
}

impl TryFrom<u32> for MonthIndex {
    type Error = anyhow::Error;

    fn try_from(value: u32) -> Result<Self> {
        MonthIndex::new(value)
    }
}

impl From<MonthIndex> for u32 {
    fn from(value: MonthIndex) -> Self {
        value.0
    }
}

impl Display for MonthIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Filters chosen in the filter panel.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BlockFilters {
    /// Empty means every month.
    months: BTreeSet<MonthIndex>,
    /// Never empty.
    kinds: BTreeSet<TransactionKind>,
    /// Empty means every category.
    categories: BTreeSet<String>,
}

impl Default for BlockFilters {
    fn default() -> Self {
        Self {
            months: BTreeSet::new(),
            kinds: TransactionKind::ALL.into_iter().collect(),
            categories: BTreeSet::new(),
        }
    }
}

impl BlockFilters {
    pub fn months(&self) -> &BTreeSet<MonthIndex> {
        &self.months
    }

    pub fn kinds(&self) -> &BTreeSet<TransactionKind> {
        &self.kinds
    }

    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    /// True when any block filter narrows the data.
    pub fn is_active(&self) -> bool {
        !self.months.is_empty()
            || self.kinds.len() < TransactionKind::ALL.len()
            || !self.categories.is_empty()
    }
}

/// Filters chosen by clicking on the charts.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChartFilters {
    /// Any date within the selected month; only its year and month are significant.
    month: Option<NaiveDate>,
    category: Option<String>,
}

impl ChartFilters {
    pub fn month(&self) -> Option<NaiveDate> {
        self.month
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.month.is_some() || self.category.is_some()
    }
}

/// The complete filter state of the dashboard: the selected year plus both filter layers.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    year: i32,
    block: BlockFilters,
    chart: ChartFilters,
}

impl Filters {
    /// Default filters for `year`: every month, both kinds, every category, no chart selection.
    pub fn new(year: i32) -> Self {
        Self {
            year,
            block: BlockFilters::default(),
            chart: ChartFilters::default(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn block(&self) -> &BlockFilters {
        &self.block
    }

    pub fn chart(&self) -> &ChartFilters {
        &self.chart
    }

    pub fn is_active(&self) -> bool {
        self.block.is_active() || self.chart.is_active()
    }

    /// Switches to `year`. Month selections of both layers are cleared, as is the chart category.
    /// Block kinds and block categories carry over.
    #[must_use]
    pub fn with_year(&self, year: i32) -> Self {
        let mut next = self.clone();
        next.year = year;
        next.block.months.clear();
        next.chart = ChartFilters::default();
        next
    }

    #[must_use]
    pub fn toggle_block_month(&self, month: MonthIndex) -> Self {
        let mut next = self.clone();
        if !next.block.months.remove(&month) {
            next.block.months.insert(month);
        }
        next
    }

    #[must_use]
    pub fn set_block_months(&self, months: impl IntoIterator<Item = MonthIndex>) -> Self {
        let mut next = self.clone();
        next.block.months = months.into_iter().collect();
        next
    }

    /// Toggles `kind` in the block kinds. Removing the last remaining kind is not allowed; the set
    /// collapses to `kind` instead.
    #[must_use]
    pub fn toggle_block_kind(&self, kind: TransactionKind) -> Self {
        let mut next = self.clone();
        if !next.block.kinds.remove(&kind) {
            next.block.kinds.insert(kind);
        }
        if next.block.kinds.is_empty() {
            next.block.kinds.insert(kind);
        }
        next
    }

    #[must_use]
    pub fn toggle_block_category(&self, category: impl Into<String>) -> Self {
        let category = category.into();
        let mut next = self.clone();
        if !next.block.categories.remove(&category) {
            next.block.categories.insert(category);
        }
        next
    }

    /// Selects the calendar month containing `date`, or clears the selection if that month is
    /// already selected.
    #[must_use]
    pub fn toggle_chart_month(&self, date: NaiveDate) -> Self {
        let mut next = self.clone();
        next.chart.month = match self.chart.month {
            Some(current) if same_month(&current, &date) => None,
            _ => Some(date),
        };
        next
    }

    /// Selects `category`, or clears the selection if it is already selected.
    #[must_use]
    pub fn toggle_chart_category(&self, category: impl Into<String>) -> Self {
        let category = category.into();
        let mut next = self.clone();
        next.chart.category = match self.chart.category.as_deref() {
            Some(current) if current == category => None,
            _ => Some(category),
        };
        next
    }

    /// Both layers back to their defaults. The year is kept.
    #[must_use]
    pub fn reset_all(&self) -> Self {
        Self::new(self.year)
    }

    /// Block categories plus the chart category. Empty means every category.
    pub fn active_categories(&self) -> BTreeSet<&str> {
        self.block
            .categories
            .iter()
            .map(String::as_str)
            .chain(self.chart.category())
            .collect()
    }
}

pub(super) fn same_month(a: &impl Datelike, b: &impl Datelike) -> bool {
    a.year() == b.year() && a.month() == b.month()
}
