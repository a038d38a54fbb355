//! The `finboard dashboard` command.

use crate::api::{self, Mode};
use crate::args::{DashboardArgs, DashboardView};
use crate::commands::{listing, transaction_line, Out};
use crate::dashboard::aggregate::{self, AvailableCategory, CategorySlice, MonthlyPoint, Totals};
use crate::dashboard::{Dashboard, Filters};
use crate::model::{Transaction, TransactionKind};
use crate::{Config, Result};
use anyhow::bail;
use serde::Serialize;

/// Everything the dashboard shows for one view. Parts that the view does not include are `None`.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub view: DashboardView,
    pub filters: Filters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<Totals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Vec<MonthlyPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategorySlice>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Transaction>>,
    pub available_categories: Vec<AvailableCategory>,
}

/// Fetches the selected year, applies the filters from `args` and renders the requested view.
///
/// The trend always covers the whole year and ignores the month filters. Totals, the category
/// breakdown and the list respect every filter.
///
/// # Errors
/// - Returns an error if the fetch fails.
pub async fn dashboard(
    config: &Config,
    mode: Mode,
    args: &DashboardArgs,
) -> Result<Out<DashboardReport>> {
    let mut backend = api::backend(config, mode).await?;
    let mut dashboard = Dashboard::load(args.year(), backend.as_mut()).await;
    if let Some(e) = dashboard.last_error() {
        bail!("Unable to load the dashboard for {}: {e}", args.year());
    }
    let filters = apply_args(dashboard.filters(), args);
    dashboard.set_filters(filters)?;
    let report = build_report(&dashboard, args.view);
    Ok(Out::new(render(&report, dashboard.year()), report))
}

/// Turns the command line filters into a `Filters` snapshot the same way the filter panel would.
fn apply_args(base: &Filters, args: &DashboardArgs) -> Filters {
    let mut filters = base.set_block_months(args.months.iter().copied());
    if !args.kinds.is_empty() {
        for kind in TransactionKind::ALL {
            if !args.kinds.contains(&kind) {
                filters = filters.toggle_block_kind(kind);
            }
        }
    }
    for category in &args.categories {
        if !filters.block().categories().contains(category.as_str()) {
            filters = filters.toggle_block_category(category.clone());
        }
    }
    if let Some(month) = args.chart_month {
        filters = filters.toggle_chart_month(month);
    }
    if let Some(category) = &args.chart_category {
        filters = filters.toggle_chart_category(category.clone());
    }
    filters
}

fn build_report(dashboard: &Dashboard, view: DashboardView) -> DashboardReport {
    let month_view = dashboard.month_view();
    let with_totals = matches!(view, DashboardView::Overview | DashboardView::Summary);
    let with_trend = matches!(view, DashboardView::Overview | DashboardView::Months);
    let with_categories = matches!(view, DashboardView::Overview | DashboardView::Categories);
    let with_list = view == DashboardView::List;

    DashboardReport {
        view,
        filters: dashboard.filters().clone(),
        totals: with_totals.then(|| aggregate::totals(month_view.iter().copied())),
        trend: with_trend
            .then(|| aggregate::monthly_trend(dashboard.overview(), dashboard.year())),
        categories: with_categories
            .then(|| aggregate::category_breakdown(month_view.iter().copied())),
        transactions: with_list.then(|| {
            dashboard
                .transaction_list()
                .into_iter()
                .cloned()
                .collect()
        }),
        available_categories: dashboard.available_categories(),
    }
}

fn render(report: &DashboardReport, year: i32) -> String {
    let mut sections = vec![describe_filters(&report.filters, year)];
    if let Some(totals) = &report.totals {
        sections.push(format!(
            "Income: {}\nExpense: {}\nBalance: {}",
            totals.income, totals.expense, totals.balance
        ));
    }
    if let Some(trend) = &report.trend {
        sections.push(listing(
            "Monthly trend:",
            trend.iter().map(|p| {
                format!(
                    "{}  income {:>14}  expense {:>14}",
                    p.month,
                    p.income.to_string(),
                    p.expense.to_string()
                )
            }),
        ));
    }
    if let Some(categories) = &report.categories {
        sections.push(listing(
            "Expenses by category:",
            categories
                .iter()
                .map(|s| format!("{:<16} {:>14}  {}", s.name, s.total.to_string(), s.color)),
        ));
    }
    if let Some(transactions) = &report.transactions {
        sections.push(listing(
            "Transactions:",
            transactions.iter().map(transaction_line),
        ));
    }
    sections.join("\n\n")
}

/// A one-line summary of the active filters.
fn describe_filters(filters: &Filters, year: i32) -> String {
    let mut parts = vec![format!("Dashboard for {year}")];
    let block = filters.block();
    if let Some(month) = filters.chart().month() {
        parts.push(format!("month {}", month.format("%Y-%m")));
    } else if !block.months().is_empty() {
        let months: Vec<String> = block.months().iter().map(|m| m.to_string()).collect();
        parts.push(format!("months {}", months.join(", ")));
    }
    if block.kinds().len() < TransactionKind::ALL.len() {
        let kinds: Vec<String> = block.kinds().iter().map(|k| k.to_string()).collect();
        parts.push(format!("only {}", kinds.join(", ")));
    }
    let categories = filters.active_categories();
    if !categories.is_empty() {
        let categories: Vec<&str> = categories.into_iter().collect();
        parts.push(format!("categories {}", categories.join(", ")));
    }
    parts.join("; ")
}
