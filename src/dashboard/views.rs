//! Derived views over the fetched transactions.
//!
//! Each view is a pure function of the transactions and a `Filters` snapshot. They differ only in
//! which filter dimensions they respect.

use crate::dashboard::filters::{same_month, Filters, MonthIndex};
use crate::model::Transaction;

/// Which dimensions a match ignores.
#[derive(Debug, Default, Clone, Copy)]
struct Ignore {
    month: bool,
}

/// The transactions behind the trend chart. The month dimension is ignored so that the chart
/// always spans the whole selected year. Year, kind and the category union apply.
pub fn derive_overview<'a>(
    transactions: &'a [Transaction],
    filters: &Filters,
) -> Vec<&'a Transaction> {
    select(transactions, filters, Ignore { month: true })
}

/// The transactions behind the summary cards and the category chart. Every dimension applies;
/// a chart month takes precedence over block months.
pub fn derive_month_view<'a>(
    transactions: &'a [Transaction],
    filters: &Filters,
) -> Vec<&'a Transaction> {
    select(transactions, filters, Ignore::default())
}

/// The transactions shown in the list. Filtered exactly like `derive_month_view`.
pub fn derive_transaction_list<'a>(
    transactions: &'a [Transaction],
    filters: &Filters,
) -> Vec<&'a Transaction> {
    select(transactions, filters, Ignore::default())
}

/// Whether `transaction` passes every filter dimension.
pub fn matches(transaction: &Transaction, filters: &Filters) -> bool {
    matches_with(transaction, filters, Ignore::default())
}

fn select<'a>(
    transactions: &'a [Transaction],
    filters: &Filters,
    ignore: Ignore,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|t| matches_with(t, filters, ignore))
        .collect()
}

fn matches_with(t: &Transaction, filters: &Filters, ignore: Ignore) -> bool {
    // The fetch already restricts to the year; rows added locally may not be.
    if t.year() != filters.year() {
        return false;
    }

    if !ignore.month {
        let block_months = filters.block().months();
        if let Some(chart_month) = filters.chart().month() {
            if !same_month(&t.date, &chart_month) {
                return false;
            }
        } else if !block_months.is_empty() && !block_months.contains(&MonthIndex::of(&t.date)) {
            return false;
        }
    }

    if !filters.block().kinds().contains(&t.kind) {
        return false;
    }

    let categories = filters.active_categories();
    if !categories.is_empty() {
        match t.category_name() {
            Some(name) if categories.contains(name) => {}
            _ => return false,
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::test_data::{scenario, tx};
    use crate::model::TransactionKind::{Expense, Income};
    use chrono::NaiveDate;

    fn ids(view: &[&Transaction]) -> Vec<String> {
        view.iter().map(|t| t.id.clone()).collect()
    }

    fn month(i: u32) -> MonthIndex {
        MonthIndex::new(i).unwrap()
    }

    #[test]
    fn test_scenario() {
        let transactions = scenario();
        let filters = Filters::new(2024);
        assert_eq!(ids(&derive_month_view(&transactions, &filters)), vec!["1", "2"]);

        let expense_only = filters.toggle_block_kind(Income);
        assert_eq!(ids(&derive_month_view(&transactions, &expense_only)), vec!["2"]);

        let reset = expense_only.reset_all();
        assert_eq!(ids(&derive_month_view(&transactions, &reset)), vec!["1", "2"]);
    }

    #[test]
    fn test_month_view_excludes_unselected_kinds() {
        let transactions = vec![
            tx("a", "2024-01-01", Income, 10, None),
            tx("b", "2024-02-01", Expense, 10, Some("Lazer")),
            tx("c", "2024-03-01", Expense, 10, None),
            tx("d", "2024-04-01", Income, 10, Some("Renda")),
        ];
        for kind in [Income, Expense] {
            let other = if kind == Income { Expense } else { Income };
            let filters = Filters::new(2024).toggle_block_kind(other);
            let view = derive_month_view(&transactions, &filters);
            assert!(!view.is_empty());
            assert!(view.iter().all(|t| t.kind == kind));
        }
    }

    #[test]
    fn test_chart_month_overrides_block_months() {
        let transactions = vec![
            tx("jan", "2024-01-15", Expense, 10, None),
            tx("mar", "2024-03-05", Expense, 10, None),
            tx("mar2", "2024-03-31T23:59:59", Income, 10, None),
        ];
        let filters = Filters::new(2024)
            .set_block_months([month(0)])
            .toggle_chart_month(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(ids(&derive_month_view(&transactions, &filters)), vec!["mar", "mar2"]);
        assert_eq!(
            ids(&derive_transaction_list(&transactions, &filters)),
            vec!["mar", "mar2"]
        );
    }

    #[test]
    fn test_block_months() {
        let transactions = vec![
            tx("jan", "2024-01-15", Expense, 10, None),
            tx("feb", "2024-02-15", Expense, 10, None),
            tx("mar", "2024-03-15", Expense, 10, None),
        ];
        let filters = Filters::new(2024)
            .toggle_block_month(month(0))
            .toggle_block_month(month(2));
        assert_eq!(ids(&derive_month_view(&transactions, &filters)), vec!["jan", "mar"]);
    }

    #[test]
    fn test_overview_ignores_months_but_not_kind_or_category() {
        let transactions = vec![
            tx("jan", "2024-01-15", Expense, 10, Some("Lazer")),
            tx("feb", "2024-02-15", Expense, 10, Some("Moradia")),
            tx("mar", "2024-03-15", Income, 10, Some("Lazer")),
        ];
        let filters = Filters::new(2024)
            .toggle_block_month(month(0))
            .toggle_chart_month(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
            .toggle_block_kind(Income)
            .toggle_chart_category("Lazer");
        assert_eq!(ids(&derive_overview(&transactions, &filters)), vec!["jan"]);
    }

    #[test]
    fn test_category_union_excludes_uncategorized() {
        let transactions = vec![
            tx("a", "2024-05-01", Expense, 10, Some("Lazer")),
            tx("b", "2024-05-02", Expense, 10, Some("Moradia")),
            tx("c", "2024-05-03", Expense, 10, None),
            tx("d", "2024-05-04", Expense, 10, Some("Transporte")),
        ];
        let filters = Filters::new(2024)
            .toggle_block_category("Lazer")
            .toggle_chart_category("Moradia");
        assert_eq!(ids(&derive_month_view(&transactions, &filters)), vec!["a", "b"]);
    }

    #[test]
    fn test_other_years_are_dropped() {
        let transactions = vec![
            tx("old", "2023-12-31T23:59:59", Expense, 10, None),
            tx("new", "2024-01-01", Expense, 10, None),
        ];
        let filters = Filters::new(2024);
        assert_eq!(ids(&derive_overview(&transactions, &filters)), vec!["new"]);
        assert!(matches(&transactions[1], &filters));
        assert!(!matches(&transactions[0], &filters));
    }

    #[test]
    fn test_empty_input() {
        let filters = Filters::new(2024).toggle_block_category("Lazer");
        assert!(derive_overview(&[], &filters).is_empty());
        assert!(derive_month_view(&[], &filters).is_empty());
        assert!(derive_transaction_list(&[], &filters).is_empty());
    }
}
