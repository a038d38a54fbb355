//! Chart data computed from derived views.

use crate::dashboard::filters::MonthIndex;
use crate::model::{category_style, Amount, Transaction, TransactionKind, UNCATEGORIZED};
use serde::Serialize;
use std::collections::BTreeMap;

/// One point of the yearly trend chart.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub month: MonthIndex,
    pub income: Amount,
    pub expense: Amount,
}

/// One slice of the expense-by-category chart.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct CategorySlice {
    pub name: String,
    pub color: String,
    pub total: Amount,
}

/// Income, expense and their difference.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Totals {
    pub income: Amount,
    pub expense: Amount,
    pub balance: Amount,
}

/// A category that appears in the fetched data, with the kind of the first transaction using it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct AvailableCategory {
    pub name: String,
    pub kind: TransactionKind,
}

/// Income and expense per month, always twelve points from January to December. Transactions
/// outside `year` are ignored.
pub fn monthly_trend<'a>(
    view: impl IntoIterator<Item = &'a Transaction>,
    year: i32,
) -> Vec<MonthlyPoint> {
    let mut points: Vec<MonthlyPoint> = MonthIndex::all()
        .map(|month| MonthlyPoint {
            month,
            income: Amount::ZERO,
            expense: Amount::ZERO,
        })
        .collect();

    for t in view.into_iter().filter(|t| t.year() == year) {
        let point = &mut points[t.month0() as usize];
        match t.kind {
            TransactionKind::Income => point.income += t.amount.abs(),
            TransactionKind::Expense => point.expense += t.amount.abs(),
        }
    }
    points
}

/// Expense totals grouped by category name, largest first. Ties are ordered by name.
///
/// The color is the category's own color when the backend provided one, otherwise the built-in
/// style for that name.
pub fn category_breakdown<'a>(view: impl IntoIterator<Item = &'a Transaction>) -> Vec<CategorySlice> {
    let mut grouped: BTreeMap<String, CategorySlice> = BTreeMap::new();
    for t in view
        .into_iter()
        .filter(|t| t.kind == TransactionKind::Expense)
    {
        let (name, color) = match &t.category {
            Some(c) if !c.color.is_empty() => (c.name.clone(), c.color.clone()),
            Some(c) => (c.name.clone(), category_style(&c.name).color.to_string()),
            None => (
                UNCATEGORIZED.to_string(),
                category_style(UNCATEGORIZED).color.to_string(),
            ),
        };
        grouped
            .entry(name.clone())
            .or_insert_with(|| CategorySlice {
                name,
                color,
                total: Amount::ZERO,
            })
            .total += t.amount.abs();
    }

    let mut slices: Vec<CategorySlice> = grouped.into_values().collect();
    // Stable sort keeps the name order from the map for equal totals.
    slices.sort_by(|a, b| b.total.cmp(&a.total));
    slices
}

/// Sums the view into income, expense and balance.
pub fn totals<'a>(view: impl IntoIterator<Item = &'a Transaction>) -> Totals {
    let mut totals = Totals::default();
    for t in view {
        match t.kind {
            TransactionKind::Income => totals.income += t.amount.abs(),
            TransactionKind::Expense => totals.expense += t.amount.abs(),
        }
    }
    totals.balance = totals.income - totals.expense;
    totals
}

/// The all-time balance of `(amount, kind)` pairs: income adds, expense subtracts.
pub fn balance(amounts: impl IntoIterator<Item = (Amount, TransactionKind)>) -> Amount {
    amounts
        .into_iter()
        .map(|(amount, kind)| match kind {
            TransactionKind::Income => amount.abs(),
            TransactionKind::Expense => -amount.abs(),
        })
        .sum()
}

/// Distinct category names in the order they first appear.
pub fn available_categories<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<AvailableCategory> {
    let mut seen: Vec<AvailableCategory> = Vec::new();
    for t in transactions {
        if let Some(name) = t.category_name().filter(|n| !n.is_empty()) {
            if !seen.iter().any(|c| c.name == name) {
                seen.push(AvailableCategory {
                    name: name.to_string(),
                    kind: t.kind,
                });
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::test_data::{scenario, tx};
    use crate::dashboard::{derive_month_view, derive_overview, Filters};
    use crate::model::TransactionKind::{Expense, Income};
    use chrono::NaiveDate;

    #[test]
    fn test_trend_has_twelve_points_under_any_month_filter() {
        let transactions = scenario();
        let filters = Filters::new(2024)
            .set_block_months([MonthIndex::new(7).unwrap()])
            .toggle_chart_month(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let trend = monthly_trend(derive_overview(&transactions, &filters), 2024);
        assert_eq!(trend.len(), 12);
        assert_eq!(trend[2].income, Amount::from(100));
        assert_eq!(trend[2].expense, Amount::from(40));
        assert!(trend
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 2)
            .all(|(_, p)| p.income.is_zero() && p.expense.is_zero()));
    }

    #[test]
    fn test_trend_of_empty_view() {
        let trend = monthly_trend(Vec::<&Transaction>::new(), 2024);
        assert_eq!(trend.len(), 12);
        assert_eq!(trend[11].month.index(), 11);
    }

    #[test]
    fn test_category_breakdown() {
        let transactions = vec![
            tx("a", "2024-01-01", Expense, 30, Some("Lazer")),
            tx("b", "2024-01-02", Expense, 50, Some("Moradia")),
            tx("c", "2024-01-03", Expense, 25, Some("Lazer")),
            tx("d", "2024-01-04", Expense, 5, None),
            tx("e", "2024-01-05", Income, 999, Some("Renda")),
        ];
        let slices = category_breakdown(&transactions);
        let names: Vec<&str> = slices.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Lazer", "Moradia", "Outros"]);
        assert_eq!(slices[0].total, Amount::from(55));
        assert_eq!(slices[2].color, "#64748b");
    }

    #[test]
    fn test_category_color_falls_back_to_style() {
        let mut t = tx("a", "2024-01-01", Expense, 30, Some("Moradia"));
        if let Some(c) = t.category.as_mut() {
            c.color.clear();
        }
        let slices = category_breakdown([&t]);
        assert_eq!(slices[0].color, "#ec4899");
    }

    #[test]
    fn test_totals() {
        let transactions = scenario();
        let t = totals(derive_month_view(&transactions, &Filters::new(2024)));
        assert_eq!(t.income, Amount::from(100));
        assert_eq!(t.expense, Amount::from(40));
        assert_eq!(t.balance, Amount::from(60));
    }

    #[test]
    fn test_balance() {
        let b = balance(vec![
            (Amount::from(100), Income),
            (Amount::from(40), Expense),
            (Amount::from(80), Expense),
        ]);
        assert_eq!(b, Amount::from(-20));
    }

    #[test]
    fn test_available_categories_first_seen() {
        let transactions = vec![
            tx("a", "2024-01-01", Income, 1, Some("Renda")),
            tx("b", "2024-01-02", Expense, 1, Some("Lazer")),
            tx("c", "2024-01-03", Expense, 1, Some("Renda")),
            tx("d", "2024-01-04", Expense, 1, None),
        ];
        let available = available_categories(&transactions);
        assert_eq!(
            available,
            vec![
                AvailableCategory {
                    name: "Renda".to_string(),
                    kind: Income
                },
                AvailableCategory {
                    name: "Lazer".to_string(),
                    kind: Expense
                },
            ]
        );
    }
}
