//! Display colors for categories in charts.

/// The label and hex color a chart uses for a category.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct CategoryStyle {
    pub label: &'static str,
    pub color: &'static str,
}

/// Name used for spending that has no category.
pub const UNCATEGORIZED: &str = "Outros";

pub const DEFAULT_STYLE: CategoryStyle = CategoryStyle {
    label: UNCATEGORIZED,
    color: "#64748b",
};

const STYLES: &[CategoryStyle] = &[
    CategoryStyle {
        label: "Alimentação",
        color: "#3b82f6",
    },
    CategoryStyle {
        label: "Lazer",
        color: "#f97316",
    },
    CategoryStyle {
        label: "Moradia",
        color: "#ec4899",
    },
    CategoryStyle {
        label: "Transporte",
        color: "#22c55e",
    },
    CategoryStyle {
        label: "Renda",
        color: "#10b981",
    },
    DEFAULT_STYLE,
];

/// Looks up the built-in style for `category`, falling back to `DEFAULT_STYLE`.
pub fn category_style(category: &str) -> CategoryStyle {
    STYLES
        .iter()
        .find(|s| s.label == category)
        .copied()
        .unwrap_or(DEFAULT_STYLE)
}
