use crate::model::TransactionKind;
use serde::{Deserialize, Serialize};

/// Which kind of transaction a category is meant for.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Income,
    #[default]
    Expense,
    Both,
}

serde_plain::derive_display_from_serialize!(CategoryKind);
serde_plain::derive_fromstr_from_deserialize!(CategoryKind);

impl CategoryKind {
    /// Whether a transaction of `kind` may be filed under a category of this kind.
    pub fn accepts(&self, kind: TransactionKind) -> bool {
        match self {
            CategoryKind::Both => true,
            CategoryKind::Income => kind == TransactionKind::Income,
            CategoryKind::Expense => kind == TransactionKind::Expense,
        }
    }

    fn as_tag(&self) -> &'static str {
        match self {
            CategoryKind::Income => "receita",
            CategoryKind::Expense => "gasto",
            CategoryKind::Both => "ambos",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "receita" => Some(CategoryKind::Income),
            "gasto" | "despesa" => Some(CategoryKind::Expense),
            "ambos" => Some(CategoryKind::Both),
            _ => None,
        }
    }
}

/// A user-defined category as stored by the backend.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "tipo", with = "category_tag")]
    pub kind: CategoryKind,
    #[serde(rename = "cor")]
    pub color: String,
    #[serde(rename = "icone", default)]
    pub icon: Option<String>,
}

/// The fields needed to create a category.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct NewCategory {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "tipo", with = "category_tag")]
    pub kind: CategoryKind,
    #[serde(rename = "cor")]
    pub color: String,
    #[serde(rename = "icone", skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

mod category_tag {
    use super::CategoryKind;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(kind: &CategoryKind, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(kind.as_tag())
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<CategoryKind, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        CategoryKind::from_tag(&tag)
            .ok_or_else(|| serde::de::Error::custom(format!("Unknown category type '{tag}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_category() {
        let json = r##"{"id":"c1","nome":"Lazer","tipo":"ambos","cor":"#f97316","icone":null,
            "user_id":"u1"}"##;
        let c: Category = serde_json::from_str(json).unwrap();
        assert_eq!(c.name, "Lazer");
        assert_eq!(c.kind, CategoryKind::Both);
        assert!(c.icon.is_none());
    }

    #[test]
    fn test_serialize_expense_category_as_gasto() {
        let c = NewCategory {
            name: "Mercado".to_string(),
            kind: CategoryKind::Expense,
            color: "#ef4444".to_string(),
            icon: None,
        };
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["tipo"], "gasto");
        assert!(json.get("icone").is_none());
    }

    #[test]
    fn test_deserialize_both_expense_tags() {
        for tag in ["gasto", "despesa"] {
            let json = format!(r##"{{"id":"c1","nome":"Casa","tipo":"{tag}","cor":"#000000"}}"##);
            let c: Category = serde_json::from_str(&json).unwrap();
            assert_eq!(c.kind, CategoryKind::Expense);
        }
    }

    #[test]
    fn test_accepts() {
        assert!(CategoryKind::Both.accepts(TransactionKind::Income));
        assert!(CategoryKind::Expense.accepts(TransactionKind::Expense));
        assert!(!CategoryKind::Expense.accepts(TransactionKind::Income));
    }
}
