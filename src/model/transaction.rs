use crate::model::Amount;
use crate::Result;
use anyhow::{bail, Context};
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionKind);
serde_plain::derive_fromstr_from_deserialize!(TransactionKind);

/// The tag the backend stores for income.
pub(crate) const INCOME_TAG: &str = "receita";
/// The tag the backend stores for expenses.
pub(crate) const EXPENSE_TAG: &str = "gasto";
/// Older rows carry the UI's word for expense rather than the stored one.
const LEGACY_EXPENSE_TAG: &str = "despesa";

impl TransactionKind {
    pub const ALL: [TransactionKind; 2] = [TransactionKind::Income, TransactionKind::Expense];

    /// Maps a stored type tag into a `TransactionKind`.
    pub(crate) fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            INCOME_TAG => Ok(TransactionKind::Income),
            EXPENSE_TAG | LEGACY_EXPENSE_TAG => Ok(TransactionKind::Expense),
            bad => bail!("Unknown transaction type tag '{bad}'"),
        }
    }

    /// The tag written to the backend for this kind.
    pub(crate) fn as_tag(&self) -> &'static str {
        match self {
            TransactionKind::Income => INCOME_TAG,
            TransactionKind::Expense => EXPENSE_TAG,
        }
    }
}

/// The category name and display color joined onto a transaction.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CategoryRef {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "cor")]
    pub color: String,
}

/// A single dated money record.
///
/// `amount` is the magnitude as entered; use `signed_amount` for arithmetic across kinds.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "valor")]
    pub amount: Amount,
    #[serde(rename = "tipo", with = "kind_tag")]
    pub kind: TransactionKind,
    #[serde(rename = "categoria", default)]
    pub category: Option<CategoryRef>,
    #[serde(rename = "data", with = "timestamp")]
    pub date: NaiveDateTime,
    #[serde(rename = "user_id", default)]
    pub owner: Option<String>,
}

impl Transaction {
    /// The amount with income positive and expense negative.
    pub fn signed_amount(&self) -> Amount {
        match self.kind {
            TransactionKind::Income => self.amount.abs(),
            TransactionKind::Expense => -self.amount.abs(),
        }
    }

    /// The category name, if the transaction has one.
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Zero-based month index (January is 0).
    pub fn month0(&self) -> u32 {
        self.date.month0()
    }
}

/// The fields needed to create a transaction. The owner is filled in by the backend client.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct NewTransaction {
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "valor")]
    pub amount: Amount,
    #[serde(rename = "tipo", with = "kind_tag")]
    pub kind: TransactionKind,
    #[serde(rename = "data", with = "timestamp")]
    pub date: NaiveDateTime,
    #[serde(rename = "categoria_id", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

/// Parses the timestamp formats the backend and users produce: RFC 3339 with an offset (converted
/// to local time, so a row lands in the month the user saw it in), `YYYY-MM-DDTHH:MM:SS[.fff]`,
/// `YYYY-MM-DD HH:MM:SS` and a bare date.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
        .with_context(|| format!("Unable to parse '{s}' as a date"))
}

/// Serde adapter for the stored type tag.
mod kind_tag {
    use super::TransactionKind;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(kind: &TransactionKind, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(kind.as_tag())
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<TransactionKind, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        TransactionKind::from_tag(&tag).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for timestamps.
mod timestamp {
    use super::parse_timestamp;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub(super) fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_timestamp(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_deserialize_backend_row() {
        let json = r##"{
            "id": "a1",
            "descricao": "Mercado",
            "valor": 87.43,
            "tipo": "gasto",
            "data": "2024-03-10T14:30:00+00:00",
            "user_id": "u1",
            "categoria": { "nome": "Alimentação", "cor": "#3b82f6" }
        }"##;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.kind, TransactionKind::Expense);
        assert_eq!(t.amount, Amount::from_str("87.43").unwrap());
        assert_eq!(t.category_name(), Some("Alimentação"));
        assert_eq!(t.year(), 2024);
        assert_eq!(t.month0(), 2);
        assert_eq!(t.owner.as_deref(), Some("u1"));
    }

    #[test]
    fn test_deserialize_without_category() {
        let json = r#"{"id":"b","descricao":"Salário","valor":"5000","tipo":"receita",
            "data":"2024-01-05","categoria":null}"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.kind, TransactionKind::Income);
        assert!(t.category.is_none());
        assert!(t.owner.is_none());
    }

    #[test]
    fn test_legacy_expense_tag() {
        assert_eq!(
            TransactionKind::from_tag("despesa").unwrap(),
            TransactionKind::Expense
        );
        assert!(TransactionKind::from_tag("transfer").is_err());
    }

    #[test]
    fn test_expense_written_as_stored_tag() {
        let new = NewTransaction {
            description: "Ônibus".to_string(),
            amount: Amount::from(5),
            kind: TransactionKind::Expense,
            date: parse_timestamp("2024-02-01").unwrap(),
            category_id: None,
        };
        let json = serde_json::to_value(&new).unwrap();
        assert_eq!(json["tipo"], "gasto");
        assert_eq!(json["data"], "2024-02-01T00:00:00");
        assert!(json.get("categoria_id").is_none());
    }

    #[test]
    fn test_signed_amount() {
        let mut t = Transaction {
            id: "x".to_string(),
            description: String::new(),
            amount: Amount::from(40),
            kind: TransactionKind::Expense,
            category: None,
            date: parse_timestamp("2024-03-10").unwrap(),
            owner: None,
        };
        assert_eq!(t.signed_amount(), Amount::from(-40));
        t.kind = TransactionKind::Income;
        assert_eq!(t.signed_amount(), Amount::from(40));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(parse_timestamp("2024-12-31T23:59:59").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-12-31 23:59:59").unwrap(), expected);
        assert!(parse_timestamp("31/12/2024").is_err());
    }

    #[test]
    fn test_parse_timestamp_with_offset_is_local() {
        let utc = "2024-12-31T23:30:00+00:00";
        let local = DateTime::parse_from_rfc3339(utc)
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(parse_timestamp(utc).unwrap(), local);
        assert_eq!(
            parse_timestamp("2025-01-01T02:30:00+03:00").unwrap(),
            local
        );
    }

    #[test]
    fn test_kind_display_and_parse() {
        assert_eq!(TransactionKind::Expense.to_string(), "expense");
        assert_eq!(
            TransactionKind::from_str("income").unwrap(),
            TransactionKind::Income
        );
    }
}
