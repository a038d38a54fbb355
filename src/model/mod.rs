//! Types that represent the core data model, such as `Transaction` and `Category`.
mod amount;
mod category;
mod style;
mod transaction;

pub use amount::{Amount, AmountError};
pub use category::{Category, CategoryKind, NewCategory};
pub use style::{category_style, CategoryStyle, DEFAULT_STYLE, UNCATEGORIZED};
pub use transaction::{parse_timestamp, CategoryRef, NewTransaction, Transaction, TransactionKind};
