//! These structs provide the CLI interface for the finboard CLI.

use crate::dashboard::MonthIndex;
use crate::model::{Amount, CategoryKind, TransactionKind};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// finboard: A command-line client for your personal finance tracker.
///
/// Your transactions and categories live in a hosted backend. finboard signs in to it, lists and
/// edits your data, and shows a dashboard for a selected year that you can narrow down by month,
/// by income or expense, and by category.
///
/// Set FINBOARD_IN_TEST_MODE to any non-empty value to use an offline backend seeded with sample
/// data instead of the hosted one.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and its configuration file.
    ///
    /// This is the first command you should run. You need the URL of your backend project and
    /// its public (anon) key.
    Init(InitArgs),
    /// Sign in with your email and password. The session is saved in the home directory.
    Login(LoginArgs),
    /// Show the dashboard for a year, optionally narrowed down by filters.
    Dashboard(DashboardArgs),
    /// List, create or delete transactions.
    #[command(subcommand)]
    Transactions(TransactionsSubcommand),
    /// List, create or delete categories.
    #[command(subcommand)]
    Categories(CategoriesSubcommand),
    /// Show the all-time balance.
    Balance,
    /// Show the most recent transactions.
    Recent(RecentArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where finboard configuration and session data is held. Defaults to
    /// ~/finboard
    #[arg(long, env = "FINBOARD_HOME", default_value_t = default_finboard_home())]
    finboard_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, finboard_home: PathBuf) -> Self {
        Self {
            log_level,
            finboard_home: finboard_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn finboard_home(&self) -> &DisplayPath {
        &self.finboard_home
    }
}

/// Args for the `finboard init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The base URL of your backend project, e.g. https://abcdefgh.supabase.co
    #[arg(long)]
    backend_url: String,

    /// The public (anon) key of your backend project.
    #[arg(long, env = "FINBOARD_ANON_KEY")]
    anon_key: String,
}

impl InitArgs {
    pub fn new(backend_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            anon_key: anon_key.into(),
        }
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }
}

/// Args for the `finboard login` command.
#[derive(Debug, Parser, Clone)]
pub struct LoginArgs {
    #[arg(long)]
    email: String,

    /// Your password. Prefer passing it through FINBOARD_PASSWORD.
    #[arg(long, env = "FINBOARD_PASSWORD", hide_env_values = true)]
    password: String,
}

impl LoginArgs {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Which part of the dashboard to show.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DashboardView {
    /// Totals, the monthly trend and the expense breakdown together.
    #[default]
    Overview,
    /// Income and expense for each month of the year.
    Months,
    /// The filtered transactions.
    List,
    /// Expenses grouped by category.
    Categories,
    /// Income, expense and balance of the filtered transactions.
    Summary,
}

serde_plain::derive_display_from_serialize!(DashboardView);
serde_plain::derive_fromstr_from_deserialize!(DashboardView);

/// Args for the `finboard dashboard` command.
///
/// Filters combine the way the dashboard's filter panel does: months, kinds and categories each
/// narrow the view, and a chart month replaces the month selection.
#[derive(Debug, Parser, Clone, Default)]
pub struct DashboardArgs {
    /// The year to show. Defaults to the current year.
    #[arg(long)]
    pub year: Option<i32>,

    /// Only show these months, 1 through 12. Can be repeated.
    #[arg(long = "month", value_parser = parse_month)]
    pub months: Vec<MonthIndex>,

    /// Only show these kinds: income or expense. Can be repeated.
    #[arg(long = "kind")]
    pub kinds: Vec<TransactionKind>,

    /// Only show these categories. Can be repeated.
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// A single month as YYYY-MM that takes the place of --month, as when clicking a bar of the
    /// trend chart.
    #[arg(long, value_parser = parse_year_month)]
    pub chart_month: Option<NaiveDate>,

    /// A single category that is added to --category, as when clicking a slice of the category
    /// chart.
    #[arg(long)]
    pub chart_category: Option<String>,

    #[arg(long, value_enum, default_value_t = DashboardView::Overview)]
    pub view: DashboardView,
}

impl DashboardArgs {
    /// The selected year, or the current year when none was given.
    pub fn year(&self) -> i32 {
        self.year.unwrap_or_else(|| Local::now().year())
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum TransactionsSubcommand {
    /// List the transactions of a year, newest first.
    List(ListTransactionsArgs),
    /// Create a transaction.
    Insert(InsertTransactionArgs),
    /// Delete a transaction by ID.
    Delete(DeleteArgs),
}

#[derive(Subcommand, Debug, Clone)]
pub enum CategoriesSubcommand {
    /// List all categories by name.
    List,
    /// Create a category.
    Insert(InsertCategoryArgs),
    /// Delete a category by ID.
    Delete(DeleteArgs),
}

/// Args for `finboard transactions list`.
#[derive(Debug, Parser, Clone, Default)]
pub struct ListTransactionsArgs {
    /// The year to list. Defaults to the current year.
    #[arg(long)]
    pub year: Option<i32>,
}

impl ListTransactionsArgs {
    pub fn year(&self) -> i32 {
        self.year.unwrap_or_else(|| Local::now().year())
    }
}

/// Args for `finboard transactions insert`.
#[derive(Debug, Parser, Clone)]
pub struct InsertTransactionArgs {
    #[arg(long)]
    pub description: String,

    /// The amount without sign, e.g. 1234.56, 1.234,56 or "R$ 12,50".
    #[arg(long)]
    pub amount: Amount,

    /// income or expense
    #[arg(long)]
    pub kind: TransactionKind,

    /// The date as YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS. Defaults to now.
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDateTime>,

    /// The ID of the category to file this under.
    #[arg(long)]
    pub category_id: Option<String>,
}

/// Args for `finboard categories insert`.
#[derive(Debug, Parser, Clone)]
pub struct InsertCategoryArgs {
    #[arg(long)]
    pub name: String,

    /// income, expense or both
    #[arg(long, default_value_t = CategoryKind::Expense)]
    pub kind: CategoryKind,

    /// The display color, e.g. #3b82f6. Defaults to the built-in color for the name.
    #[arg(long)]
    pub color: Option<String>,

    /// An icon name.
    #[arg(long)]
    pub icon: Option<String>,
}

/// Args for the delete subcommands.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    #[arg(long)]
    pub id: String,
}

/// Args for `finboard recent`.
#[derive(Debug, Parser, Clone)]
pub struct RecentArgs {
    /// How many transactions to show.
    #[arg(long, default_value_t = 5)]
    pub limit: usize,
}

impl Default for RecentArgs {
    fn default() -> Self {
        Self { limit: 5 }
    }
}

fn parse_month(s: &str) -> std::result::Result<MonthIndex, String> {
    let n: u32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a month number"))?;
    if !(1..=12).contains(&n) {
        return Err(format!("Month {n} is not between 1 and 12"));
    }
    MonthIndex::new(n - 1).map_err(|e| e.to_string())
}

fn parse_year_month(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
        .map_err(|_| format!("'{s}' is not a month in the form YYYY-MM"))
}

fn parse_date(s: &str) -> std::result::Result<NaiveDateTime, String> {
    crate::model::parse_timestamp(s).map_err(|e| e.to_string())
}

fn default_finboard_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("finboard"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --finboard-home or FINBOARD_HOME instead of relying on the \
                default finboard home directory.",
            );
            PathBuf::from("finboard")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
