//! These structs provide the CLI interface for the dompet CLI.

use crate::model::{parse_date, Amount, TransactionType};
use crate::report::TransactionFilter;
use crate::store::StoreBackend;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// dompet: A command-line budget tracker.
///
/// Record income and expenses one at a time or as quick bulk text such as `kopi,15k` or
/// `cicilan motor,1.2jt`. Descriptions are sorted into categories by keyword, and budget targets
/// track how much of their ceiling has been spent, raising an alert at 80% and at 100%.
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
    /// Create the data directory, the configuration file and an empty store.
    ///
    /// This is the first command you should run. By default the data directory is $HOME/dompet,
    /// pass --dompet-home or set DOMPET_HOME to put it somewhere else. The three default targets
    /// (Ortu, Tabungan and Cicilan) are created the first time the budget is opened.
    Init(InitArgs),
    /// Add a transaction, a batch of expenses or a target.
    Insert(InsertArgs),
    /// Change a target's ceiling or keywords.
    Update(UpdateArgs),
    /// Delete transactions or targets. A backup is written first.
    Delete(DeleteArgs),
    /// List transactions, newest first.
    List(FilterArgs),
    /// Totals, the weekly series and target progress.
    Report(ReportArgs),
    /// Show the current target alerts.
    Alerts,
    /// Show which category a description would be filed under.
    Classify(ClassifyArgs),
    /// Write transactions as CSV.
    Export(ExportArgs),
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

    /// The directory where dompet data and configuration is held. Defaults to ~/dompet
    #[arg(long, env = "DOMPET_HOME", default_value_t = default_dompet_home())]
    dompet_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, dompet_home: PathBuf) -> Self {
        Self {
            log_level,
            dompet_home: dompet_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn dompet_home(&self) -> &DisplayPath {
        &self.dompet_home
    }
}

/// (Not shown): Args for the `dompet init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// Where transactions and targets are kept.
    #[arg(long, value_enum, default_value_t = StoreBackend::Sqlite)]
    store: StoreBackend,
}

impl InitArgs {
    pub fn new(store: StoreBackend) -> Self {
        Self { store }
    }

    pub fn store(&self) -> StoreBackend {
        self.store
    }
}

/// (Not shown): Args for the `dompet insert` command.
#[derive(Debug, Parser, Clone)]
pub struct InsertArgs {
    #[command(subcommand)]
    entity: InsertSubcommand,
}

impl InsertArgs {
    pub fn entity(&self) -> &InsertSubcommand {
        &self.entity
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum InsertSubcommand {
    /// Add a single income or expense.
    ///
    /// When --category is left out, an expense is categorized by keyword and an income is filed
    /// under Lainnya.
    Transaction(InsertTransactionArgs),
    /// Add several expenses from lines of `description,amount`.
    ///
    /// The text is taken from the argument, from --file, or from stdin. Amounts accept the
    /// shorthands `k` (thousand) and `jt`/`juta` (million). Lines that cannot be read are
    /// skipped. Every expense is dated today.
    Bulk(InsertBulkArgs),
    /// Add a budget target. Its keywords are the words of its name.
    Target(InsertTargetArgs),
}

/// (Not shown): Args for the `dompet insert transaction` command.
#[derive(Debug, Parser, Clone)]
pub struct InsertTransactionArgs {
    /// What the money was for, e.g. "makan siang".
    #[arg(long)]
    pub description: String,

    /// The amount, e.g. 25000, 25k or 1.5jt.
    #[arg(long)]
    pub amount: Amount,

    #[arg(long = "type", value_enum, default_value_t = TransactionType::Expense)]
    pub r#type: TransactionType,

    /// One of the known categories for the type, or a target name for an expense.
    #[arg(long)]
    pub category: Option<String>,

    /// DD/MM/YYYY or YYYY-MM-DD. Defaults to today.
    #[arg(long, value_parser = date_arg)]
    pub date: Option<NaiveDate>,
}

/// (Not shown): Args for the `dompet insert bulk` command.
#[derive(Debug, Parser, Clone)]
pub struct InsertBulkArgs {
    /// Lines of `description,amount`.
    #[arg(conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the lines from a file instead.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

/// (Not shown): Args for the `dompet insert target` command.
#[derive(Debug, Parser, Clone)]
pub struct InsertTargetArgs {
    #[arg(long)]
    pub name: String,

    /// The ceiling, e.g. 2jt.
    #[arg(long)]
    pub amount: Amount,
}

/// (Not shown): Args for the `dompet update` command.
#[derive(Debug, Parser, Clone)]
pub struct UpdateArgs {
    #[command(subcommand)]
    entity: UpdateSubcommand,
}

impl UpdateArgs {
    pub fn entity(&self) -> &UpdateSubcommand {
        &self.entity
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum UpdateSubcommand {
    /// Change a target's ceiling and/or keywords.
    Target(UpdateTargetArgs),
}

/// (Not shown): Args for the `dompet update target` command.
#[derive(Debug, Parser, Clone)]
pub struct UpdateTargetArgs {
    /// The target's id.
    pub id: String,

    /// The new ceiling.
    #[arg(long)]
    pub amount: Option<Amount>,

    /// The complete new keyword list, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub keywords: Option<Vec<String>>,
}

/// (Not shown): Args for the `dompet delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    #[command(subcommand)]
    entity: DeleteSubcommand,
}

impl DeleteArgs {
    pub fn entity(&self) -> &DeleteSubcommand {
        &self.entity
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum DeleteSubcommand {
    /// Delete transactions by id. Nothing is deleted if any id is unknown.
    Transactions(DeleteIdsArgs),
    /// Delete targets by id. Nothing is deleted if any id is unknown.
    Targets(DeleteIdsArgs),
}

/// (Not shown): Args for the `dompet delete` subcommands.
#[derive(Debug, Parser, Clone)]
pub struct DeleteIdsArgs {
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<String>,
}

/// (Not shown): Filters shared by `list`, `report summary` and `export`.
#[derive(Debug, Default, Parser, Clone)]
pub struct FilterArgs {
    /// Earliest date to include, DD/MM/YYYY or YYYY-MM-DD.
    #[arg(long, value_parser = date_arg)]
    pub start: Option<NaiveDate>,

    /// Latest date to include, DD/MM/YYYY or YYYY-MM-DD.
    #[arg(long, value_parser = date_arg)]
    pub end: Option<NaiveDate>,

    /// Text to look for in the description or category, ignoring case.
    #[arg(long)]
    pub query: Option<String>,

    /// Only this exact category.
    #[arg(long)]
    pub category: Option<String>,
}

impl From<FilterArgs> for TransactionFilter {
    fn from(args: FilterArgs) -> Self {
        TransactionFilter {
            start: args.start,
            end: args.end,
            query: args.query,
            category: args.category,
        }
    }
}

/// (Not shown): Args for the `dompet report` command.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    #[command(subcommand)]
    kind: ReportSubcommand,
}

impl ReportArgs {
    pub fn kind(&self) -> &ReportSubcommand {
        &self.kind
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ReportSubcommand {
    /// Income, expense, balance and expense per category.
    Summary(FilterArgs),
    /// Income and expense per day for a seven day window.
    Weekly(WeeklyArgs),
    /// Spending against each target.
    Targets,
}

/// (Not shown): Args for the `dompet report weekly` command.
#[derive(Debug, Parser, Clone)]
pub struct WeeklyArgs {
    /// How many weeks back from the week ending today.
    #[arg(long, default_value_t = 0)]
    pub offset: u32,
}

/// (Not shown): Args for the `dompet classify` command.
#[derive(Debug, Parser, Clone)]
pub struct ClassifyArgs {
    pub description: String,
}

/// (Not shown): Args for the `dompet export` command.
#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    /// Write to this file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,

    #[clap(flatten)]
    pub filter: FilterArgs,
}

fn date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("'{s}' is not a DD/MM/YYYY or YYYY-MM-DD date"))
}

fn default_dompet_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("dompet"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --dompet-home or DOMPET_HOME instead of relying on the default \
                dompet home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("dompet")
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
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
