//! These structs provide the CLI interface for the mototaxi CLI.

use crate::clock::parse_date;
use crate::ledger::RecordFilter;
use crate::model::{Amount, ExpenseCategory, PaymentMethod};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing::level_filters::LevelFilter;

/// mototaxi: A daily cash ledger for motorcycle-taxi drivers.
///
/// Start the day with the cash you carry, record rides and expenses as they happen, collect
/// rides that were given on credit ("fiadas") whenever the customer pays, and close the day to
/// see what you made and how much goes to savings.
///
/// Amounts are whole pesos and may be written as 4000, 4.000 or $4.000.
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
    /// Create the data directory, the config file and the ledger database.
    ///
    /// This is the first command you should run. By default the data lives in $HOME/mototaxi;
    /// pass --mototaxi-home to put it somewhere else.
    Init(InitArgs),
    /// Start the day with the cash you are carrying.
    Start(StartArgs),
    /// Record a ride.
    Ride(RideArgs),
    /// Record an expense.
    Expense(ExpenseArgs),
    /// Mark a ride given on credit as paid today.
    Collect(CollectArgs),
    /// Show the cash summary of the day.
    Summary(DateArgs),
    /// List every ride given on credit that has not been paid, from any day.
    Outstanding,
    /// List the rides, collections and expenses of the day.
    Records(RecordsArgs),
    /// Close the day and record how much goes to savings.
    Close(CloseArgs),
    /// Evaluate an arithmetic expression, e.g. "(3000 + 4500) * 2".
    Calc(CalcArgs),
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

    /// The directory where the ledger and configuration are held. Defaults to ~/mototaxi
    #[arg(long, env = "MOTOTAXI_HOME", default_value_t = default_mototaxi_home())]
    mototaxi_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, mototaxi_home: PathBuf) -> Self {
        Self {
            log_level,
            mototaxi_home: mototaxi_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn mototaxi_home(&self) -> &DisplayPath {
        &self.mototaxi_home
    }
}

/// Selects the business date. Defaults to today in the configured timezone.
#[derive(Debug, Default, Parser, Clone)]
pub struct DateArgs {
    /// The date to act on, as YYYY-MM-DD. Defaults to today.
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
}

impl DateArgs {
    pub fn new(date: Option<NaiveDate>) -> Self {
        Self { date }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

/// Args for the `mototaxi init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The IANA timezone the business day is counted in. Defaults to America/Caracas.
    #[arg(long)]
    timezone: Option<String>,
}

impl InitArgs {
    pub fn new(timezone: Option<String>) -> Self {
        Self { timezone }
    }

    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }
}

/// Args for the `mototaxi start` command.
#[derive(Debug, Parser, Clone)]
pub struct StartArgs {
    /// The cash you start the day with. Must be greater than zero.
    #[arg(long)]
    opening_cash: Amount,

    #[clap(flatten)]
    date: DateArgs,
}

impl StartArgs {
    pub fn new(opening_cash: Amount, date: DateArgs) -> Self {
        Self { opening_cash, date }
    }

    pub fn opening_cash(&self) -> Amount {
        self.opening_cash
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date.date()
    }
}

/// Args for the `mototaxi ride` command.
#[derive(Debug, Parser, Clone)]
pub struct RideArgs {
    /// The fare.
    amount: Amount,

    /// How the ride was paid. A credit ride is income only once it is collected.
    #[arg(long, value_enum)]
    method: Option<PaymentMethod>,

    /// Free text, e.g. the customer's name or the destination.
    #[arg(long)]
    note: Option<String>,

    #[clap(flatten)]
    date: DateArgs,
}

impl RideArgs {
    pub fn new(
        amount: Amount,
        method: Option<PaymentMethod>,
        note: Option<String>,
        date: DateArgs,
    ) -> Self {
        Self {
            amount,
            method,
            note,
            date,
        }
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn method(&self) -> Option<PaymentMethod> {
        self.method
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date.date()
    }
}

/// Args for the `mototaxi expense` command.
#[derive(Debug, Parser, Clone)]
pub struct ExpenseArgs {
    /// The amount spent.
    amount: Amount,

    #[arg(long, value_enum)]
    category: Option<ExpenseCategory>,

    #[arg(long)]
    note: Option<String>,

    #[clap(flatten)]
    date: DateArgs,
}

impl ExpenseArgs {
    pub fn new(
        amount: Amount,
        category: Option<ExpenseCategory>,
        note: Option<String>,
        date: DateArgs,
    ) -> Self {
        Self {
            amount,
            category,
            note,
            date,
        }
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> Option<ExpenseCategory> {
        self.category
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date.date()
    }
}

/// Args for the `mototaxi collect` command.
#[derive(Debug, Parser, Clone)]
pub struct CollectArgs {
    /// The id of the credit ride, as shown by `mototaxi outstanding`.
    ride_id: String,

    /// The date the money was received. Defaults to today.
    #[clap(flatten)]
    date: DateArgs,
}

impl CollectArgs {
    pub fn new(ride_id: impl Into<String>, date: DateArgs) -> Self {
        Self {
            ride_id: ride_id.into(),
            date,
        }
    }

    pub fn ride_id(&self) -> &str {
        &self.ride_id
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date.date()
    }
}

/// Args for the `mototaxi records` command.
#[derive(Debug, Parser, Clone)]
pub struct RecordsArgs {
    #[arg(long, value_enum, default_value_t = RecordFilter::All)]
    filter: RecordFilter,

    #[clap(flatten)]
    date: DateArgs,
}

impl RecordsArgs {
    pub fn new(filter: RecordFilter, date: DateArgs) -> Self {
        Self { filter, date }
    }

    pub fn filter(&self) -> RecordFilter {
        self.filter
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date.date()
    }
}

/// Args for the `mototaxi close` command.
#[derive(Debug, Parser, Clone)]
pub struct CloseArgs {
    /// The amount set aside as savings. Anything that is not a whole, non-negative amount is
    /// recorded as 0.
    #[arg(long)]
    savings: Option<String>,

    #[clap(flatten)]
    date: DateArgs,
}

impl CloseArgs {
    pub fn new(savings: Option<String>, date: DateArgs) -> Self {
        Self { savings, date }
    }

    pub fn savings(&self) -> Option<&str> {
        self.savings.as_deref()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date.date()
    }
}

/// Args for the `mototaxi calc` command.
#[derive(Debug, Parser, Clone)]
pub struct CalcArgs {
    /// The expression. Supports + - * / and parentheses.
    expression: String,
}

impl CalcArgs {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }
}

fn default_mototaxi_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("mototaxi"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --mototaxi-home or MOTOTAXI_HOME instead of relying on the \
                default home directory.",
            );
            PathBuf::from("mototaxi")
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

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["mototaxi", "--mototaxi-home", "/tmp/mototaxi-test"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_ride_args() {
        let args = parse(&["ride", "$4.000", "--method", "digital-wallet", "--note", "Centro"]);
        let Command::Ride(ride) = args.command() else {
            panic!("expected the ride subcommand");
        };
        assert_eq!(ride.amount(), Amount::new(4000));
        assert_eq!(ride.method(), Some(PaymentMethod::DigitalWallet));
        assert_eq!(ride.note(), Some("Centro"));
        assert!(ride.date().is_none());
        assert_eq!(args.common().mototaxi_home().path(), Path::new("/tmp/mototaxi-test"));
        assert_eq!(args.common().log_level(), LevelFilter::INFO);
    }

    #[test]
    fn test_date_override() {
        let args = parse(&["summary", "--date", "2026-10-17"]);
        let Command::Summary(date) = args.command() else {
            panic!("expected the summary subcommand");
        };
        assert_eq!(date.date(), NaiveDate::from_ymd_opt(2026, 10, 17));
    }

    #[test]
    fn test_bad_inputs_are_rejected() {
        let base = ["mototaxi", "--mototaxi-home", "/tmp/x"];
        let with = |extra: &[&'static str]| {
            let mut argv = base.to_vec();
            argv.extend_from_slice(extra);
            Args::try_parse_from(argv)
        };
        assert!(with(&["ride", "40.50", "--method", "cash"]).is_err());
        assert!(with(&["ride", "4000", "--method", "fiada"]).is_err());
        assert!(with(&["summary", "--date", "17/10/2026"]).is_err());
        assert!(with(&["start"]).is_err());
    }

    #[test]
    fn test_records_filter_default() {
        let args = parse(&["records"]);
        let Command::Records(records) = args.command() else {
            panic!("expected the records subcommand");
        };
        assert_eq!(records.filter(), RecordFilter::All);
    }
}
