//! This module is responsible for reading, writing and managing the SQLite database.

mod migrations;

use crate::model::{Amount, Day, Expense, ExpenseCategory, PaymentMethod, Ride, RideStatus};
use crate::store::Store;
use crate::Result;
use anyhow::{bail, Context};
use chrono::{DateTime, FixedOffset, NaiveDate};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, trace};

const DATE_FORMAT: &str = "%Y-%m-%d";

const RIDE_COLUMNS: &str =
    "id, date, amount, payment_method, status, note, recorded_at, paid_on_date";
const EXPENSE_COLUMNS: &str = "id, date, amount, category, note, recorded_at";

/// The SQLite record store. Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// - Validates that no file currently exists at `path`
    /// - Creates a new SQLite file at `path`
    /// - Creates the schema at the current version
    pub async fn init(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            bail!("A database already exists at {}", path.display());
        }
        let pool = connect(path, true).await?;
        migrations::bootstrap(&pool).await?;
        migrations::run(&pool, 0, migrations::CURRENT_VERSION).await?;
        debug!("Created database at {}", path.display());
        Ok(Self { pool })
    }

    /// - Validates that there is a SQLite file at `path`
    /// - Migrates the schema if it is older than the current version
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            bail!("The database file is missing '{}'", path.display());
        }
        let pool = connect(path, false).await?;
        let version = migrations::version(&pool).await?;
        if version > migrations::CURRENT_VERSION {
            bail!(
                "The database schema is at version {version}, which is newer than this program \
                supports ({}). Is a newer version of mototaxi available?",
                migrations::CURRENT_VERSION
            );
        }
        migrations::run(&pool, version, migrations::CURRENT_VERSION).await?;
        Ok(Self { pool })
    }

    /// Closes the pool. Every later query fails.
    pub(crate) async fn close(&self) {
        self.pool.close().await;
    }

    async fn rides_where(&self, clause: &str, value: &str) -> Result<Vec<Ride>> {
        let sql = format!("SELECT {RIDE_COLUMNS} FROM rides WHERE {clause} ORDER BY rowid");
        trace!("{sql} [{value}]");
        sqlx::query(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to query rides where {clause}"))?
            .iter()
            .map(ride_from_row)
            .collect()
    }
}

async fn connect(path: &Path, create: bool) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
        .context("Failed to parse SQLite connection string")?
        .create_if_missing(create);
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .with_context(|| format!("Unable to open SQLite database at {}", path.display()))
}

#[async_trait::async_trait]
impl Store for Db {
    async fn get_day(&self, date: NaiveDate) -> Result<Option<Day>> {
        let row = sqlx::query(
            "SELECT date, opening_cash, closed, savings_withdrawal FROM days WHERE date = ?",
        )
        .bind(date_text(date))
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to query the day {date}"))?;
        row.as_ref().map(day_from_row).transpose()
    }

    async fn put_day(&self, day: &Day) -> Result<()> {
        sqlx::query(
            "INSERT INTO days (date, opening_cash, closed, savings_withdrawal) VALUES (?, ?, ?, ?) \
            ON CONFLICT (date) DO UPDATE SET opening_cash = excluded.opening_cash, \
            closed = excluded.closed, savings_withdrawal = excluded.savings_withdrawal",
        )
        .bind(date_text(day.date()))
        .bind(day.opening_cash().value())
        .bind(day.is_closed())
        .bind(day.savings_withdrawal().value())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to save the day {}", day.date()))?;
        Ok(())
    }

    async fn get_ride(&self, id: &str) -> Result<Option<Ride>> {
        let sql = format!("SELECT {RIDE_COLUMNS} FROM rides WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to query ride {id}"))?;
        row.as_ref().map(ride_from_row).transpose()
    }

    async fn get_rides_by_date(&self, date: NaiveDate) -> Result<Vec<Ride>> {
        self.rides_where("date = ?", &date_text(date)).await
    }

    async fn get_rides_by_paid_on_date(&self, date: NaiveDate) -> Result<Vec<Ride>> {
        self.rides_where("paid_on_date = ?", &date_text(date)).await
    }

    async fn get_all_pending_credit_rides(&self) -> Result<Vec<Ride>> {
        // Served by idx_rides_method_status
        let sql = format!(
            "SELECT {RIDE_COLUMNS} FROM rides WHERE payment_method = ? AND status = ? ORDER BY rowid"
        );
        sqlx::query(&sql)
            .bind(PaymentMethod::Credit.to_string())
            .bind(RideStatus::Pending.to_string())
            .fetch_all(&self.pool)
            .await
            .context("Failed to query pending credit rides")?
            .iter()
            .map(ride_from_row)
            .collect()
    }

    async fn put_ride(&self, ride: &Ride) -> Result<()> {
        sqlx::query(
            "INSERT INTO rides \
            (id, date, amount, payment_method, status, note, recorded_at, paid_on_date) \
            VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
            ON CONFLICT (id) DO UPDATE SET date = excluded.date, amount = excluded.amount, \
            payment_method = excluded.payment_method, status = excluded.status, \
            note = excluded.note, recorded_at = excluded.recorded_at, \
            paid_on_date = excluded.paid_on_date",
        )
        .bind(ride.id())
        .bind(date_text(ride.date()))
        .bind(ride.amount().value())
        .bind(ride.payment_method().to_string())
        .bind(ride.status().to_string())
        .bind(ride.note())
        .bind(ride.recorded_at().to_rfc3339())
        .bind(ride.paid_on_date().map(date_text))
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to save ride {}", ride.id()))?;
        Ok(())
    }

    async fn get_expenses_by_date(&self, date: NaiveDate) -> Result<Vec<Expense>> {
        let sql = format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE date = ? ORDER BY rowid");
        sqlx::query(&sql)
            .bind(date_text(date))
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to query expenses for {date}"))?
            .iter()
            .map(expense_from_row)
            .collect()
    }

    async fn put_expense(&self, expense: &Expense) -> Result<()> {
        sqlx::query(
            "INSERT INTO expenses (id, date, amount, category, note, recorded_at) \
            VALUES (?, ?, ?, ?, ?, ?) \
            ON CONFLICT (id) DO UPDATE SET date = excluded.date, amount = excluded.amount, \
            category = excluded.category, note = excluded.note, \
            recorded_at = excluded.recorded_at",
        )
        .bind(expense.id())
        .bind(date_text(expense.date()))
        .bind(expense.amount().value())
        .bind(expense.category().to_string())
        .bind(expense.note())
        .bind(expense.recorded_at().to_rfc3339())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to save expense {}", expense.id()))?;
        Ok(())
    }
}

// =============================================================================
// Row conversion. A row that does not hold a complete, valid record is an error.
// =============================================================================

fn date_text(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(s: &str, column: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .with_context(|| format!("Invalid date '{s}' in column {column}"))
}

fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).with_context(|| format!("Invalid timestamp '{s}'"))
}

fn get<'r, T>(row: &'r SqliteRow, column: &str) -> Result<T>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column)
        .with_context(|| format!("Missing or invalid column {column}"))
}

fn parse_enum<T>(row: &SqliteRow, column: &str) -> Result<T>
where
    T: FromStr,
{
    let s: String = get(row, column)?;
    T::from_str(&s).map_err(|_| anyhow::anyhow!("Invalid value '{s}' in column {column}"))
}

fn day_from_row(row: &SqliteRow) -> Result<Day> {
    let date: String = get(row, "date")?;
    Ok(Day {
        date: parse_date(&date, "date")?,
        opening_cash: Amount::new(get(row, "opening_cash")?),
        closed: get(row, "closed")?,
        savings_withdrawal: Amount::new(get(row, "savings_withdrawal")?),
    })
}

fn ride_from_row(row: &SqliteRow) -> Result<Ride> {
    let id: String = get(row, "id")?;
    let date: String = get(row, "date")?;
    let recorded_at: String = get(row, "recorded_at")?;
    let paid_on_date: Option<String> = get(row, "paid_on_date")?;
    let ride = Ride {
        date: parse_date(&date, "date")?,
        amount: Amount::new(get(row, "amount")?),
        payment_method: parse_enum(row, "payment_method")?,
        status: parse_enum(row, "status")?,
        note: get(row, "note")?,
        recorded_at: parse_timestamp(&recorded_at)?,
        paid_on_date: paid_on_date
            .as_deref()
            .map(|d| parse_date(d, "paid_on_date"))
            .transpose()?,
        id,
    };
    check_ride(&ride)?;
    Ok(ride)
}

/// Rejects rides whose status and payment fields contradict each other.
fn check_ride(ride: &Ride) -> Result<()> {
    let consistent = match (ride.payment_method, ride.status, ride.paid_on_date) {
        (PaymentMethod::Credit, RideStatus::Pending, None) => true,
        (PaymentMethod::Credit, RideStatus::Paid, Some(_)) => true,
        (PaymentMethod::Cash | PaymentMethod::DigitalWallet, RideStatus::Paid, None) => true,
        _ => false,
    };
    if !consistent {
        bail!(
            "Ride {} has an inconsistent state: method {}, status {}, paid on {:?}",
            ride.id,
            ride.payment_method,
            ride.status,
            ride.paid_on_date
        );
    }
    Ok(())
}

fn expense_from_row(row: &SqliteRow) -> Result<Expense> {
    let date: String = get(row, "date")?;
    let recorded_at: String = get(row, "recorded_at")?;
    let category: ExpenseCategory = parse_enum(row, "category")?;
    Ok(Expense {
        id: get(row, "id")?,
        date: parse_date(&date, "date")?,
        amount: Amount::new(get(row, "amount")?),
        category,
        note: get(row, "note")?,
        recorded_at: parse_timestamp(&recorded_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ymd(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn at() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-10-17T14:30:00-04:00").unwrap()
    }

    async fn new_db() -> (TempDir, Db) {
        let dir = TempDir::new().unwrap();
        let db = Db::init(dir.path().join("mototaxi.sqlite")).await.unwrap();
        (dir, db)
    }

    #[tokio::test]
    async fn test_init_refuses_existing_file() {
        let (dir, _db) = new_db().await;
        assert!(Db::init(dir.path().join("mototaxi.sqlite")).await.is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        assert!(Db::load(dir.path().join("nope.sqlite")).await.is_err());
    }

    #[tokio::test]
    async fn test_data_survives_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mototaxi.sqlite");
        let day = Day::new(ymd(17), Amount::new(20000));
        {
            let db = Db::init(&path).await.unwrap();
            db.put_day(&day).await.unwrap();
            db.pool.close().await;
        }
        let db = Db::load(&path).await.unwrap();
        assert_eq!(db.get_day(ymd(17)).await.unwrap(), Some(day));
        assert!(db.get_day(ymd(18)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_day_upsert() {
        let (_dir, db) = new_db().await;
        let day = Day::new(ymd(17), Amount::new(20000));
        db.put_day(&day).await.unwrap();
        let closed = day.into_closed(Amount::new(5000));
        db.put_day(&closed).await.unwrap();
        assert_eq!(db.get_day(ymd(17)).await.unwrap(), Some(closed));
    }

    #[tokio::test]
    async fn test_ride_queries() {
        let (_dir, db) = new_db().await;
        let cash = Ride::new("r-1", ymd(17), Amount::new(5000), PaymentMethod::Cash, "", at());
        let mut credit = Ride::new(
            "r-2",
            ymd(17),
            Amount::new(3000),
            PaymentMethod::Credit,
            "Don Luis",
            at(),
        );
        db.put_ride(&cash).await.unwrap();
        db.put_ride(&credit).await.unwrap();

        assert_eq!(
            db.get_rides_by_date(ymd(17)).await.unwrap(),
            vec![cash.clone(), credit.clone()]
        );
        assert_eq!(
            db.get_all_pending_credit_rides().await.unwrap(),
            vec![credit.clone()]
        );

        credit.collect(ymd(18)).unwrap();
        db.put_ride(&credit).await.unwrap();

        assert!(db.get_all_pending_credit_rides().await.unwrap().is_empty());
        assert_eq!(
            db.get_rides_by_paid_on_date(ymd(18)).await.unwrap(),
            vec![credit.clone()]
        );
        // The upsert keeps the ride in its original position
        assert_eq!(
            db.get_rides_by_date(ymd(17)).await.unwrap(),
            vec![cash, credit.clone()]
        );
        assert_eq!(db.get_ride("r-2").await.unwrap(), Some(credit));
        assert!(db.get_ride("r-404").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expense_queries() {
        let (_dir, db) = new_db().await;
        let fuel = Expense::new(
            "e-1",
            ymd(17),
            Amount::new(2000),
            ExpenseCategory::Fuel,
            "",
            at(),
        );
        db.put_expense(&fuel).await.unwrap();
        assert_eq!(db.get_expenses_by_date(ymd(17)).await.unwrap(), vec![fuel]);
        assert!(db.get_expenses_by_date(ymd(18)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_row_is_an_error() {
        let (_dir, db) = new_db().await;
        sqlx::query(
            "INSERT INTO rides (id, date, amount, payment_method, status, note, recorded_at) \
            VALUES ('r-x', '2026-10-17', 100, 'fiada', 'pending', '', '2026-10-17T10:00:00-04:00')",
        )
        .execute(&db.pool)
        .await
        .unwrap();
        assert!(db.get_rides_by_date(ymd(17)).await.is_err());
    }

    #[tokio::test]
    async fn test_inconsistent_ride_is_an_error() {
        let (_dir, db) = new_db().await;
        sqlx::query(
            "INSERT INTO rides (id, date, amount, payment_method, status, note, recorded_at) \
            VALUES ('r-y', '2026-10-17', 100, 'cash', 'pending', '', '2026-10-17T10:00:00-04:00')",
        )
        .execute(&db.pool)
        .await
        .unwrap();
        assert!(db.get_ride("r-y").await.is_err());
    }
}
