use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    FromRow,
};
use std::{str::FromStr, time::Duration as StdDuration};
use time::{format_description::BorrowedFormatItem, macros::format_description, Date, Duration};
use utoipa::ToSchema;

/// Station assumed to hold the most observation rows in the dataset.
/// Asserted by the dataset authors, never computed at request time.
pub const MOST_ACTIVE_STATION: &str = "USC00519281";

/// Observation dates are stored as ISO `YYYY-MM-DD` strings, so
/// lexicographic comparisons in SQL match calendar order.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query sqlite: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Failed to format date string: {0}")]
    DateFormat(#[from] time::error::Format),
    #[error("Failed to parse date string: {0}")]
    DateParse(#[from] time::error::Parse),
}

/// A row of the station directory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Station {
    pub station: String,
    pub name: String,
}

/// One dated temperature observation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tobs {
    pub date: String,
    pub tobs: f64,
}

/// One dated precipitation reading. `prcp` is nullable in the dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PrecipReading {
    pub date: String,
    pub prcp: Option<f64>,
}

/// Temperature statistics over a date range. All three fields are null
/// when zero rows matched the range, which is a valid result.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TempStats {
    #[serde(rename = "TMIN")]
    pub tmin: Option<f64>,
    #[serde(rename = "TAVG")]
    pub tavg: Option<f64>,
    #[serde(rename = "TMAX")]
    pub tmax: Option<f64>,
}

/// Start of the trailing-year window anchored at `anchor`.
///
/// Calendar-exact subtraction: `time::Date` arithmetic steps whole
/// calendar days, so leap days and timezone boundaries cannot skew the
/// window.
pub fn trailing_year_start(anchor: Date) -> Date {
    anchor - Duration::days(365)
}

#[async_trait]
pub trait ClimateData: Send + Sync {
    /// Maximum observation date across all measurement rows, `None` when
    /// the table is empty. Anchors the trailing-year queries.
    async fn latest_date(&self) -> Result<Option<Date>, Error>;
    /// `(date, prcp)` rows with `date >= start`.
    async fn precipitation_since(&self, start: Date) -> Result<Vec<PrecipReading>, Error>;
    /// The full station directory.
    async fn stations(&self) -> Result<Vec<Station>, Error>;
    /// `(date, tobs)` rows for one station with `date >= start`.
    async fn station_observations(
        &self,
        station_id: &str,
        start: Date,
    ) -> Result<Vec<Tobs>, Error>;
    /// Min/avg/max temperature over `date >= start`, bounded above by
    /// `end` inclusive when given.
    async fn temperature_stats(&self, start: Date, end: Option<Date>)
        -> Result<TempStats, Error>;
}

pub struct ClimateStore {
    pool: SqlitePool,
}

impl ClimateStore {
    /// Open a read-only pool against the pre-populated dataset. Every
    /// query acquires a pooled connection and releases it on return, so
    /// no request holds a long-lived shared handle.
    pub async fn new(path: &str) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .read_only(true)
            .pragma("busy_timeout", "5000")
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "MEMORY");

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(StdDuration::from_secs(30))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Check database connectivity before serving requests.
    pub async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ClimateData for ClimateStore {
    async fn latest_date(&self) -> Result<Option<Date>, Error> {
        // MAX over an empty table yields NULL rather than no row
        let row: (Option<String>,) = sqlx::query_as("SELECT MAX(date) FROM measurement")
            .fetch_one(&self.pool)
            .await?;

        row.0
            .map(|raw| Date::parse(&raw, DATE_FORMAT))
            .transpose()
            .map_err(Error::from)
    }

    async fn precipitation_since(&self, start: Date) -> Result<Vec<PrecipReading>, Error> {
        let start = start.format(DATE_FORMAT)?;
        let readings = sqlx::query_as::<_, PrecipReading>(
            "SELECT date, prcp FROM measurement WHERE date >= ? ORDER BY date",
        )
        .bind(&start)
        .fetch_all(&self.pool)
        .await?;

        Ok(readings)
    }

    async fn stations(&self) -> Result<Vec<Station>, Error> {
        let stations =
            sqlx::query_as::<_, Station>("SELECT station, name FROM station ORDER BY station")
                .fetch_all(&self.pool)
                .await?;

        Ok(stations)
    }

    async fn station_observations(
        &self,
        station_id: &str,
        start: Date,
    ) -> Result<Vec<Tobs>, Error> {
        let start = start.format(DATE_FORMAT)?;
        let observations = sqlx::query_as::<_, Tobs>(
            "SELECT date, tobs FROM measurement WHERE station = ? AND date >= ? ORDER BY date",
        )
        .bind(station_id)
        .bind(&start)
        .fetch_all(&self.pool)
        .await?;

        Ok(observations)
    }

    async fn temperature_stats(
        &self,
        start: Date,
        end: Option<Date>,
    ) -> Result<TempStats, Error> {
        let start = start.format(DATE_FORMAT)?;

        let row: (Option<f64>, Option<f64>, Option<f64>) = match end {
            Some(end) => {
                let end = end.format(DATE_FORMAT)?;
                sqlx::query_as(
                    "SELECT MIN(tobs), AVG(tobs), MAX(tobs) FROM measurement
                     WHERE date >= ? AND date <= ?",
                )
                .bind(&start)
                .bind(&end)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as("SELECT MIN(tobs), AVG(tobs), MAX(tobs) FROM measurement WHERE date >= ?")
                    .bind(&start)
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(TempStats {
            tmin: row.0,
            tavg: row.1,
            tmax: row.2,
        })
    }
}
