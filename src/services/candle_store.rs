//! SQLite persistence for OHLCV candles.
//!
//! Candles are append-only: a store call only inserts rows strictly newer
//! than the latest stored timestamp, so the table stays ordered and free of
//! duplicates. Each operation opens its own connection and drops it before
//! returning.
//!
//! Timestamps are written in one canonical text form (see
//! [`TIMESTAMP_FORMAT`](crate::types::TIMESTAMP_FORMAT)). Rows written by
//! older tools in other forms are rewritten to it before each store, and
//! reads order by the parsed value rather than the stored text.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::types::{format_timestamp, parse_timestamp, Candle};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// SQLite store for one candle table.
#[derive(Debug, Clone)]
pub struct CandleStore {
    path: PathBuf,
    table: String,
}

impl CandleStore {
    /// Create a store for `table` inside the database at `path`.
    ///
    /// The table name is interpolated into SQL, so only plain identifiers
    /// are accepted.
    pub fn new<P: AsRef<Path>>(path: P, table: &str) -> Result<Self> {
        if !is_valid_identifier(table) {
            return Err(AppError::InvalidTable(table.to_string()));
        }

        Ok(Self {
            path: path.as_ref().to_path_buf(),
            table: table.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.database_path, &config.price_table)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn open(&self) -> Result<Connection> {
        Ok(Connection::open(&self.path)?)
    }

    /// Create the candle table and its timestamp index if absent.
    fn init_schema(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    timestamp TEXT PRIMARY KEY,
                    open REAL,
                    high REAL,
                    low REAL,
                    close REAL,
                    volume REAL
                )",
                self.table
            ),
            [],
        )?;

        conn.execute(
            &format!(
                "CREATE INDEX IF NOT EXISTS idx_{0}_timestamp ON {0}(timestamp)",
                self.table
            ),
            [],
        )?;

        Ok(())
    }

    fn table_exists(&self, conn: &Connection) -> Result<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![self.table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Every stored timestamp as (stored text, parsed value).
    fn stored_timestamps(&self, conn: &Connection) -> Result<Vec<(String, NaiveDateTime)>> {
        let mut stmt = conn.prepare(&format!("SELECT timestamp FROM {}", self.table))?;
        let raw = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        raw.into_iter()
            .map(|s| match parse_timestamp(&s) {
                Some(ts) => Ok((s, ts)),
                None => Err(AppError::Timestamp(s)),
            })
            .collect()
    }

    /// Latest timestamp by parsed value, so mixed text forms compare correctly.
    fn max_timestamp(&self, conn: &Connection) -> Result<Option<NaiveDateTime>> {
        Ok(self
            .stored_timestamps(conn)?
            .into_iter()
            .map(|(_, ts)| ts)
            .max())
    }

    /// Rewrite non-canonical stored timestamps to the canonical encoding.
    ///
    /// A legacy row whose canonical form already exists replaces that row.
    fn normalize_timestamps(&self, conn: &mut Connection) -> Result<usize> {
        let legacy: Vec<(String, String)> = self
            .stored_timestamps(conn)?
            .into_iter()
            .filter_map(|(raw, ts)| {
                let canonical = format_timestamp(&ts);
                (raw != canonical).then_some((raw, canonical))
            })
            .collect();

        if legacy.is_empty() {
            return Ok(0);
        }

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "UPDATE OR REPLACE {} SET timestamp = ?1 WHERE timestamp = ?2",
                self.table
            ))?;
            for (raw, canonical) in &legacy {
                stmt.execute(params![canonical, raw])?;
            }
        }
        tx.commit()?;

        info!(
            "Rewrote {} legacy timestamps in {}",
            legacy.len(),
            self.table
        );
        Ok(legacy.len())
    }

    /// Append candles newer than anything already stored.
    ///
    /// Returns the number of rows inserted. Empty input returns 0 without
    /// opening the database.
    pub fn store(&self, candles: &[Candle]) -> Result<usize> {
        if candles.is_empty() {
            info!("No candles to store");
            return Ok(0);
        }

        let mut conn = self.open()?;
        self.init_schema(&conn)?;
        self.normalize_timestamps(&mut conn)?;

        // Compare on the encoded key: it is what the primary key sees
        let latest = self.max_timestamp(&conn)?.map(|ts| format_timestamp(&ts));
        let mut fresh: Vec<(String, &Candle)> = candles
            .iter()
            .map(|c| (format_timestamp(&c.timestamp), c))
            .filter(|(key, _)| latest.as_ref().map_or(true, |max| key > max))
            .collect();
        fresh.sort_by(|a, b| a.0.cmp(&b.0));
        fresh.dedup_by(|a, b| a.0 == b.0);

        if fresh.is_empty() {
            info!("No new data to insert into {}", self.table);
            return Ok(0);
        }

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} (timestamp, open, high, low, close, volume)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                self.table
            ))?;

            for (key, candle) in &fresh {
                stmt.execute(params![
                    key,
                    candle.open,
                    candle.high,
                    candle.low,
                    candle.close,
                    candle.volume,
                ])?;
            }
        }
        tx.commit()?;

        info!("Inserted {} new rows into {}", fresh.len(), self.table);
        Ok(fresh.len())
    }

    /// Latest stored timestamp, or `None` if the table is empty or missing.
    pub fn latest_timestamp(&self) -> Result<Option<NaiveDateTime>> {
        let conn = self.open()?;
        if !self.table_exists(&conn)? {
            return Ok(None);
        }
        self.max_timestamp(&conn)
    }

    /// All stored candles in ascending timestamp order.
    pub fn load_all(&self) -> Result<Vec<Candle>> {
        let conn = self.open()?;
        if !self.table_exists(&conn)? {
            debug!("Table {} does not exist yet", self.table);
            return Ok(Vec::new());
        }

        let mut stmt = conn.prepare(&format!(
            "SELECT timestamp, open, high, low, close, volume FROM {}",
            self.table
        ))?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<f64>>(1)?,
                row.get::<_, Option<f64>>(2)?,
                row.get::<_, Option<f64>>(3)?,
                row.get::<_, Option<f64>>(4)?,
                row.get::<_, Option<f64>>(5)?,
            ))
        })?;

        let mut candles = Vec::new();
        for row in rows {
            let (raw_ts, open, high, low, close, volume) = row?;
            let timestamp =
                parse_timestamp(&raw_ts).ok_or_else(|| AppError::Timestamp(raw_ts.clone()))?;

            match (open, high, low, close, volume) {
                (Some(open), Some(high), Some(low), Some(close), Some(volume)) => {
                    candles.push(Candle {
                        timestamp,
                        open,
                        high,
                        low,
                        close,
                        volume,
                    });
                }
                _ => warn!("Skipping incomplete row at {} in {}", raw_ts, self.table),
            }
        }

        candles.sort_by_key(|c| c.timestamp);
        debug!("Loaded {} candles from {}", candles.len(), self.table);
        Ok(candles)
    }

    /// Number of stored rows (0 if the table is missing).
    pub fn row_count(&self) -> Result<usize> {
        let conn = self.open()?;
        if !self.table_exists(&conn)? {
            return Ok(0);
        }
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", self.table),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
