use async_trait::async_trait;
use chrono::DateTime;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use crate::error::{Error, Result};
use crate::interfaces::sample_store::SampleStore;
use crate::types::sample::Sample;

const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS fee_samples (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        taken_at_ms   INTEGER NOT NULL,
        hour          INTEGER NOT NULL,
        btc_fee_rate  REAL,
        eth_gas_price REAL
    )";

const CREATE_INDEX: &str = "
    CREATE INDEX IF NOT EXISTS idx_fee_samples_taken_at
        ON fee_samples (taken_at_ms DESC)";

pub struct SqliteSampleStore {
    pool: SqlitePool,
}

impl SqliteSampleStore {
    /// Connect and make sure the schema exists.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let mut options = SqlitePoolOptions::new().max_connections(max_connections);

        // Every connection to `:memory:` is its own database.
        if url.contains(":memory:") {
            options = options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = options.connect(url).await?;
        let store = SqliteSampleStore { pool };
        store.ensure_schema().await?;

        tracing::info!("Sample store connected: {}", redact_url(url));
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_INDEX).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl SampleStore for SqliteSampleStore {
    async fn insert(&self, sample: &Sample) -> Result<()> {
        sqlx::query(
            "INSERT INTO fee_samples (taken_at_ms, hour, btc_fee_rate, eth_gas_price)
             VALUES (?, ?, ?, ?)",
        )
        .bind(sample.taken_at().timestamp_millis())
        .bind(i64::from(sample.hour_of_day()))
        .bind(sample.btc_fee_rate())
        .bind(sample.eth_gas_price())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_newest_first(&self) -> Result<Vec<Sample>> {
        let rows: Vec<SampleRow> = sqlx::query_as(
            "SELECT taken_at_ms, btc_fee_rate, eth_gas_price
             FROM fee_samples
             ORDER BY taken_at_ms DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SampleRow::into_sample).collect()
    }
}

#[derive(sqlx::FromRow)]
struct SampleRow {
    taken_at_ms: i64,
    btc_fee_rate: Option<f64>,
    eth_gas_price: Option<f64>,
}

impl SampleRow {
    // The stored `hour` column is for SQL consumers; it is re-derived here
    // from the host clock.
    fn into_sample(self) -> Result<Sample> {
        let taken_at = DateTime::from_timestamp_millis(self.taken_at_ms)
            .ok_or_else(|| Error::StoreUnavailable(format!("invalid timestamp {}", self.taken_at_ms)))?;
        Ok(Sample::new(taken_at, self.btc_fee_rate, self.eth_gas_price))
    }
}

/// Drop credentials from a connection string before logging it.
fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
