use crate::models::{ShopAddress, ShopRecord, ShopTiming};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),
}

const SHOP_COLUMNS: &str = r#"
    SELECT
        s.shop_id,
        s.shop_name,
        s.shop_image,
        s.created_at,
        (a.shop_id IS NOT NULL) AS has_address,
        a.city,
        a.area,
        a.pincode,
        a.landmark,
        a.country,
        a.latitude::float8 AS latitude,
        a.longitude::float8 AS longitude
    FROM shops s
    LEFT JOIN shop_addresses a ON a.shop_id = s.shop_id
"#;

const TIMING_COLUMNS: &str = r#"
    SELECT
        shop_id,
        day,
        open_time::text AS open_time,
        close_time::text AS close_time
    FROM shop_timings
"#;

/// PostgreSQL access to the shop catalog
///
/// Shops, their address row and their opening hours live in three tables;
/// this client reassembles them into [`ShopRecord`]s.
pub struct ShopRepository {
    pool: PgPool,
}

impl ShopRepository {
    /// Create a new repository from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new repository from settings
    pub async fn from_settings(
        settings: &crate::config::DatabaseSettings,
    ) -> Result<Self, RepositoryError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            &settings.url,
            settings.max_connections.unwrap_or(10),
            settings.min_connections.unwrap_or(1),
            Duration::from_secs(settings.acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(settings.idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Fetch every shop with its address and opening hours
    pub async fn fetch_shops(&self) -> Result<Vec<ShopRecord>, RepositoryError> {
        let shop_rows = sqlx::query(&format!("{SHOP_COLUMNS} ORDER BY s.shop_id"))
            .fetch_all(&self.pool)
            .await?;

        let timing_rows = sqlx::query(&format!("{TIMING_COLUMNS} ORDER BY shop_id, timing_id"))
            .fetch_all(&self.pool)
            .await?;

        let mut timings: HashMap<i64, Vec<ShopTiming>> = HashMap::new();
        for row in &timing_rows {
            let (shop_id, timing) = timing_from_row(row)?;
            timings.entry(shop_id).or_default().push(timing);
        }

        let shops = shop_rows
            .iter()
            .map(|row| {
                let mut record = shop_from_row(row)?;
                record.timings = timings.remove(&record.shop_id).unwrap_or_default();
                Ok(record)
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        tracing::debug!("Loaded {} shops from PostgreSQL", shops.len());

        Ok(shops)
    }

    /// Fetch a single shop with its address and opening hours
    pub async fn fetch_shop(&self, shop_id: i64) -> Result<ShopRecord, RepositoryError> {
        let row = sqlx::query(&format!("{SHOP_COLUMNS} WHERE s.shop_id = $1"))
            .bind(shop_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("shop {}", shop_id)))?;

        let mut record = shop_from_row(&row)?;

        let timing_rows = sqlx::query(&format!("{TIMING_COLUMNS} WHERE shop_id = $1 ORDER BY timing_id"))
            .bind(shop_id)
            .fetch_all(&self.pool)
            .await?;

        record.timings = timing_rows
            .iter()
            .map(|row| timing_from_row(row).map(|(_, timing)| timing))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(record)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, RepositoryError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn shop_from_row(row: &PgRow) -> Result<ShopRecord, sqlx::Error> {
    let has_address: bool = row.try_get("has_address")?;

    let address = if has_address {
        Some(ShopAddress {
            city: row.try_get("city")?,
            area: row.try_get("area")?,
            pincode: row.try_get("pincode")?,
            landmark: row.try_get("landmark")?,
            country: row.try_get("country")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
        })
    } else {
        None
    };

    Ok(ShopRecord {
        shop_id: row.try_get("shop_id")?,
        shop_name: row.try_get("shop_name")?,
        shop_image: row.try_get("shop_image")?,
        created_at: row.try_get("created_at")?,
        address,
        timings: Vec::new(),
    })
}

/// Null columns become empty strings and are reported later as a malformed schedule
fn timing_from_row(row: &PgRow) -> Result<(i64, ShopTiming), sqlx::Error> {
    let shop_id: i64 = row.try_get("shop_id")?;
    let day: Option<String> = row.try_get("day")?;
    let open_time: Option<String> = row.try_get("open_time")?;
    let close_time: Option<String> = row.try_get("close_time")?;

    Ok((
        shop_id,
        ShopTiming {
            day: day.unwrap_or_default(),
            open_time: open_time.unwrap_or_default(),
            close_time: close_time.unwrap_or_default(),
        },
    ))
}
