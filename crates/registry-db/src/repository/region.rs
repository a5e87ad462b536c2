//! # Region Repository
//!
//! Regions are a read-only lookup for the API. Rows are written only by
//! seeding (startup or the `seed` binary).

use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbResult;
use registry_core::Region;

/// Regions inserted into an empty database.
pub const DEFAULT_REGIONS: &[&str] = &[
    "Moscow",
    "Saint Petersburg",
    "Moscow Oblast",
    "Leningrad Oblast",
    "Novosibirsk Oblast",
    "Sverdlovsk Oblast",
    "Republic of Tatarstan",
    "Krasnodar Krai",
];

/// Repository for region database operations.
#[derive(Debug, Clone)]
pub struct RegionRepository {
    pool: SqlitePool,
}

impl RegionRepository {
    /// Creates a new RegionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RegionRepository { pool }
    }

    /// All regions, sorted by name ascending.
    pub async fn list(&self) -> DbResult<Vec<Region>> {
        let regions = sqlx::query_as::<_, Region>("SELECT id, name FROM regions ORDER BY name, rowid")
            .fetch_all(&self.pool)
            .await?;

        debug!(count = regions.len(), "Listed regions");
        Ok(regions)
    }

    /// Inserts a region with a fresh ID.
    pub async fn insert(&self, name: &str) -> DbResult<Region> {
        let region = Region {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };

        sqlx::query("INSERT INTO regions (id, name) VALUES (?1, ?2)")
            .bind(region.id)
            .bind(&region.name)
            .execute(&self.pool)
            .await?;

        Ok(region)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM regions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Inserts [`DEFAULT_REGIONS`] when the table is empty.
    ///
    /// ## Returns
    /// Number of regions inserted (0 if some already existed).
    pub async fn seed_defaults(&self) -> DbResult<usize> {
        if self.count().await? > 0 {
            debug!("Regions already present, skipping seed");
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        for name in DEFAULT_REGIONS {
            sqlx::query("INSERT INTO regions (id, name) VALUES (?1, ?2)")
                .bind(Uuid::new_v4())
                .bind(*name)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        info!(count = DEFAULT_REGIONS.len(), "Seeded default regions");
        Ok(DEFAULT_REGIONS.len())
    }
}
