//! PostgreSQL audit sink.
//!
//! The schema is created at boot with idempotent DDL; there is no separate
//! migration tooling for this single append-only table.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{AuditEntry, AuditError, AuditSink};

/// DDL executed at boot, in order. Each statement is idempotent.
const SCHEMA_STATEMENTS: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS classification_logs (
        id BIGSERIAL PRIMARY KEY,
        prompt_hash TEXT,
        prompt_preview TEXT,
        category TEXT NOT NULL,
        confidence FLOAT,
        source TEXT,
        model_used TEXT,
        cost_usd FLOAT,
        latency_ms INT,
        corrected_to TEXT,
        created_at TIMESTAMPTZ DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_classification_logs_prompt_hash ON classification_logs(prompt_hash)",
    "CREATE INDEX IF NOT EXISTS idx_classification_logs_created_at ON classification_logs(created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_classification_logs_category ON classification_logs(category)",
    "CREATE INDEX IF NOT EXISTS idx_classification_logs_model_used ON classification_logs(model_used)",
];

/// Audit sink writing one row per successful request.
pub struct PostgresAuditSink {
    pool: PgPool,
}

impl PostgresAuditSink {
    /// Connect to the audit database.
    pub async fn connect(database_url: &str) -> Result<Self, AuditError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Create a sink from an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the table and indexes if they do not exist.
    pub async fn ensure_schema(&self) -> Result<(), AuditError> {
        for statement in SCHEMA_STATEMENTS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl AuditSink for PostgresAuditSink {
    async fn insert(&self, entry: AuditEntry) -> Result<(), AuditError> {
        sqlx::query(
            r#"
            INSERT INTO classification_logs (
                prompt_hash, prompt_preview, category, confidence,
                source, model_used, cost_usd, latency_ms
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&entry.prompt_hash)
        .bind(&entry.prompt_preview)
        .bind(entry.category.as_str())
        .bind(entry.confidence)
        .bind(entry.source.as_str())
        .bind(&entry.model)
        .bind(entry.cost_usd)
        .bind(entry.latency_ms as i32)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
