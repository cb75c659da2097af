//! SQLite-backed gateway.
//!
//! Reads go straight to the pool. `commit` replays the staged changes inside a
//! single transaction and rolls back (by dropping it) on the first failure.

use sqlx::SqlitePool;

use crate::entity::CrudDemo;
use crate::error::DataError;
use crate::gateway::{Change, Gateway, Session};

const SELECT_SQL: &str = "SELECT id, demo_name FROM crud_demo";

/// Gateway wrapping an `sqlx::SqlitePool`.
///
/// # Example
///
/// ```ignore
/// let gateway = SqliteGateway::new(pool.clone());
/// let records = gateway.session().find_all().await?;
/// ```
#[derive(Clone, Debug)]
pub struct SqliteGateway {
    pool: SqlitePool,
}

impl SqliteGateway {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the underlying pool reference.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl Gateway for SqliteGateway {
    type Session = SqliteSession;

    fn session(&self) -> SqliteSession {
        SqliteSession {
            pool: self.pool.clone(),
            staged: Vec::new(),
        }
    }
}

pub struct SqliteSession {
    pool: SqlitePool,
    staged: Vec<Change>,
}

impl Session for SqliteSession {
    async fn is_provisioned(&self) -> Result<bool, DataError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(CrudDemo::TABLE)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    async fn find_all(&self) -> Result<Vec<CrudDemo>, DataError> {
        let records = sqlx::query_as::<_, CrudDemo>(&format!("{SELECT_SQL} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn find(&self, id: i32) -> Result<Option<CrudDemo>, DataError> {
        let record = sqlx::query_as::<_, CrudDemo>(&format!("{SELECT_SQL} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn any(&self, id: i32) -> Result<bool, DataError> {
        let found: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM crud_demo WHERE id = ?)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(found != 0)
    }

    fn add(&mut self, record: CrudDemo) {
        self.staged.push(Change::Insert(record));
    }

    fn mark_modified(&mut self, record: &CrudDemo) {
        self.staged.push(Change::Update(record.clone()));
    }

    fn remove(&mut self, record: &CrudDemo) {
        self.staged.push(Change::Delete(record.id));
    }

    fn pending(&self) -> usize {
        self.staged.len()
    }

    async fn commit(&mut self) -> Result<usize, DataError> {
        let staged = std::mem::take(&mut self.staged);
        let mut tx = self.pool.begin().await?;
        let mut written = 0usize;

        for change in &staged {
            match change {
                Change::Insert(record) => {
                    sqlx::query("INSERT INTO crud_demo (id, demo_name) VALUES (?, ?)")
                        .bind(record.id)
                        .bind(record.name.as_deref())
                        .execute(&mut *tx)
                        .await
                        .map_err(|e| duplicate_or(e, record.id))?;
                    written += 1;
                }
                Change::Update(record) => {
                    let result = sqlx::query("UPDATE crud_demo SET demo_name = ? WHERE id = ?")
                        .bind(record.name.as_deref())
                        .bind(record.id)
                        .execute(&mut *tx)
                        .await?;
                    if result.rows_affected() == 0 {
                        return Err(DataError::ConcurrencyConflict { id: record.id });
                    }
                    written += 1;
                }
                Change::Delete(id) => {
                    let result = sqlx::query("DELETE FROM crud_demo WHERE id = ?")
                        .bind(id)
                        .execute(&mut *tx)
                        .await?;
                    if result.rows_affected() == 0 {
                        return Err(DataError::ConcurrencyConflict { id: *id });
                    }
                    written += 1;
                }
            }
        }

        tx.commit().await?;
        tracing::debug!(rows = written, "sqlite gateway committed");
        Ok(written)
    }
}

fn duplicate_or(err: sqlx::Error, id: i32) -> DataError {
    match &err {
        sqlx::Error::Database(db)
            if db.is_unique_violation() || db.message().starts_with("UNIQUE constraint failed") =>
        {
            DataError::Duplicate { id }
        }
        _ => err.into(),
    }
}
