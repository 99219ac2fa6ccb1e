//! # Cashier Repository
//!
//! Database operations for cashier sessions.
//!
//! ## Row Mapping
//! ```text
//! ┌──────────────────────────────┬──────────────────────────────────────────┐
//! │ CashierSession               │ cashiers column                          │
//! ├──────────────────────────────┼──────────────────────────────────────────┤
//! │ id                           │ id (AUTOINCREMENT)                       │
//! │ initial_money_cashier        │ initial_money_cents                      │
//! │ closed_by: None              │ closed_by = '-'                          │
//! │ total_* (Money)              │ total_*_cents                            │
//! │ operations: Vec<Op>          │ operations (JSON text, '' when empty)    │
//! └──────────────────────────────┴──────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use cashdesk_core::operations::{decode_operations, encode_operations};
use cashdesk_core::{CashierSession, Money, CLOSED_BY_UNSET};

const ENTITY: &str = "cashier";

const SELECT_COLUMNS: &str = r#"
    SELECT
        id,
        initial_money_cents,
        timestamp_text,
        date_to_show,
        open_by,
        closed_by,
        total_outcome_cents,
        total_income_cents,
        total_profit_cents,
        operations,
        opened_at
    FROM cashiers
"#;

/// A `cashiers` row as stored.
#[derive(Debug, sqlx::FromRow)]
struct CashierRow {
    id: i64,
    initial_money_cents: i64,
    timestamp_text: String,
    date_to_show: String,
    open_by: String,
    closed_by: String,
    total_outcome_cents: i64,
    total_income_cents: i64,
    total_profit_cents: i64,
    operations: String,
    opened_at: DateTime<Utc>,
}

impl CashierRow {
    fn into_session(self) -> DbResult<CashierSession> {
        let operations = decode_operations(&self.operations)
            .map_err(|e| DbError::corrupted(ENTITY, self.id.to_string(), e.to_string()))?;

        let closed_by = match self.closed_by.trim() {
            "" | CLOSED_BY_UNSET => None,
            user => Some(user.to_string()),
        };

        Ok(CashierSession {
            id: Some(self.id),
            initial_money_cashier: Money::from_cents(self.initial_money_cents),
            timestamp_text: self.timestamp_text,
            date_to_show: self.date_to_show,
            open_by: self.open_by,
            closed_by,
            total_outcome: Money::from_cents(self.total_outcome_cents),
            total_income: Money::from_cents(self.total_income_cents),
            total_profit: Money::from_cents(self.total_profit_cents),
            operations,
            opened_at: self.opened_at,
        })
    }
}

/// Repository for cashier session database operations.
#[derive(Debug, Clone)]
pub struct CashierRepository {
    pool: SqlitePool,
}

impl CashierRepository {
    /// Creates a new CashierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CashierRepository { pool }
    }

    /// Inserts a session and returns the id assigned by SQLite.
    ///
    /// Any id already on the session is ignored.
    pub async fn create(&self, session: &CashierSession) -> DbResult<i64> {
        debug!(open_by = %session.open_by, "Inserting cashier session");

        let operations = encode_operations(&session.operations)?;
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO cashiers (
                initial_money_cents, timestamp_text, date_to_show,
                open_by, closed_by,
                total_outcome_cents, total_income_cents, total_profit_cents,
                operations, opened_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(session.initial_money_cashier.cents())
        .bind(&session.timestamp_text)
        .bind(&session.date_to_show)
        .bind(&session.open_by)
        .bind(session.closed_by.as_deref().unwrap_or(CLOSED_BY_UNSET))
        .bind(session.total_outcome.cents())
        .bind(session.total_income.cents())
        .bind(session.total_profit.cents())
        .bind(operations)
        .bind(session.opened_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Overwrites every stored field of the session with the given id.
    pub async fn update(&self, session: &CashierSession) -> DbResult<()> {
        let id = session
            .id
            .ok_or_else(|| DbError::not_found(ENTITY, session.reference()))?;

        debug!(cashier_id = id, operation_count = session.operations.len(), "Updating cashier session");

        let operations = encode_operations(&session.operations)?;

        let result = sqlx::query(
            r#"
            UPDATE cashiers SET
                initial_money_cents = ?1,
                timestamp_text = ?2,
                date_to_show = ?3,
                open_by = ?4,
                closed_by = ?5,
                total_outcome_cents = ?6,
                total_income_cents = ?7,
                total_profit_cents = ?8,
                operations = ?9,
                opened_at = ?10,
                updated_at = ?11
            WHERE id = ?12
            "#,
        )
        .bind(session.initial_money_cashier.cents())
        .bind(&session.timestamp_text)
        .bind(&session.date_to_show)
        .bind(&session.open_by)
        .bind(session.closed_by.as_deref().unwrap_or(CLOSED_BY_UNSET))
        .bind(session.total_outcome.cents())
        .bind(session.total_income.cents())
        .bind(session.total_profit.cents())
        .bind(operations)
        .bind(session.opened_at)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, id.to_string()));
        }

        Ok(())
    }

    /// Gets a session by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<CashierSession>> {
        let query = format!("{} WHERE id = ?1", SELECT_COLUMNS);

        let row: Option<CashierRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(CashierRow::into_session).transpose()
    }

    /// Returns every stored session, newest first.
    ///
    /// A single corrupt row fails the whole read.
    pub async fn read_all(&self) -> DbResult<Vec<CashierSession>> {
        let query = format!("{} ORDER BY id DESC", SELECT_COLUMNS);

        let rows: Vec<CashierRow> = sqlx::query_as(&query).fetch_all(&self.pool).await?;

        debug!(count = rows.len(), "Read cashier sessions");

        rows.into_iter().map(CashierRow::into_session).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use cashdesk_core::{CashierOperation, DisplayStamp, SaleRow};

    async fn repo() -> (Database, CashierRepository) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.cashiers();
        (db, repo)
    }

    fn new_session(user: &str) -> CashierSession {
        CashierSession::open(Money::from_cents(10000), user, DisplayStamp::plain(Utc::now())).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let (_db, repo) = repo().await;

        let first = repo.create(&new_session("alice")).await.unwrap();
        let second = repo.create(&new_session("bob")).await.unwrap();
        assert!(second > first);

        let stored = repo.get_by_id(first).await.unwrap().unwrap();
        assert_eq!(stored.id, Some(first));
        assert_eq!(stored.open_by, "alice");
        assert_eq!(stored.closed_by, None);
        assert_eq!(stored.initial_money_cashier.cents(), 10000);
        assert!(stored.operations.is_empty());
    }

    #[tokio::test]
    async fn test_update_persists_operations_and_close() {
        let (_db, repo) = repo().await;

        let mut session = new_session("alice");
        session.id = Some(repo.create(&session).await.unwrap());
        session.operations = vec![CashierOperation::Sale(SaleRow::new("s1", Money::from_cents(2550)))];
        session.total_profit = Money::from_cents(2550);
        session.closed_by = Some("bob".to_string());

        repo.update(&session).await.unwrap();

        let stored = repo.get_by_id(session.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(stored.operations, session.operations);
        assert_eq!(stored.total_profit.cents(), 2550);
        assert_eq!(stored.closed_by.as_deref(), Some("bob"));
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let (_db, repo) = repo().await;

        let mut session = new_session("alice");
        session.id = Some(999);
        assert!(matches!(repo.update(&session).await, Err(DbError::NotFound { .. })));

        session.id = None;
        assert!(matches!(repo.update(&session).await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_read_all_newest_first() {
        let (_db, repo) = repo().await;

        assert!(repo.read_all().await.unwrap().is_empty());

        let first = repo.create(&new_session("alice")).await.unwrap();
        let second = repo.create(&new_session("bob")).await.unwrap();

        let all = repo.read_all().await.unwrap();
        let ids: Vec<_> = all.iter().map(|s| s.id.unwrap()).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[tokio::test]
    async fn test_stored_string_operations_are_decoded() {
        let (db, repo) = repo().await;
        let id = repo.create(&new_session("alice")).await.unwrap();

        sqlx::query("UPDATE cashiers SET operations = ?1 WHERE id = ?2")
            .bind(r#"[{"id":"s2","type":"SALE","profit":10}]"#)
            .bind(id)
            .execute(db.pool())
            .await
            .unwrap();

        let stored = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.operations.len(), 1);
        assert_eq!(stored.operations[0].profit().cents(), 1000);
    }

    #[tokio::test]
    async fn test_corrupt_operations_fail_the_read() {
        let (db, repo) = repo().await;
        let id = repo.create(&new_session("alice")).await.unwrap();

        sqlx::query("UPDATE cashiers SET operations = 'not json' WHERE id = ?1")
            .bind(id)
            .execute(db.pool())
            .await
            .unwrap();

        let err = repo.read_all().await.unwrap_err();
        assert!(matches!(err, DbError::Corrupted { id: ref row_id, .. } if *row_id == id.to_string()));
    }
}
