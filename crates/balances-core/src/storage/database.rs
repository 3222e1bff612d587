//! SQLite connection handle and the transactional unit of work.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Transaction};
use tracing::{debug, error, warn};

use super::schema::{SCHEMA, SCHEMA_VERSION};
use crate::error::{BalancesError, Result};

/// Shared SQLite handle. Wrap in an `Arc` to hand to several repositories.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a database file. Call [`Database::migrate`] before
    /// first use.
    pub fn open(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "opening database");
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create any missing tables. Idempotent.
    pub fn migrate(&self) -> Result<()> {
        let conn = self.lock_conn()?;
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version > SCHEMA_VERSION {
            return Err(BalancesError::storage(format!(
                "database schema version {} is newer than supported version {}",
                version, SCHEMA_VERSION
            )));
        }
        conn.execute_batch(SCHEMA)?;
        conn.execute_batch(&format!("PRAGMA user_version = {};", SCHEMA_VERSION))?;
        debug!(version = SCHEMA_VERSION, "schema ready");
        Ok(())
    }

    pub fn schema_version(&self) -> Result<i64> {
        let conn = self.lock_conn()?;
        Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    pub(crate) fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| BalancesError::storage("SQLite connection poisoned"))
    }

    /// Run read-only statements on the shared connection.
    pub fn with_connection<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.lock_conn()?;
        work(&conn)
    }

    /// Run `work` atomically.
    ///
    /// Commits when `work` returns `Ok` and rolls back when it returns `Err`.
    /// A panic inside `work` drops the transaction, which also rolls back.
    pub fn with_transaction<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;
        match work(&tx) {
            Ok(value) => {
                tx.commit().map_err(|err| {
                    error!(error = %err, "commit failed");
                    BalancesError::from(err)
                })?;
                debug!("transaction committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    error!(error = %rollback_err, "rollback failed");
                }
                warn!(error = %err, "transaction rolled back");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn database() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    fn count(db: &Database) -> i64 {
        db.with_connection(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM bank_accounts", [], |row| row.get(0))?)
        })
        .unwrap()
    }

    const INSERT: &str = "INSERT INTO bank_accounts (entity_id, account_name, bank_name, account_holder_name, account_number, last_balance, last_balance_date, status, created, created_by) VALUES (?1, 'a', 'b', 'c', 'd', 0, '2024-01-01T00:00:00.000000Z', 'active', '2024-01-01T00:00:00.000000Z', 'x')";

    #[test]
    fn test_migrate_is_idempotent() {
        let db = database();
        db.migrate().unwrap();
        assert_eq!(db.schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_commit_on_ok() {
        let db = database();
        let value = db
            .with_transaction(|tx| {
                tx.execute(INSERT, ["one"])?;
                tx.execute(INSERT, ["two"])?;
                Ok(7)
            })
            .unwrap();
        assert_eq!(value, 7);
        assert_eq!(count(&db), 2);
    }

    #[test]
    fn test_rollback_on_err() {
        let db = database();
        let err = db
            .with_transaction(|tx| -> Result<()> {
                tx.execute(INSERT, ["one"])?;
                Err(BalancesError::bad_request("stop"))
            })
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);
        assert_eq!(count(&db), 0);
    }

    #[test]
    fn test_failing_statement_rolls_back_earlier_ones() {
        let db = database();
        let result = db.with_transaction(|tx| {
            tx.execute(INSERT, ["one"])?;
            tx.execute(INSERT, ["one"])?;
            Ok(())
        });
        assert_eq!(result.unwrap_err().code(), ErrorCode::InternalError);
        assert_eq!(count(&db), 0);
    }

    #[test]
    fn test_rollback_on_panic() {
        let db = database();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = db.with_transaction(|tx| -> Result<()> {
                tx.execute(INSERT, ["one"]).unwrap();
                panic!("boom");
            });
        }));
        assert!(outcome.is_err());
        assert!(db.lock_conn().is_err());

        let conn = db.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM bank_accounts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 0);
    }
}
