//! Single write connection + read pool (WAL mode).
//!
//! SQLite allows exactly one writer at a time. Rather than serialize every
//! caller behind one connection, we keep one dedicated write connection
//! behind a mutex and open read connections on demand — WAL mode lets those
//! reads proceed concurrently with an in-flight write.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use cortex_core::errors::CortexResult;

use crate::{migrations, to_storage_err};

pub struct StoragePool {
    path: String,
    write: Mutex<Connection>,
}

impl StoragePool {
    /// Open (creating if absent) the database at `path`, enable WAL mode,
    /// and run all pending migrations on the write connection.
    pub fn open(path: impl AsRef<Path>) -> CortexResult<Self> {
        let path = path.as_ref().to_string_lossy().to_string();
        let conn = Connection::open(&path).map_err(to_storage_err)?;
        configure(&conn)?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            path,
            write: Mutex::new(conn),
        })
    }

    /// An in-memory database, for tests. Still WAL-incompatible (SQLite
    /// disallows WAL on `:memory:`) so it runs in the default journal mode —
    /// fine since there's only ever one connection to it.
    pub fn open_in_memory() -> CortexResult<Self> {
        let conn = Connection::open_in_memory().map_err(to_storage_err)?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            path: ":memory:".to_string(),
            write: Mutex::new(conn),
        })
    }

    /// Run `f` against the single write connection, holding the lock for
    /// the duration of the call.
    pub fn with_write<T>(
        &self,
        f: impl FnOnce(&Connection) -> CortexResult<T>,
    ) -> CortexResult<T> {
        let conn = self
            .write
            .lock()
            .map_err(|_| to_storage_err("write connection mutex poisoned"))?;
        f(&conn)
    }

    /// Run `f` inside a single SQLite transaction on the write connection:
    /// every statement `f` issues commits or rolls back together, so a
    /// concurrent reader on a file-backed database never observes a partial
    /// multi-statement write.
    pub fn with_write_tx<T>(
        &self,
        f: impl FnOnce(&Connection) -> CortexResult<T>,
    ) -> CortexResult<T> {
        let conn = self
            .write
            .lock()
            .map_err(|_| to_storage_err("write connection mutex poisoned"))?;
        let tx = conn.unchecked_transaction().map_err(to_storage_err)?;
        let result = f(&tx)?;
        tx.commit().map_err(to_storage_err)?;
        Ok(result)
    }

    /// Open a fresh read-only connection. For `:memory:` databases this
    /// would open an independent empty database, so reads are routed
    /// through `with_write` instead in that case.
    pub fn with_read<T>(&self, f: impl FnOnce(&Connection) -> CortexResult<T>) -> CortexResult<T> {
        if self.path == ":memory:" {
            return self.with_write(f);
        }
        let conn = Connection::open_with_flags(
            &self.path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(to_storage_err)?;
        f(&conn)
    }
}

fn configure(conn: &Connection) -> CortexResult<()> {
    conn.pragma_update(None, "journal_mode", "WAL")
        .map_err(to_storage_err)?;
    conn.pragma_update(None, "foreign_keys", true)
        .map_err(to_storage_err)?;
    conn.pragma_update(None, "synchronous", "NORMAL")
        .map_err(to_storage_err)?;
    Ok(())
}
