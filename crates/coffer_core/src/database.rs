//! Database handle: engine ownership and connection creation.

use crate::connection::Connection;
use coffer_store::{InMemoryEngine, StoreEngine};
use std::sync::Arc;
use tracing::debug;

/// The entry point for a Coffer database.
///
/// A `Database` owns the store engine and hands out [`Connection`]s bound
/// to it. All record state lives in the engine; the handle itself is thin.
///
/// # Example
///
/// ```rust,ignore
/// use coffer_core::Database;
///
/// let db = Database::open_in_memory();
/// let connection = db.connection();
///
/// connection.writer::<Person>().write(&person)?;
/// let read = connection.reader::<Person>().by_key("1")?;
/// ```
pub struct Database {
    engine: Arc<dyn StoreEngine>,
}

impl Database {
    /// Opens a database over the given engine.
    ///
    /// Use this to attach the typed layer to a durable engine supplied by
    /// the application.
    #[must_use]
    pub fn with_engine(engine: Arc<dyn StoreEngine>) -> Self {
        debug!("opening database");
        Self { engine }
    }

    /// Opens a fresh in-memory database.
    ///
    /// Data is lost when the database is dropped. Intended for tests and
    /// ephemeral use.
    #[must_use]
    pub fn open_in_memory() -> Self {
        Self::with_engine(Arc::new(InMemoryEngine::new()))
    }

    /// Creates a new connection to this database.
    ///
    /// Each connection serializes its own transactions; create one
    /// connection per independent caller.
    #[must_use]
    pub fn connection(&self) -> Connection {
        Connection::new(Arc::clone(&self.engine))
    }

    /// Returns the sequence of the latest committed transaction.
    #[must_use]
    pub fn committed_seq(&self) -> u64 {
        self.engine.committed_seq()
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("committed_seq", &self.committed_seq())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Index;
    use crate::transaction::{ReadTransaction, WriteTransaction};

    #[test]
    fn open_in_memory_starts_empty() {
        let db = Database::open_in_memory();
        assert_eq!(db.committed_seq(), 0);
    }

    #[test]
    fn connections_share_the_engine() {
        let db = Database::open_in_memory();
        let a = db.connection();
        let b = db.connection();
        let index = Index::new("test", "k");

        a.write(|txn| txn.write_at_index(&index, b"v".to_vec())).unwrap();

        let read = b.read(|txn| txn.read_at_index(&index)).unwrap();
        assert_eq!(read.as_deref(), Some(b"v".as_ref()));
    }

    #[test]
    fn committed_seq_increases_with_writes() {
        let db = Database::open_in_memory();
        let connection = db.connection();
        let initial = db.committed_seq();

        connection
            .write(|txn| txn.write_at_index(&Index::new("test", "k"), b"v".to_vec()))
            .unwrap();

        assert!(db.committed_seq() > initial);
    }

    #[test]
    fn with_engine_accepts_shared_engine() {
        let engine = Arc::new(coffer_store::InMemoryEngine::new());
        let db = Database::with_engine(Arc::clone(&engine) as Arc<dyn StoreEngine>);
        let connection = db.connection();

        connection
            .write(|txn| txn.write_at_index(&Index::new("test", "k"), b"v".to_vec()))
            .unwrap();
        assert_eq!(engine.record_count(), 1);
    }
}
