//! Connection handle with an explicit open/close lifecycle

use crate::CatalogError;
use gamecat_config::{DbConfig, DbTarget};
use rusqlite::Connection;

/// An open catalog store.
///
/// Single owner: pass `conn()` to the writer and reader functions. The
/// connection is released by [`CatalogDb::close`] or when the handle drops.
pub struct CatalogDb {
    conn: Connection,
}

impl CatalogDb {
    /// Open the store named by `config`
    pub fn open(config: &DbConfig) -> Result<Self, CatalogError> {
        config.validate()?;

        let conn = match config.target() {
            DbTarget::Memory => Connection::open_in_memory()?,
            DbTarget::File(path) => Connection::open(path)?,
        };

        tracing::info!(
            "Connected to catalog {} as {}@{}:{}",
            config.dbname,
            config.username,
            config.ipaddress,
            config.port
        );

        Self::from_connection(conn)
    }

    /// Open a private in-memory store (for testing)
    pub fn in_memory() -> Result<Self, CatalogError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, CatalogError> {
        // Join rows must reference existing games and genres/categories.
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(Self { conn })
    }

    /// Borrow the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Close the connection, reporting any error from the store
    pub fn close(self) -> Result<(), CatalogError> {
        self.conn.close().map_err(|(_, e)| CatalogError::Sqlite(e))?;
        tracing::debug!("Catalog connection closed");
        Ok(())
    }
}

/// Close a catalog handle
pub fn disconnect(db: CatalogDb) -> Result<(), CatalogError> {
    db.close()
}
