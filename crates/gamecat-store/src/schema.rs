//! Catalog table layout
//!
//! The catalog is normally provisioned ahead of time; `ensure_schema` creates
//! any missing table for fresh stores and tests. It never alters an existing one.

use crate::CatalogError;
use rusqlite::Connection;

/// Every table the catalog reads or writes
pub const TABLES: [&str; 5] = [
    "Games",
    "Genres",
    "Categories",
    "Game-Genres",
    "Game-Categories",
];

/// Create missing catalog tables
pub fn ensure_schema(conn: &Connection) -> Result<(), CatalogError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS Games (
            ID INTEGER PRIMARY KEY,
            Name TEXT NOT NULL,
            Description TEXT NOT NULL DEFAULT '',
            Price REAL NOT NULL DEFAULT 0,
            Developer TEXT NOT NULL DEFAULT '',
            Win_Support INTEGER NOT NULL DEFAULT 0,
            Mac_Support INTEGER NOT NULL DEFAULT 0,
            Linux_Support INTEGER NOT NULL DEFAULT 0,
            Pos_Review INTEGER NOT NULL DEFAULT 0,
            Neg_Review INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS Genres (
            ID INTEGER PRIMARY KEY,
            Description TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS Categories (
            ID INTEGER PRIMARY KEY,
            Description TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS "Game-Genres" (
            Game_ID INTEGER NOT NULL,
            Genre_ID INTEGER NOT NULL,
            PRIMARY KEY (Game_ID, Genre_ID),
            FOREIGN KEY (Game_ID) REFERENCES Games(ID),
            FOREIGN KEY (Genre_ID) REFERENCES Genres(ID)
        );

        CREATE TABLE IF NOT EXISTS "Game-Categories" (
            Game_ID INTEGER NOT NULL,
            Category_ID INTEGER NOT NULL,
            PRIMARY KEY (Game_ID, Category_ID),
            FOREIGN KEY (Game_ID) REFERENCES Games(ID),
            FOREIGN KEY (Category_ID) REFERENCES Categories(ID)
        );
    "#,
    )?;

    tracing::debug!("Catalog schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CatalogDb;

    #[test]
    fn test_schema_creates_all_tables() {
        let db = CatalogDb::in_memory().unwrap();
        ensure_schema(db.conn()).unwrap();

        for table in TABLES {
            let count: i64 = db
                .conn()
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "missing table {}", table);
        }
    }

    #[test]
    fn test_schema_is_reentrant() {
        let db = CatalogDb::in_memory().unwrap();
        ensure_schema(db.conn()).unwrap();
        ensure_schema(db.conn()).unwrap();
    }
}
