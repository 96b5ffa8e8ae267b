//! Catalog writers
//!
//! Writes are best-effort: a row that already exists is skipped quietly, any
//! other failed row is logged and skipped, and the rest of the batch carries on.
//! Nothing here returns an error; callers get a [`WriteSummary`] instead.

use crate::{Game, Reference};
use rusqlite::{Connection, ErrorCode, Params, ffi, params};
use std::ops::AddAssign;
use tracing::{debug, error};

const INSERT_GAME: &str = r#"INSERT INTO Games
    (ID, Name, Description, Price, Developer, Win_Support, Mac_Support, Linux_Support, Pos_Review, Neg_Review)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"#;

const INSERT_GAME_GENRE: &str = r#"INSERT INTO "Game-Genres" (Game_ID, Genre_ID) VALUES (?1, ?2)"#;

const INSERT_GAME_CATEGORY: &str =
    r#"INSERT INTO "Game-Categories" (Game_ID, Category_ID) VALUES (?1, ?2)"#;

/// Why a single insert had no effect
#[derive(Debug)]
pub enum WriteFailure {
    /// The row (or key pair) is already stored
    Duplicate,
    /// Anything else: bad reference, I/O, malformed statement
    Other(rusqlite::Error),
}

impl From<rusqlite::Error> for WriteFailure {
    fn from(err: rusqlite::Error) -> Self {
        if is_duplicate_key(&err) {
            WriteFailure::Duplicate
        } else {
            WriteFailure::Other(err)
        }
    }
}

/// Primary-key and unique violations; foreign-key and check failures are not duplicates
fn is_duplicate_key(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == ErrorCode::ConstraintViolation
                && matches!(
                    e.extended_code,
                    ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE
                )
        }
        _ => false,
    }
}

/// Outcome counts of a write call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub inserted: usize,
    pub duplicates: usize,
    pub failed: usize,
}

impl WriteSummary {
    /// Statements attempted
    pub fn attempted(&self) -> usize {
        self.inserted + self.duplicates + self.failed
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, result: Result<(), WriteFailure>, what: &str) {
        match result {
            Ok(()) => self.inserted += 1,
            Err(WriteFailure::Duplicate) => {
                debug!("Inserting {} already inserted", what);
                self.duplicates += 1;
            }
            Err(WriteFailure::Other(e)) => {
                error!("Inserting {}: {}", what, e);
                self.failed += 1;
            }
        }
    }

    /// Inserts whose effect was lost to a rolled-back transaction
    fn rolled_back(&mut self) {
        self.failed += self.inserted;
        self.inserted = 0;
    }
}

impl AddAssign for WriteSummary {
    fn add_assign(&mut self, other: Self) {
        self.inserted += other.inserted;
        self.duplicates += other.duplicates;
        self.failed += other.failed;
    }
}

fn insert_row<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<(), WriteFailure> {
    conn.execute(sql, params)?;
    Ok(())
}

const BEGIN_SCOPE: &str = "SAVEPOINT gamecat_write";
const RELEASE_SCOPE: &str = "RELEASE gamecat_write";
const ABANDON_SCOPE: &str = "ROLLBACK TO gamecat_write; RELEASE gamecat_write";

/// Inserts grouped under one savepoint.
///
/// On an idle connection the savepoint opens a transaction and releasing it
/// commits. Inside a caller's transaction the rows commit with the caller.
struct WriteScope<'c> {
    conn: &'c Connection,
    outermost: bool,
    open: bool,
    /// Counts since the savepoint was (re)opened
    pending: WriteSummary,
    /// Counts a later rollback can no longer change
    settled: WriteSummary,
}

impl<'c> WriteScope<'c> {
    fn begin(conn: &'c Connection) -> rusqlite::Result<Self> {
        let outermost = conn.is_autocommit();
        conn.execute_batch(BEGIN_SCOPE)?;

        Ok(Self {
            conn,
            outermost,
            open: true,
            pending: WriteSummary::default(),
            settled: WriteSummary::default(),
        })
    }

    fn insert<P: Params>(&mut self, sql: &str, params: P, what: &str) {
        if !self.open {
            error!("Inserting {}: skipped, no open transaction", what);
            self.settled.failed += 1;
            return;
        }

        self.pending.record(insert_row(self.conn, sql, params), what);

        // Disk full, I/O errors and RAISE(ROLLBACK) end the whole transaction.
        if self.conn.is_autocommit() {
            error!("Transaction rolled back while inserting {}", what);
            self.pending.rolled_back();
            self.settled += std::mem::take(&mut self.pending);
            self.outermost = true;

            if let Err(e) = self.conn.execute_batch(BEGIN_SCOPE) {
                error!("Reopening transaction after {}: {}", what, e);
                self.open = false;
            }
        }
    }

    fn finish(mut self, what: &str) -> WriteSummary {
        if self.open {
            if let Err(e) = self.conn.execute_batch(RELEASE_SCOPE) {
                error!("Committing {}: {}", what, e);
                self.abandon();
                self.pending.rolled_back();
            }
        }

        self.settled += self.pending;
        self.settled
    }

    fn abandon(&self) {
        if let Err(e) = self.conn.execute_batch(ABANDON_SCOPE) {
            debug!("Rolling back savepoint: {}", e);
        }
        if self.outermost && !self.conn.is_autocommit() {
            if let Err(e) = self.conn.execute_batch("ROLLBACK") {
                error!("Rolling back transaction: {}", e);
            }
        }
    }
}

/// Insert one game and its genre/category join rows, committing once at the end.
///
/// The join rows are attempted even when the game row already exists, so a
/// repeated call fills in any link that is missing and leaves the rest alone.
/// When the caller already holds a transaction the rows join it instead.
pub fn insert_game(conn: &Connection, game: &Game) -> WriteSummary {
    let mut scope = match WriteScope::begin(conn) {
        Ok(scope) => scope,
        Err(e) => {
            error!("Inserting game {}: cannot begin transaction: {}", game.name, e);
            return WriteSummary {
                failed: 1 + game.genres.len() + game.categories.len(),
                ..WriteSummary::default()
            };
        }
    };

    scope.insert(
        INSERT_GAME,
        params![
            game.id,
            game.name,
            game.description,
            game.price,
            game.developer,
            game.win_support,
            game.mac_support,
            game.linux_support,
            game.positive_reviews,
            game.negative_reviews,
        ],
        &format!("game {}", game.name),
    );

    for genre in &game.genres {
        scope.insert(
            INSERT_GAME_GENRE,
            params![game.id, genre.id],
            &format!("game {} - genre {}", game.name, genre.label),
        );
    }

    for category in &game.categories {
        scope.insert(
            INSERT_GAME_CATEGORY,
            params![game.id, category.id],
            &format!("game {} - category {}", game.name, category.label),
        );
    }

    scope.finish(&format!("game {}", game.name))
}

/// Insert games in order; one game's failures never stop the next
pub fn insert_games(conn: &Connection, games: &[Game]) -> WriteSummary {
    let mut summary = WriteSummary::default();
    for game in games {
        summary += insert_game(conn, game);
    }

    debug!(
        "Inserted {} games: {} rows new, {} already present, {} failed",
        games.len(),
        summary.inserted,
        summary.duplicates,
        summary.failed
    );
    summary
}

/// Lookup tables keyed by reference id
#[derive(Debug, Clone, Copy)]
enum ReferenceTable {
    Genres,
    Categories,
}

impl ReferenceTable {
    fn insert_sql(self) -> &'static str {
        match self {
            ReferenceTable::Genres => "INSERT INTO Genres (ID, Description) VALUES (?1, ?2)",
            ReferenceTable::Categories => "INSERT INTO Categories (ID, Description) VALUES (?1, ?2)",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            ReferenceTable::Genres => "genre",
            ReferenceTable::Categories => "category",
        }
    }
}

/// One savepoint per row, so every successful insert is durable on its own
fn insert_references(
    conn: &Connection,
    table: ReferenceTable,
    refs: &[Reference],
) -> WriteSummary {
    let mut summary = WriteSummary::default();

    for reference in refs {
        let what = format!("{} {}", table.noun(), reference.label);

        match WriteScope::begin(conn) {
            Ok(mut scope) => {
                scope.insert(
                    table.insert_sql(),
                    params![reference.id, reference.label],
                    &what,
                );
                summary += scope.finish(&what);
            }
            Err(e) => summary.record(Err(WriteFailure::Other(e)), &what),
        }
    }

    summary
}

/// Insert genres, committing after each row
pub fn insert_genres(conn: &Connection, genres: &[Reference]) -> WriteSummary {
    insert_references(conn, ReferenceTable::Genres, genres)
}

/// Insert categories, committing after each row
pub fn insert_categories(conn: &Connection, categories: &[Reference]) -> WriteSummary {
    insert_references(conn, ReferenceTable::Categories, categories)
}
