//! Catalog readers
//!
//! Each reader runs exactly one parameterized query and maps every row before
//! returning. An empty result is an empty `Vec`, except for
//! [`get_game_by_id`], which reports [`CatalogError::GameNotFound`].

use crate::CatalogError;
use crate::Game;
use crate::rows::{
    GroupCount, Labeled, Platforms, Ratings, row_to_game, row_to_group_count, row_to_labeled,
    row_to_platforms, row_to_ratings,
};
use rusqlite::{Connection, OptionalExtension, Params, Row, params};

const GAMES_IN_GENRE: &str = r#"SELECT ID, Name AS Label FROM Games
    WHERE ID IN (SELECT Game_ID FROM "Game-Genres" WHERE Genre_ID = ?1)
    ORDER BY ID"#;

const GAMES_IN_CATEGORY: &str = r#"SELECT ID, Name AS Label FROM Games
    WHERE ID IN (SELECT Game_ID FROM "Game-Categories" WHERE Category_ID = ?1)
    ORDER BY ID"#;

fn query_all<T, P, F>(
    conn: &Connection,
    sql: &str,
    params: P,
    map: F,
) -> Result<Vec<T>, CatalogError>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, map)?.collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// All games as name → id
pub fn get_games(conn: &Connection) -> Result<Vec<Labeled>, CatalogError> {
    query_all(
        conn,
        "SELECT ID, Name AS Label FROM Games ORDER BY ID",
        [],
        row_to_labeled,
    )
}

/// One game with every scalar column; the reference lists come back empty
pub fn get_game_by_id(conn: &Connection, id: i64) -> Result<Game, CatalogError> {
    conn.query_row(
        r#"SELECT ID, Name, Description, Price, Developer, Win_Support, Mac_Support,
                  Linux_Support, Pos_Review, Neg_Review
           FROM Games WHERE ID = ?1"#,
        params![id],
        row_to_game,
    )
    .optional()?
    .ok_or(CatalogError::GameNotFound(id))
}

/// All genres as description → id
pub fn get_genres(conn: &Connection) -> Result<Vec<Labeled>, CatalogError> {
    query_all(
        conn,
        "SELECT ID, Description AS Label FROM Genres ORDER BY ID",
        [],
        row_to_labeled,
    )
}

/// All categories as description → id
pub fn get_categories(conn: &Connection) -> Result<Vec<Labeled>, CatalogError> {
    query_all(
        conn,
        "SELECT ID, Description AS Label FROM Categories ORDER BY ID",
        [],
        row_to_labeled,
    )
}

/// Games linked to a genre, as name → id
pub fn get_genre_games(conn: &Connection, genre_id: i64) -> Result<Vec<Labeled>, CatalogError> {
    query_all(conn, GAMES_IN_GENRE, params![genre_id], row_to_labeled)
}

/// Same as [`get_genre_games`]
pub fn get_games_by_genre(conn: &Connection, genre_id: i64) -> Result<Vec<Labeled>, CatalogError> {
    get_genre_games(conn, genre_id)
}

/// Games linked to a category, as name → id
pub fn get_category_games(
    conn: &Connection,
    category_id: i64,
) -> Result<Vec<Labeled>, CatalogError> {
    query_all(conn, GAMES_IN_CATEGORY, params![category_id], row_to_labeled)
}

/// Same as [`get_category_games`]
pub fn get_games_by_category(
    conn: &Connection,
    category_id: i64,
) -> Result<Vec<Labeled>, CatalogError> {
    get_category_games(conn, category_id)
}

/// Review counters of a game; empty when the game is unknown
pub fn get_game_ratings(conn: &Connection, game_id: i64) -> Result<Vec<Ratings>, CatalogError> {
    query_all(
        conn,
        "SELECT Pos_Review, Neg_Review FROM Games WHERE ID = ?1",
        params![game_id],
        row_to_ratings,
    )
}

/// Platform flags of a game; empty when the game is unknown
pub fn get_supported_platforms(
    conn: &Connection,
    game_id: i64,
) -> Result<Vec<Platforms>, CatalogError> {
    query_all(
        conn,
        "SELECT Win_Support, Mac_Support, Linux_Support FROM Games WHERE ID = ?1",
        params![game_id],
        row_to_platforms,
    )
}

/// Category descriptions linked to a game
pub fn get_game_categories(conn: &Connection, game_id: i64) -> Result<Vec<String>, CatalogError> {
    query_all(
        conn,
        r#"SELECT Description FROM Categories
           WHERE ID IN (SELECT Category_ID FROM "Game-Categories" WHERE Game_ID = ?1)
           ORDER BY ID"#,
        params![game_id],
        |row| row.get(0),
    )
}

/// Genre descriptions linked to a game
pub fn get_game_genres(conn: &Connection, game_id: i64) -> Result<Vec<String>, CatalogError> {
    query_all(
        conn,
        r#"SELECT Description FROM Genres
           WHERE ID IN (SELECT Genre_ID FROM "Game-Genres" WHERE Game_ID = ?1)
           ORDER BY ID"#,
        params![game_id],
        |row| row.get(0),
    )
}

/// Linked game count per category, labeled with the category description
pub fn get_categories_count(conn: &Connection) -> Result<Vec<GroupCount>, CatalogError> {
    query_all(
        conn,
        r#"SELECT (SELECT Description FROM Categories WHERE Categories.ID = gc.Category_ID) AS Label,
                  COUNT(gc.Game_ID) AS Games
           FROM "Game-Categories" gc
           GROUP BY gc.Category_ID
           ORDER BY gc.Category_ID"#,
        [],
        row_to_group_count,
    )
}

/// Linked game count per genre, labeled with the genre description
pub fn get_genres_count(conn: &Connection) -> Result<Vec<GroupCount>, CatalogError> {
    query_all(
        conn,
        r#"SELECT (SELECT Description FROM Genres WHERE Genres.ID = gg.Genre_ID) AS Label,
                  COUNT(gg.Game_ID) AS Games
           FROM "Game-Genres" gg
           GROUP BY gg.Genre_ID
           ORDER BY gg.Genre_ID"#,
        [],
        row_to_group_count,
    )
}
