//! Game catalog persistence for gamecat
//!
//! Maps [`Game`] records and their genre/category references onto the
//! relational catalog (`Games`, `Genres`, `Categories`, `Game-Genres`,
//! `Game-Categories`) and reads them back as typed records. Writers absorb
//! duplicate-key conflicts and keep going; readers run a single query each.

mod connection;
mod game;
mod reader;
mod rows;
mod schema;
mod writer;

pub use connection::{CatalogDb, disconnect};
pub use game::{Game, Reference};
pub use reader::{
    get_categories, get_categories_count, get_category_games, get_game_by_id,
    get_game_categories, get_game_genres, get_game_ratings, get_games, get_games_by_category,
    get_games_by_genre, get_genre_games, get_genres, get_genres_count, get_supported_platforms,
};
pub use rows::{GroupCount, Labeled, Platforms, Ratings};
pub use schema::{TABLES, ensure_schema};
pub use writer::{
    WriteFailure, WriteSummary, insert_categories, insert_game, insert_games, insert_genres,
};

pub use gamecat_config::{ConfigError, DbConfig};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Game not found: {0}")]
    GameNotFound(i64),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
