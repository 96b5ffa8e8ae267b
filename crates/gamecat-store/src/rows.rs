//! Named record types for query results and the row mappers that build them

use crate::Game;
use rusqlite::Row;
use serde::Serialize;

/// A label keyed to its id: a game name, genre or category description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Labeled {
    pub label: String,
    pub id: i64,
}

/// Review counters of one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ratings {
    pub positive: i64,
    pub negative: i64,
}

/// Platform support flags of one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Platforms {
    pub windows: bool,
    pub mac: bool,
    pub linux: bool,
}

/// Number of games linked to one genre or category.
///
/// `label` is `None` when the group's id has no row in the lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub label: Option<String>,
    pub count: i64,
}

pub(crate) fn row_to_game(row: &Row) -> rusqlite::Result<Game> {
    Ok(Game {
        id: row.get("ID")?,
        name: row.get("Name")?,
        description: row.get("Description")?,
        price: row.get("Price")?,
        developer: row.get("Developer")?,
        win_support: row.get("Win_Support")?,
        mac_support: row.get("Mac_Support")?,
        linux_support: row.get("Linux_Support")?,
        positive_reviews: row.get("Pos_Review")?,
        negative_reviews: row.get("Neg_Review")?,
        genres: Vec::new(),
        categories: Vec::new(),
    })
}

/// Expects `ID` and `Label` columns
pub(crate) fn row_to_labeled(row: &Row) -> rusqlite::Result<Labeled> {
    Ok(Labeled {
        label: row.get("Label")?,
        id: row.get("ID")?,
    })
}

pub(crate) fn row_to_ratings(row: &Row) -> rusqlite::Result<Ratings> {
    Ok(Ratings {
        positive: row.get("Pos_Review")?,
        negative: row.get("Neg_Review")?,
    })
}

pub(crate) fn row_to_platforms(row: &Row) -> rusqlite::Result<Platforms> {
    Ok(Platforms {
        windows: row.get("Win_Support")?,
        mac: row.get("Mac_Support")?,
        linux: row.get("Linux_Support")?,
    })
}

/// Expects `Label` and `Games` columns
pub(crate) fn row_to_group_count(row: &Row) -> rusqlite::Result<GroupCount> {
    Ok(GroupCount {
        label: row.get("Label")?,
        count: row.get("Games")?,
    })
}
