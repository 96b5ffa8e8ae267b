//! Game record as handed to the writer and rebuilt by the reader

use serde::{Deserialize, Serialize};

/// A genre or category attached to a game.
///
/// Only `id` is persisted in the join tables; `label` travels with the record
/// for logging and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub id: i64,
    pub label: String,
}

impl Reference {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// A game in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub developer: String,
    #[serde(default)]
    pub win_support: bool,
    #[serde(default)]
    pub mac_support: bool,
    #[serde(default)]
    pub linux_support: bool,
    #[serde(default)]
    pub positive_reviews: i64,
    #[serde(default)]
    pub negative_reviews: i64,
    #[serde(default)]
    pub genres: Vec<Reference>,
    #[serde(default)]
    pub categories: Vec<Reference>,
}

impl Game {
    /// A game with only its identity set
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            price: 0.0,
            developer: String::new(),
            win_support: false,
            mac_support: false,
            linux_support: false,
            positive_reviews: 0,
            negative_reviews: 0,
            genres: Vec::new(),
            categories: Vec::new(),
        }
    }

    pub fn with_genre(mut self, id: i64, label: impl Into<String>) -> Self {
        self.genres.push(Reference::new(id, label));
        self
    }

    pub fn with_category(mut self, id: i64, label: impl Into<String>) -> Self {
        self.categories.push(Reference::new(id, label));
        self
    }

    /// Same game with the reference lists dropped (the shape read back from `Games`)
    pub fn without_references(&self) -> Self {
        Self {
            genres: Vec::new(),
            categories: Vec::new(),
            ..self.clone()
        }
    }
}
