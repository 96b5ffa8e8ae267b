//! gamecat command line
//!
//! Thin operator front end over `gamecat-store`: creates the catalog tables,
//! bulk-imports games from JSON, and prints catalog listings as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gamecat_config::CatalogConfig;
use gamecat_store::{CatalogDb, Game, Reference, WriteSummary};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "gamecat")]
#[command(about = "Query and populate the game catalog", long_about = None)]
struct Cli {
    /// Database credential file (defaults to $GAMECAT_CONFIG or ./dbcredentials.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Create any missing catalog tables
    Init,

    /// Import genres, categories and games from a JSON file
    Import {
        /// JSON document with `genres`, `categories` and `games` arrays
        file: PathBuf,
    },

    /// List games as name and id
    Games,

    /// List genres as description and id
    Genres,

    /// List categories as description and id
    Categories,

    /// Show one game with its genre and category labels
    Game {
        /// Game id
        id: i64,
    },

    /// Count linked games per genre and per category
    Stats,
}

/// Bulk import document
#[derive(Debug, Default, Deserialize)]
struct ImportFile {
    #[serde(default)]
    genres: Vec<Reference>,
    #[serde(default)]
    categories: Vec<Reference>,
    #[serde(default)]
    games: Vec<Game>,
}

/// One game with the labels of its genres and categories
#[derive(Debug, Serialize)]
struct GameView {
    #[serde(flatten)]
    game: Game,
    genre_labels: Vec<String>,
    category_labels: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Stats {
    genres: Vec<gamecat_store::GroupCount>,
    categories: Vec<gamecat_store::GroupCount>,
}

fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CatalogConfig::load(path),
        None => CatalogConfig::load_default(),
    }
    .context("Failed to load database configuration")?;

    let db = CatalogDb::open(&config.db).context("Failed to connect to catalog")?;
    let outcome = run(&db, &cli.command);

    if let Err(e) = db.close() {
        error!("Failed to close catalog: {}", e);
    }

    outcome
}

fn setup_logging() {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn run(db: &CatalogDb, command: &Command) -> Result<()> {
    let conn = db.conn();

    match command {
        Command::Init => {
            gamecat_store::ensure_schema(conn)?;
            info!("Catalog tables ready");
        }
        Command::Import { file } => import(db, file)?,
        Command::Games => print_json(&gamecat_store::get_games(conn)?)?,
        Command::Genres => print_json(&gamecat_store::get_genres(conn)?)?,
        Command::Categories => print_json(&gamecat_store::get_categories(conn)?)?,
        Command::Game { id } => print_json(&GameView {
            game: gamecat_store::get_game_by_id(conn, *id)?,
            genre_labels: gamecat_store::get_game_genres(conn, *id)?,
            category_labels: gamecat_store::get_game_categories(conn, *id)?,
        })?,
        Command::Stats => print_json(&Stats {
            genres: gamecat_store::get_genres_count(conn)?,
            categories: gamecat_store::get_categories_count(conn)?,
        })?,
    }

    Ok(())
}

fn import(db: &CatalogDb, path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file: ImportFile = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let conn = db.conn();
    report("genres", gamecat_store::insert_genres(conn, &file.genres));
    report("categories", gamecat_store::insert_categories(conn, &file.categories));
    report("games", gamecat_store::insert_games(conn, &file.games));

    Ok(())
}

fn report(what: &str, summary: WriteSummary) {
    info!(
        "Imported {}: {} inserted, {} already present, {} failed",
        what, summary.inserted, summary.duplicates, summary.failed
    );
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        let cli = Cli::try_parse_from(["gamecat", "stats"]).unwrap();
        assert_eq!(cli.command, Command::Stats);
        assert_eq!(cli.config, None);

        let cli =
            Cli::try_parse_from(["gamecat", "--config", "/etc/db.toml", "game", "440"]).unwrap();
        assert_eq!(cli.command, Command::Game { id: 440 });
        assert_eq!(cli.config, Some(PathBuf::from("/etc/db.toml")));

        let cli = Cli::try_parse_from(["gamecat", "import", "games.json", "-c", "db.toml"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Import {
                file: PathBuf::from("games.json")
            }
        );
        assert_eq!(cli.config, Some(PathBuf::from("db.toml")));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Cli::try_parse_from(["gamecat"]).is_err());
        assert!(Cli::try_parse_from(["gamecat", "game", "abc"]).is_err());
        assert!(Cli::try_parse_from(["gamecat", "frobnicate"]).is_err());
        assert!(Cli::try_parse_from(["gamecat", "--config"]).is_err());
        assert!(Cli::try_parse_from(["gamecat", "import"]).is_err());
    }

    #[test]
    fn test_import_file_shape() {
        let file: ImportFile = serde_json::from_str(
            r#"{
                "genres": [{"id": 1, "label": "Action"}],
                "games": [{"id": 10, "name": "Counter-Strike", "genres": [{"id": 1, "label": "Action"}]}]
            }"#,
        )
        .unwrap();

        assert_eq!(file.genres.len(), 1);
        assert!(file.categories.is_empty());
        assert_eq!(file.games[0].genres[0].id, 1);
    }

    #[test]
    fn test_run_import_and_read_back() {
        let db = CatalogDb::in_memory().unwrap();
        run(&db, &Command::Init).unwrap();

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("import.json");
        std::fs::write(
            &path,
            r#"{
                "genres": [{"id": 1, "label": "Action"}],
                "categories": [{"id": 2, "label": "Multi-player"}],
                "games": [{"id": 10, "name": "Counter-Strike",
                           "genres": [{"id": 1, "label": "Action"}],
                           "categories": [{"id": 2, "label": "Multi-player"}]}]
            }"#,
        )
        .unwrap();

        run(&db, &Command::Import { file: path }).unwrap();

        assert_eq!(
            gamecat_store::get_game_genres(db.conn(), 10).unwrap(),
            vec!["Action"]
        );
        assert!(run(&db, &Command::Game { id: 10 }).is_ok());
        assert!(run(&db, &Command::Game { id: 11 }).is_err());
    }
}
