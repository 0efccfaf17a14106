//! Catalog startup.

use catalog_config_and_utils::{load_catalog, Config, CoreResult};
use catalog_engine::{starter_catalog, CatalogStore, Record};
use tokio::io::{AsyncWriteExt, BufReader};
use tracing::info;

use super::{run_repl, AppError, RunMode, Session};
use crate::catalog_adapter::ChannelSink;
use crate::command::Command;

/// Records the store starts with.
///
/// A configured catalog file wins over the starter catalog.
pub fn initial_records(config: &Config) -> CoreResult<Vec<Record>> {
    match &config.catalog_file {
        Some(path) => load_catalog(path),
        None if config.seed_starter_catalog => Ok(starter_catalog()),
        None => Ok(Vec::new()),
    }
}

/// Builds the store from `config`, hands it to the dispatcher and opens a
/// presenter session on it.
pub async fn open_session(config: &Config) -> Result<Session, AppError> {
    let records = initial_records(config)?;
    let source = match &config.catalog_file {
        Some(path) => path.display().to_string(),
        None if config.seed_starter_catalog => "starter".to_string(),
        None => "empty".to_string(),
    };
    info!(records = records.len(), source = %source, "Loading catalog");

    let (sink, effects) = ChannelSink::new();
    let store = CatalogStore::with_records(records, sink)?.with_layout(config.initial_layout);

    Ok(Session::open(store, effects).await?)
}

/// Run the catalog in the requested mode.
pub async fn run(config: Config, mode: RunMode) -> Result<(), AppError> {
    let mut session = open_session(&config).await?;
    let mut stdout = tokio::io::stdout();

    match mode {
        RunMode::Repl => {
            info!(layout = %config.initial_layout, "Starting interactive session");
            run_repl(&mut session, BufReader::new(tokio::io::stdin()), &mut stdout).await?;
        }
        RunMode::List => {
            let (_, text) = session.execute(Command::List).await?;
            stdout.write_all(text.as_bytes()).await?;
        }
        RunMode::Export => {
            let (_, text) = session.execute(Command::Export).await?;
            stdout.write_all(text.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        }
    }

    stdout.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_config_and_utils::catalog_to_json;
    use catalog_engine::LayoutMode;
    use tempfile::tempdir;

    #[test]
    fn starter_catalog_by_default() {
        let records = initial_records(&Config::default()).unwrap();
        assert_eq!(records.len(), 13);
    }

    #[test]
    fn empty_catalog_when_seeding_is_off() {
        let config = Config {
            seed_starter_catalog: false,
            ..Config::default()
        };
        assert!(initial_records(&config).unwrap().is_empty());
    }

    #[test]
    fn catalog_file_wins_over_starter() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let records = vec![Record::new("🐢", "Turtle", "A cute turtle.", "Something slow")];
        std::fs::write(&path, catalog_to_json(&records).unwrap()).unwrap();

        let config = Config {
            catalog_file: Some(path),
            ..Config::default()
        };
        let loaded = initial_records(&config).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Turtle");
    }

    #[test]
    fn missing_catalog_file_is_an_error() {
        let dir = tempdir().unwrap();
        let config = Config {
            catalog_file: Some(dir.path().join("missing.json")),
            ..Config::default()
        };
        assert!(initial_records(&config).is_err());
    }

    #[tokio::test]
    async fn open_session_uses_initial_layout() {
        let config = Config {
            initial_layout: LayoutMode::Column,
            ..Config::default()
        };
        let mut session = open_session(&config).await.unwrap();

        let (_, text) = session.execute(Command::List).await.unwrap();
        assert!(text.contains("layout: column"));
        assert!(text.contains("13 records in 8 sections"));
    }
}
