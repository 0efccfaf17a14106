//! Interactive session.
//!
//! A session owns the presenter and the receiving end of the store's
//! side-effects. Every command goes through the dispatcher; the presenter
//! then catches up by replaying whatever the store emitted.

use std::fmt::Write as _;

use catalog_config_and_utils::catalog_to_json;
use catalog_engine::{
    CatalogStore, DeleteOutcome, EditOutcome, ItemPosition, RecordId, ReplaceOutcome, SideEffect,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::AppError;
use crate::catalog_adapter::ChannelSink;
use crate::command::{Command, HELP};
use crate::dispatcher::{CatalogHandle, DispatchError};
use crate::presenter::Presenter;

const PROMPT: &[u8] = b"> ";

/// Whether the REPL keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    handle: CatalogHandle,
    presenter: Presenter,
    effects: mpsc::UnboundedReceiver<SideEffect>,
}

impl Session {
    /// Moves `store` into the dispatcher and draws its first snapshot.
    pub async fn open(
        store: CatalogStore<ChannelSink>,
        effects: mpsc::UnboundedReceiver<SideEffect>,
    ) -> Result<Self, DispatchError> {
        let (handle, _task) = CatalogHandle::spawn(store);
        let snapshot = handle.snapshot().await?;
        let mode = handle.layout().await?;

        Ok(Self {
            handle,
            presenter: Presenter::new(&snapshot, mode),
            effects,
        })
    }

    /// Replays pending side-effects. A change set that does not apply
    /// means the replica drifted; it is rebuilt from the store.
    async fn sync(&mut self) -> Result<(), DispatchError> {
        let mut drifted = false;
        while let Ok(effect) = self.effects.try_recv() {
            if drifted {
                continue;
            }
            if let Err(error) = self.presenter.apply(&effect) {
                warn!(%error, "Presenter out of sync, rebuilding from snapshot");
                drifted = true;
            }
        }

        if drifted {
            let snapshot = self.handle.snapshot().await?;
            self.presenter.resync(&snapshot);
        }
        debug!(version = self.presenter.version(), "Presenter caught up");
        Ok(())
    }

    async fn render(&mut self) -> Result<String, DispatchError> {
        self.sync().await?;
        let records = self.handle.records().await?;
        Ok(self.presenter.render(&records))
    }

    /// Runs one command and returns the text to show for it.
    pub async fn execute(&mut self, command: Command) -> Result<(Flow, String), AppError> {
        debug!(command = ?command, "Executing command");

        let message = match command {
            Command::List => return Ok((Flow::Continue, self.render().await?)),
            Command::Help => return Ok((Flow::Continue, HELP.to_string())),
            Command::Quit => return Ok((Flow::Quit, "bye".to_string())),
            Command::Show(id) => {
                let text = match self.handle.record(id.clone()).await? {
                    Some(record) => format!(
                        "{} {}\n  section: {}\n  description: {}\n  usage: {}",
                        record.symbol,
                        record.name,
                        record.section_key(),
                        record.description,
                        record.usage
                    ),
                    None => format!("warning: no record with id {id}"),
                };
                return Ok((Flow::Continue, text));
            }
            Command::Export => {
                let records = self.handle.records().await?;
                return Ok((Flow::Continue, catalog_to_json(&records)?));
            }
            Command::Changes => {
                let changes = self.handle.last_changes().await?;
                let mut text = format!(
                    "v{} -> v{}: {} ops",
                    changes.from_version(),
                    changes.to_version(),
                    changes.len()
                );
                for op in changes.iter() {
                    let _ = write!(text, "\n  {op}");
                }
                return Ok((Flow::Continue, text));
            }
            Command::Add(record) => {
                let id = record.id();
                match self.handle.add(record).await? {
                    Ok(_) => format!("added {id}"),
                    Err(error) => format!("error: {error}"),
                }
            }
            Command::Replace(record) => {
                let id = record.id();
                match self.handle.replace(record).await? {
                    ReplaceOutcome::Replaced(_) => format!("replaced {id}"),
                    ReplaceOutcome::Inserted(_) => {
                        format!("warning: no record {id} to replace, added it instead")
                    }
                }
            }
            Command::Edit { origin, record } => {
                let id = record.id();
                match self.handle.edit(origin, record).await? {
                    Ok(EditOutcome::Added(_)) => format!("added {id}"),
                    Ok(EditOutcome::Replaced(ReplaceOutcome::Replaced(_))) => {
                        format!("updated {id}")
                    }
                    Ok(EditOutcome::Replaced(ReplaceOutcome::Inserted(_))) => {
                        format!("warning: no record {id} to update, added it instead")
                    }
                    Err(error) => format!("error: {error}"),
                }
            }
            Command::Delete(id) => self.delete(id).await?,
            Command::DeleteAt(position) => {
                self.sync().await?;
                match self.presenter.resolve(position).cloned() {
                    Some(id) => self.delete(id).await?,
                    None => nothing_at(position),
                }
            }
            Command::Layout => {
                self.sync().await?;
                let materialized = self.presenter.materialized();
                let transition = self.handle.toggle_layout(Some(materialized)).await?;
                self.sync().await?;
                format!(
                    "layout: {} -> {} [{}]",
                    transition.from,
                    transition.to,
                    self.presenter.layout().indicator
                )
            }
        };

        let view = self.render().await?;
        Ok((Flow::Continue, format!("{message}\n{view}")))
    }

    async fn delete(&mut self, id: RecordId) -> Result<String, DispatchError> {
        Ok(match self.handle.delete(id.clone()).await? {
            DeleteOutcome::Deleted(_) => format!("deleted {id}"),
            DeleteOutcome::NotFound(warning) => format!("warning: {warning}"),
        })
    }
}

fn nothing_at(position: ItemPosition) -> String {
    format!(
        "warning: nothing at section {} item {}",
        position.section + 1,
        position.item + 1
    )
}

/// Reads commands line by line until `quit` or end of input.
///
/// Parse errors and catalog warnings are printed and the loop goes on.
/// Only a dead store task or broken terminal I/O ends it early.
pub async fn run_repl<R, W>(session: &mut Session, input: R, mut output: W) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    let (_, first) = session.execute(Command::List).await?;
    output.write_all(first.as_bytes()).await?;

    loop {
        output.write_all(PROMPT).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let (flow, reply) = match line.parse::<Command>() {
            Ok(command) => session.execute(command).await?,
            Err(error) => (Flow::Continue, format!("error: {error}")),
        };
        output.write_all(reply.as_bytes()).await?;
        if !reply.ends_with('\n') {
            output.write_all(b"\n").await?;
        }

        if flow == Flow::Quit {
            break;
        }
    }

    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_engine::{starter_catalog, LayoutMode, Record};

    async fn session_with(records: Vec<Record>) -> Session {
        let (sink, effects) = ChannelSink::new();
        let store = CatalogStore::with_records(records, sink).unwrap();
        Session::open(store, effects).await.unwrap()
    }

    async fn run(session: &mut Session, line: &str) -> String {
        let command: Command = line.parse().unwrap();
        session.execute(command).await.unwrap().1
    }

    async fn assert_in_sync(session: &Session) {
        let snapshot = session.handle.snapshot().await.unwrap();
        assert!(session.presenter.is_in_sync(&snapshot));
        assert_eq!(session.presenter.version(), snapshot.version());
    }

    #[tokio::test]
    async fn add_edit_delete_keep_presenter_in_sync() {
        let mut session = session_with(starter_catalog()).await;

        let out = run(&mut session, "add 🦊 | Fox | A clever fox. | cunning").await;
        assert!(out.starts_with("added 🦊"));
        assert!(out.contains("Fox"));
        assert_in_sync(&session).await;

        let out = run(&mut session, "edit 🐢 | 🐢 | Tortoise | A slow reptile. | patience").await;
        assert!(out.starts_with("updated 🐢"));
        assert_in_sync(&session).await;

        let out = run(&mut session, "delete 🐘").await;
        assert!(out.starts_with("deleted 🐘"));
        assert!(!out.contains("Elephant"));
        assert_in_sync(&session).await;
    }

    #[tokio::test]
    async fn duplicate_add_is_reported_not_fatal() {
        let mut session = session_with(starter_catalog()).await;
        let out = run(&mut session, "add 🐢 | Turtle | | ").await;
        assert!(out.starts_with("error: a record with id 🐢 already exists"));
        assert_in_sync(&session).await;
    }

    #[tokio::test]
    async fn delete_missing_is_a_warning() {
        let mut session = session_with(Vec::new()).await;
        let out = run(&mut session, "delete 🦊").await;
        assert!(out.starts_with("warning: no record with id 🦊"));
    }

    #[tokio::test]
    async fn delete_at_uses_screen_positions() {
        let mut session = session_with(starter_catalog()).await;

        // Section 1 is B, holding only Broken Heart
        let out = run(&mut session, "delete-at 1 1").await;
        assert!(out.starts_with("deleted 💔"));
        assert_in_sync(&session).await;

        let out = run(&mut session, "delete-at 9 1").await;
        assert!(out.starts_with("warning: nothing at section 9 item 1"));
    }

    #[tokio::test]
    async fn layout_toggle_redraws_in_column_mode() {
        let mut session = session_with(starter_catalog()).await;

        let out = run(&mut session, "layout").await;
        assert!(out.starts_with("layout: grid -> column [rectangle.grid.1x2]"));
        assert!(out.contains("Turtle: A cute turtle."));

        let out = run(&mut session, "layout").await;
        assert!(out.starts_with("layout: column -> grid"));
        assert!(!out.contains("A cute turtle."));
        assert_in_sync(&session).await;
    }

    #[tokio::test]
    async fn show_prints_one_record() {
        let mut session = session_with(starter_catalog()).await;

        let out = run(&mut session, "show 🐢").await;
        assert!(out.starts_with("🐢 Turtle\n  section: T"));
        assert!(out.contains("usage: Something slow"));

        let out = run(&mut session, "show 🦊").await;
        assert_eq!(out, "warning: no record with id 🦊");
    }

    #[tokio::test]
    async fn replace_keeps_placement_until_next_rebuild() {
        let mut session = session_with(starter_catalog()).await;

        let out = run(&mut session, "replace 🐢 | Slowpoke | Renamed. | patience").await;
        assert!(out.starts_with("replaced 🐢"));
        assert!(out.contains("Slowpoke"));
        assert_in_sync(&session).await;

        let changes = run(&mut session, "changes").await;
        assert!(changes.starts_with("v0 -> v1: 1 ops"));
        assert!(changes.contains("reconfigure item 🐢"));

        let out = run(&mut session, "replace 🦊 | Fox | | ").await;
        assert!(out.starts_with("warning: no record 🦊 to replace, added it instead"));
        assert_in_sync(&session).await;
    }

    #[tokio::test]
    async fn session_starts_in_the_store_layout() {
        let (sink, effects) = ChannelSink::new();
        let store = CatalogStore::with_records(starter_catalog(), sink)
            .unwrap()
            .with_layout(LayoutMode::Column);
        let mut session = Session::open(store, effects).await.unwrap();

        let out = run(&mut session, "list").await;
        assert!(out.contains("layout: column [rectangle.grid.1x2]"));
    }

    #[tokio::test]
    async fn edit_with_new_symbol_orphans_the_old_record() {
        let mut session = session_with(starter_catalog()).await;

        run(&mut session, "edit 🐢 | 🐌 | Snail | Slower still. | patience").await;
        let out = run(&mut session, "list").await;
        assert!(out.contains("Snail"));
        assert!(out.contains("Turtle"));
        assert!(out.contains("14 records"));
        assert_in_sync(&session).await;
    }

    #[tokio::test]
    async fn changes_lists_last_ops() {
        let mut session = session_with(Vec::new()).await;
        run(&mut session, "add 🦊 | Fox | | ").await;

        let out = run(&mut session, "changes").await;
        assert!(out.starts_with("v0 -> v1: 2 ops"));
        assert!(out.contains("insert section F at 0"));
        assert!(out.contains("insert item 🦊 into F[0]"));
    }

    #[tokio::test]
    async fn export_prints_json_keyed_by_symbol() {
        let mut session = session_with(vec![Record::new("🦊", "Fox", "A clever fox.", "")]).await;
        let out = run(&mut session, "export").await;
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["🦊"]["name"], "Fox");
    }

    #[tokio::test]
    async fn repl_reads_multibyte_input() {
        let mut session = session_with(Vec::new()).await;
        let input = "add 🧑‍💻 | Developer | Writes code. | apps\nshow 🧑‍💻\n".as_bytes();
        let mut output = Vec::new();

        run_repl(&mut session, input, &mut output).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("added 🧑‍💻"));
        assert!(text.contains("🧑‍💻 Developer\n  section: D"));
    }

    #[tokio::test]
    async fn repl_survives_bad_input_and_quits() {
        let mut session = session_with(Vec::new()).await;
        let input = "frobnicate\nadd 🦊 | Fox | | \n\nquit\nadd 🐢 | Turtle | | \n".as_bytes();
        let mut output = Vec::new();

        run_repl(&mut session, input, &mut output).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("(catalog is empty)"));
        assert!(text.contains("error: unknown command `frobnicate`"));
        assert!(text.contains("added 🦊"));
        assert!(text.contains("bye"));
        assert!(!text.contains("Turtle"));
    }

    #[tokio::test]
    async fn repl_ends_at_end_of_input() {
        let mut session = session_with(starter_catalog()).await;
        let input: &[u8] = b"list\n";
        let mut output = Vec::new();

        run_repl(&mut session, input, &mut output).await.unwrap();
        assert!(String::from_utf8(output).unwrap().ends_with("> "));
    }
}
