//! Single-writer dispatcher.
//!
//! One task owns the store and serves requests from a queue one at a time.
//! Every other part of the program talks to it through a cloneable
//! [`CatalogHandle`], so writes are serialized and a read always observes
//! every write queued before it.

use catalog_engine::{
    CatalogError, CatalogReader, CatalogStore, CatalogWriter, ChangeSet, DeleteOutcome,
    EditOrigin, EditOutcome, LayoutMode, LayoutTransition, Record, RecordId, ReplaceOutcome,
    SideEffectSink, Snapshot,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

/// Queue capacity between handles and the store task.
const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// The store task has stopped.
#[derive(Debug, thiserror::Error)]
#[error("catalog store task is no longer running")]
pub struct DispatchError;

enum Request {
    Snapshot {
        reply: oneshot::Sender<Snapshot>,
    },
    LastChanges {
        reply: oneshot::Sender<ChangeSet>,
    },
    Record {
        id: RecordId,
        reply: oneshot::Sender<Option<Record>>,
    },
    Records {
        reply: oneshot::Sender<Vec<Record>>,
    },
    Layout {
        reply: oneshot::Sender<LayoutMode>,
    },
    Add {
        record: Record,
        reply: oneshot::Sender<Result<ChangeSet, CatalogError>>,
    },
    Replace {
        record: Record,
        reply: oneshot::Sender<ReplaceOutcome>,
    },
    Delete {
        id: RecordId,
        reply: oneshot::Sender<DeleteOutcome>,
    },
    Edit {
        origin: EditOrigin,
        record: Record,
        reply: oneshot::Sender<Result<EditOutcome, CatalogError>>,
    },
    ToggleLayout {
        materialized: Option<Vec<RecordId>>,
        reply: oneshot::Sender<LayoutTransition>,
    },
}

impl Request {
    fn name(&self) -> &'static str {
        match self {
            Request::Snapshot { .. } => "snapshot",
            Request::LastChanges { .. } => "last_changes",
            Request::Record { .. } => "record",
            Request::Records { .. } => "records",
            Request::Layout { .. } => "layout",
            Request::Add { .. } => "add",
            Request::Replace { .. } => "replace",
            Request::Delete { .. } => "delete",
            Request::Edit { .. } => "edit",
            Request::ToggleLayout { .. } => "toggle_layout",
        }
    }
}

fn handle<S: SideEffectSink>(store: &mut CatalogStore<S>, request: Request) {
    debug!(request = request.name(), "dispatching");

    // A dropped reply receiver means the caller gave up; nothing to do.
    match request {
        Request::Snapshot { reply } => {
            let _ = reply.send(store.current_snapshot());
        }
        Request::LastChanges { reply } => {
            let _ = reply.send(store.last_changes());
        }
        Request::Record { id, reply } => {
            let _ = reply.send(store.record(&id));
        }
        Request::Records { reply } => {
            let _ = reply.send(store.records());
        }
        Request::Layout { reply } => {
            let _ = reply.send(store.layout());
        }
        Request::Add { record, reply } => {
            let _ = reply.send(store.add(record));
        }
        Request::Replace { record, reply } => {
            let _ = reply.send(store.replace(record));
        }
        Request::Delete { id, reply } => {
            let _ = reply.send(store.delete(&id));
        }
        Request::Edit {
            origin,
            record,
            reply,
        } => {
            let _ = reply.send(store.apply_edit(origin, record));
        }
        Request::ToggleLayout {
            materialized,
            reply,
        } => {
            let _ = reply.send(store.toggle_layout(materialized.as_deref()));
        }
    }
}

/// Cloneable handle to the store task.
#[derive(Clone)]
pub struct CatalogHandle {
    sender: mpsc::Sender<Request>,
}

impl CatalogHandle {
    /// Moves `store` into a new task and returns a handle to it.
    ///
    /// The task ends once every handle is dropped and yields the store back.
    pub fn spawn<S>(mut store: CatalogStore<S>) -> (Self, JoinHandle<CatalogStore<S>>)
    where
        S: SideEffectSink + 'static,
    {
        let (sender, mut receiver) = mpsc::channel(DEFAULT_QUEUE_CAPACITY);

        let task = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                handle(&mut store, request);
            }
            debug!("catalog store task stopped");
            store
        });

        (Self { sender }, task)
    }

    async fn call<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Request,
    ) -> Result<T, DispatchError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(make(reply))
            .await
            .map_err(|_| DispatchError)?;
        response.await.map_err(|_| DispatchError)
    }

    pub async fn snapshot(&self) -> Result<Snapshot, DispatchError> {
        self.call(|reply| Request::Snapshot { reply }).await
    }

    pub async fn last_changes(&self) -> Result<ChangeSet, DispatchError> {
        self.call(|reply| Request::LastChanges { reply }).await
    }

    pub async fn record(&self, id: RecordId) -> Result<Option<Record>, DispatchError> {
        self.call(|reply| Request::Record { id, reply }).await
    }

    pub async fn records(&self) -> Result<Vec<Record>, DispatchError> {
        self.call(|reply| Request::Records { reply }).await
    }

    pub async fn layout(&self) -> Result<LayoutMode, DispatchError> {
        self.call(|reply| Request::Layout { reply }).await
    }

    pub async fn add(
        &self,
        record: Record,
    ) -> Result<Result<ChangeSet, CatalogError>, DispatchError> {
        self.call(|reply| Request::Add { record, reply }).await
    }

    pub async fn replace(&self, record: Record) -> Result<ReplaceOutcome, DispatchError> {
        self.call(|reply| Request::Replace { record, reply }).await
    }

    pub async fn delete(&self, id: RecordId) -> Result<DeleteOutcome, DispatchError> {
        self.call(|reply| Request::Delete { id, reply }).await
    }

    pub async fn edit(
        &self,
        origin: EditOrigin,
        record: Record,
    ) -> Result<Result<EditOutcome, CatalogError>, DispatchError> {
        self.call(|reply| Request::Edit {
            origin,
            record,
            reply,
        })
        .await
    }

    pub async fn toggle_layout(
        &self,
        materialized: Option<Vec<RecordId>>,
    ) -> Result<LayoutTransition, DispatchError> {
        self.call(|reply| Request::ToggleLayout {
            materialized,
            reply,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_engine::{RecordingSink, SkeletonView};

    fn record(symbol: &str, name: &str) -> Record {
        Record::new(symbol, name, "", "")
    }

    #[tokio::test]
    async fn writes_then_reads_observe_them() {
        let (handle, _task) = CatalogHandle::spawn(CatalogStore::new(RecordingSink::new()));

        handle.add(record("😀", "Grinning Face")).await.unwrap().unwrap();
        handle.add(record("😕", "Confused Face")).await.unwrap().unwrap();

        let snapshot = handle.snapshot().await.unwrap();
        let keys: Vec<_> = snapshot.section_keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["C", "G"]);
        assert_eq!(snapshot.version(), 2);
    }

    #[tokio::test]
    async fn duplicate_add_reports_catalog_error() {
        let (handle, _task) = CatalogHandle::spawn(CatalogStore::new(RecordingSink::new()));

        handle.add(record("🐢", "Turtle")).await.unwrap().unwrap();
        let result = handle.add(record("🐢", "Turtle")).await.unwrap();

        assert!(matches!(result, Err(CatalogError::DuplicateId(_))));
        assert_eq!(handle.records().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_writers_are_serialized() {
        let (handle, task) = CatalogHandle::spawn(CatalogStore::new(RecordingSink::new()));

        let mut writers = Vec::new();
        for i in 0..20 {
            let handle = handle.clone();
            writers.push(tokio::spawn(async move {
                handle
                    .add(record(&format!("s{i}"), &format!("Name {i}")))
                    .await
                    .unwrap()
                    .unwrap();
            }));
        }
        for writer in writers {
            writer.await.unwrap();
        }

        assert_eq!(handle.snapshot().await.unwrap().item_count(), 20);
        drop(handle);

        // Every emitted change set chains onto the previous one
        let store = task.await.unwrap();
        let effects = store.sink().effects();
        assert_eq!(effects.len(), 20);

        let mut view = SkeletonView::new();
        for (i, effect) in effects.iter().enumerate() {
            let changes = effect.changes().unwrap();
            assert_eq!(changes.from_version(), i as u64);
            view.apply(changes).unwrap();
        }
        assert!(view.matches(&store.current_snapshot()));
    }

    #[tokio::test]
    async fn toggle_and_delete_through_handle() {
        let (handle, _task) = CatalogHandle::spawn(CatalogStore::new(RecordingSink::new()));
        handle.add(record("🐢", "Turtle")).await.unwrap().unwrap();

        let transition = handle.toggle_layout(None).await.unwrap();
        assert_eq!(transition.to, LayoutMode::Column);
        assert_eq!(handle.layout().await.unwrap(), LayoutMode::Column);

        let outcome = handle.delete(RecordId::from("🐢")).await.unwrap();
        assert!(outcome.is_deleted());
        assert!(handle.record(RecordId::from("🐢")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn edit_and_replace_through_handle() {
        let (handle, _task) = CatalogHandle::spawn(CatalogStore::new(RecordingSink::new()));
        handle
            .edit(EditOrigin::New, record("🏁", "Checkered Flag"))
            .await
            .unwrap()
            .unwrap();

        let outcome = handle.replace(record("🏁", "Finish")).await.unwrap();
        assert!(matches!(outcome, ReplaceOutcome::Replaced(_)));
        assert_eq!(handle.last_changes().await.unwrap().ops().len(), 1);
    }
}
