use super::{AppResult, Change, Intent};
use crate::domain::*;
use crate::ports::{EffectSink, TaskStore};
use std::sync::Arc;

/// Turns intents into store calls.
///
/// Holds no task state: each call returns the confirmed `Change` for the
/// caller to commit, so the same service can run inline or on a spawned task.
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    effects: Arc<dyn EffectSink>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>, effects: Arc<dyn EffectSink>) -> Self {
        Self { store, effects }
    }

    /// Run one intent. `Ok(None)` means nothing happened: blank input or an
    /// empty bulk clear, none of which reach the server.
    pub async fn execute(&self, intent: Intent) -> AppResult<Option<Change>> {
        match intent {
            Intent::Load => self.load().await.map(Some),
            Intent::Add { text } => self.add(&text).await,
            Intent::SetCompleted { id, completed } => {
                self.set_completed(&id, completed).await.map(Some)
            }
            Intent::Edit { id, text } => self.edit(&id, &text).await,
            Intent::Delete { id } => self.delete(&id).await.map(Some),
            Intent::ClearCompleted { ids } => self.clear_completed(ids).await,
            Intent::SetFilter(filter) => Ok(Some(Change::FilterChanged(filter))),
        }
    }

    pub async fn load(&self) -> AppResult<Change> {
        let tasks = self.store.list().await?;
        tracing::info!("Loaded {} tasks", tasks.len());
        Ok(Change::Loaded(tasks))
    }

    pub async fn add(&self, raw: &str) -> AppResult<Option<Change>> {
        let Ok(text) = normalize_text(raw) else {
            tracing::debug!("Ignoring blank submission");
            return Ok(None);
        };

        let task = self.store.create(&text).await?;
        tracing::info!("Created task {}", task.id);
        self.effects.emit(TaskEvent::Created(task.clone()));
        Ok(Some(Change::Created(task)))
    }

    pub async fn set_completed(&self, id: &TaskId, completed: bool) -> AppResult<Change> {
        let task = self.store.patch(id, &TaskPatch::completed(completed)).await?;
        tracing::info!("Task {} completed={}", task.id, task.completed);

        if completed && task.completed {
            self.effects.emit(TaskEvent::Completed(task.clone()));
        }
        Ok(Change::Updated(task))
    }

    /// Blank text is discarded before any request; the stored text stays.
    pub async fn edit(&self, id: &TaskId, raw: &str) -> AppResult<Option<Change>> {
        let Ok(text) = normalize_text(raw) else {
            tracing::debug!("Discarding blank edit of task {}", id);
            return Ok(None);
        };

        let task = self.store.patch(id, &TaskPatch::text(text)).await?;
        tracing::info!("Renamed task {}", task.id);
        Ok(Some(Change::Updated(task)))
    }

    pub async fn delete(&self, id: &TaskId) -> AppResult<Change> {
        self.store.delete(id).await?;
        tracing::info!("Deleted task {}", id);
        self.effects.emit(TaskEvent::Deleted(id.clone()));
        Ok(Change::Deleted(id.clone()))
    }

    /// Deletes one at a time, in order. A failure stops the sweep and leaves
    /// the already-deleted tasks deleted on the server; nothing is committed
    /// locally in that case.
    pub async fn clear_completed(&self, ids: Vec<TaskId>) -> AppResult<Option<Change>> {
        if ids.is_empty() {
            return Ok(None);
        }

        for id in &ids {
            self.store.delete(id).await?;
            tracing::debug!("Cleared task {}", id);
        }

        tracing::info!("Cleared {} completed tasks", ids.len());
        self.effects.emit(TaskEvent::ClearedCompleted { count: ids.len() });
        Ok(Some(Change::Cleared(ids)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{MockTaskStore, StoreOperation, TransportError};
    use mockall::{predicate::eq, Sequence};
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

    fn service(store: MockTaskStore) -> (TaskService, UnboundedReceiver<TaskEvent>) {
        let (tx, rx) = unbounded_channel();
        (TaskService::new(Arc::new(store), Arc::new(tx)), rx)
    }

    #[tokio::test]
    async fn test_add_trims_and_emits_created() {
        let mut store = MockTaskStore::new();
        store
            .expect_create()
            .withf(|text| text == "Buy milk")
            .times(1)
            .returning(|text| Ok(Task::new("10", text, false)));

        let (service, mut events) = service(store);
        let change = service.add("  Buy milk  ").await.unwrap();

        assert_eq!(change, Some(Change::Created(Task::new("10", "Buy milk", false))));
        assert!(matches!(events.try_recv(), Ok(TaskEvent::Created(t)) if t.id == TaskId::from("10")));
    }

    #[tokio::test]
    async fn test_blank_add_never_reaches_store() {
        let mut store = MockTaskStore::new();
        store.expect_create().never();

        let (service, mut events) = service(store);
        assert_eq!(service.add(" \t ").await.unwrap(), None);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_uncompleting_does_not_celebrate() {
        let mut store = MockTaskStore::new();
        store
            .expect_patch()
            .withf(|id, patch| id == &TaskId::from("1") && patch == &TaskPatch::completed(false))
            .times(1)
            .returning(|id, _| Ok(Task::new(id.clone(), "a", false)));

        let (service, mut events) = service(store);
        service.set_completed(&"1".into(), false).await.unwrap();
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_clear_completed_deletes_sequentially_in_order() {
        let mut store = MockTaskStore::new();
        let mut seq = Sequence::new();
        for id in ["2", "4"] {
            store
                .expect_delete()
                .with(eq(TaskId::from(id)))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(()));
        }

        let (service, mut events) = service(store);
        let change = service
            .clear_completed(vec!["2".into(), "4".into()])
            .await
            .unwrap();

        assert_eq!(change, Some(Change::Cleared(vec!["2".into(), "4".into()])));
        assert_eq!(events.try_recv().unwrap(), TaskEvent::ClearedCompleted { count: 2 });
    }

    #[tokio::test]
    async fn test_clear_completed_stops_at_first_failure() {
        let mut store = MockTaskStore::new();
        store
            .expect_delete()
            .with(eq(TaskId::from("2")))
            .times(1)
            .returning(|_| Err(TransportError::with_status(StoreOperation::Delete, 500, "HTTP 500")));
        store.expect_delete().with(eq(TaskId::from("4"))).never();

        let (service, mut events) = service(store);
        let result = service.clear_completed(vec!["2".into(), "4".into()]).await;

        assert!(matches!(result, Err(crate::application::AppError::Store(_))));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_filter_intent_skips_store() {
        let (service, _events) = service(MockTaskStore::new());
        let change = service.execute(Intent::SetFilter(TaskFilter::Completed)).await.unwrap();
        assert_eq!(change, Some(Change::FilterChanged(TaskFilter::Completed)));
    }
}
