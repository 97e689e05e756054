use super::{AppResult, Change, Intent, ListView, TaskList, TaskService};
use std::sync::Arc;

/// Owns the task list and routes intents through the service.
///
/// `dispatch` awaits each intent before committing it. The terminal UI
/// instead spawns `service()` calls and feeds the results to `commit`.
pub struct StateManager {
    task_service: Arc<TaskService>,
    tasks: TaskList,
}

impl StateManager {
    pub fn new(task_service: Arc<TaskService>) -> Self {
        Self {
            task_service,
            tasks: TaskList::new(),
        }
    }

    pub async fn initialize(&mut self) -> AppResult<()> {
        self.dispatch(Intent::Load).await?;
        Ok(())
    }

    pub fn service(&self) -> Arc<TaskService> {
        self.task_service.clone()
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    #[cfg(test)]
    pub fn get_task(&self, id: &crate::domain::TaskId) -> Option<&crate::domain::Task> {
        self.tasks.get(id)
    }

    pub fn view(&self) -> ListView {
        ListView::project(&self.tasks)
    }

    /// Run an intent to completion and commit its result. Local state is only
    /// touched once the store has confirmed the change.
    pub async fn dispatch(&mut self, intent: Intent) -> AppResult<Option<Change>> {
        let change = if let Intent::SetFilter(filter) = intent {
            Some(Change::FilterChanged(filter))
        } else {
            self.task_service.execute(intent).await?
        };

        if let Some(change) = &change {
            self.commit(change.clone());
        }
        Ok(change)
    }

    pub fn commit(&mut self, change: Change) {
        self.tasks.commit(change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AppError;
    use crate::domain::{Task, TaskFilter, TaskId, TaskPatch};
    use crate::ports::{MockTaskStore, NoopEffects, StoreOperation, TransportError};
    use tokio_test::{assert_err, assert_ok};

    fn loaded(mut store: MockTaskStore, tasks: Vec<Task>) -> StateManager {
        store.expect_list().times(1).return_once(move || Ok(tasks));
        StateManager::new(Arc::new(TaskService::new(
            Arc::new(store),
            Arc::new(NoopEffects),
        )))
    }

    fn two_tasks() -> Vec<Task> {
        vec![Task::new("1", "walk dog", false), Task::new("2", "buy milk", true)]
    }

    #[tokio::test]
    async fn test_count_remaining_after_load_ignores_filter() {
        let mut manager = loaded(MockTaskStore::new(), two_tasks());
        assert_ok!(manager.initialize().await);

        for filter in TaskFilter::ALL {
            assert_ok!(manager.dispatch(Intent::SetFilter(filter)).await);
            assert_eq!(manager.tasks().count_remaining(), 1);
            assert_eq!(manager.view().remaining, 1);
        }
    }

    #[tokio::test]
    async fn test_toggle_moves_remaining_by_one() {
        let mut store = MockTaskStore::new();
        store
            .expect_patch()
            .withf(|id, patch| id == &TaskId::from("1") && patch == &TaskPatch::completed(true))
            .times(1)
            .returning(|id, _| Ok(Task::new(id.clone(), "walk dog", true)));
        store
            .expect_patch()
            .withf(|id, patch| id == &TaskId::from("2") && patch == &TaskPatch::completed(false))
            .times(1)
            .returning(|id, _| Ok(Task::new(id.clone(), "buy milk", false)));

        let mut manager = loaded(store, two_tasks());
        assert_ok!(manager.initialize().await);

        let toggle = manager.view().rows[0].toggle();
        assert_ok!(manager.dispatch(toggle).await);
        assert!(manager.get_task(&"1".into()).unwrap().completed);
        assert_eq!(manager.tasks().count_remaining(), 0);

        let toggle = manager.view().rows[1].toggle();
        assert_ok!(manager.dispatch(toggle).await);
        assert!(!manager.get_task(&"2".into()).unwrap().completed);
        assert_eq!(manager.tasks().count_remaining(), 1);
    }

    #[tokio::test]
    async fn test_whitespace_edit_never_calls_store() {
        let mut store = MockTaskStore::new();
        store.expect_patch().never();

        let mut manager = loaded(store, two_tasks());
        assert_ok!(manager.initialize().await);

        let edit = manager.view().rows[0].edit("   ");
        let change = assert_ok!(manager.dispatch(edit).await);
        assert_eq!(change, None);
        assert_eq!(manager.get_task(&"1".into()).unwrap().text, "walk dog");
    }

    #[tokio::test]
    async fn test_edit_replaces_record_with_server_copy() {
        let mut store = MockTaskStore::new();
        store
            .expect_patch()
            .withf(|_, patch| patch == &TaskPatch::text("walk the dog"))
            .times(1)
            .returning(|id, _| Ok(Task::new(id.clone(), "walk the dog", false)));

        let mut manager = loaded(store, two_tasks());
        assert_ok!(manager.initialize().await);

        let edit = manager.view().rows[0].edit("  walk the dog ");
        assert_ok!(manager.dispatch(edit).await);
        assert_eq!(manager.get_task(&"1".into()).unwrap().text, "walk the dog");
    }

    #[tokio::test]
    async fn test_create_lands_at_head() {
        let mut store = MockTaskStore::new();
        store
            .expect_create()
            .times(1)
            .returning(|text| Ok(Task::new("42", text, false)));

        let mut manager = loaded(store, two_tasks());
        assert_ok!(manager.initialize().await);
        assert_ok!(manager.dispatch(Intent::Add { text: "Buy milk".into() }).await);

        let head = &manager.tasks().tasks()[0];
        assert_eq!(head.id, TaskId::from("42"));
        assert_eq!(head.text, "Buy milk");
        assert!(!head.completed);
        assert_eq!(manager.tasks().len(), 3);
    }

    #[tokio::test]
    async fn test_bulk_clear_with_one_completed_task() {
        let mut store = MockTaskStore::new();
        store
            .expect_delete()
            .withf(|id| id == &TaskId::from("2"))
            .times(1)
            .returning(|_| Ok(()));

        let mut manager = loaded(store, two_tasks());
        assert_ok!(manager.initialize().await);

        let clear = manager.view().clear_completed.unwrap();
        assert_ok!(manager.dispatch(clear).await);
        assert_eq!(manager.tasks().len(), 1);
        assert!(manager.get_task(&"2".into()).is_none());
        assert!(manager.view().clear_completed.is_none());
    }

    #[tokio::test]
    async fn test_bulk_clear_with_nothing_completed_issues_no_calls() {
        let mut store = MockTaskStore::new();
        store.expect_delete().never();

        let mut manager = loaded(store, vec![Task::new("1", "a", false)]);
        assert_ok!(manager.initialize().await);

        assert!(manager.view().clear_completed.is_none());
        let change = assert_ok!(manager.dispatch(Intent::ClearCompleted { ids: vec![] }).await);
        assert_eq!(change, None);
        assert_eq!(manager.tasks().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_record_untouched() {
        let mut store = MockTaskStore::new();
        store
            .expect_patch()
            .times(1)
            .returning(|_, _| Err(TransportError::with_status(StoreOperation::Update, 404, "HTTP 404")));

        let mut manager = loaded(store, two_tasks());
        assert_ok!(manager.initialize().await);
        let before = manager.get_task(&"1".into()).cloned();

        let toggle = manager.view().rows[0].toggle();
        let err = assert_err!(manager.dispatch(toggle).await);
        assert!(matches!(err, AppError::Store(TransportError { status: Some(404), .. })));
        assert_eq!(manager.get_task(&"1".into()).cloned(), before);
    }

    #[tokio::test]
    async fn test_delete_removes_after_confirmation() {
        let mut store = MockTaskStore::new();
        store.expect_delete().times(1).returning(|_| Ok(()));

        let mut manager = loaded(store, two_tasks());
        assert_ok!(manager.initialize().await);

        let delete = manager.view().rows[0].delete();
        assert_ok!(manager.dispatch(delete).await);
        assert_eq!(manager.view().rows.len(), 1);
        assert_eq!(manager.tasks().count_remaining(), 0);
    }

    #[tokio::test]
    async fn test_failed_load_propagates() {
        let mut store = MockTaskStore::new();
        store
            .expect_list()
            .times(1)
            .returning(|| Err(TransportError::new(StoreOperation::List, "connection refused")));

        let mut manager = StateManager::new(Arc::new(TaskService::new(
            Arc::new(store),
            Arc::new(NoopEffects),
        )));
        assert_err!(manager.initialize().await);
        assert!(manager.tasks().is_empty());
    }
}
