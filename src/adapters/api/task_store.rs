use super::{TaskCreateDto, TaskDto, TaskPatchDto, TodoClient};
use crate::{
    domain::{Task, TaskId, TaskPatch},
    ports::{StoreOperation, TaskStore, TransportResult},
};
use async_trait::async_trait;

const TODOS_PATH: &str = "/api/todos";

#[derive(Clone)]
pub struct HttpTaskStore {
    client: TodoClient,
}

impl HttpTaskStore {
    pub fn new(client: TodoClient) -> Self {
        Self { client }
    }

    fn task_path(id: &TaskId) -> String {
        format!("{}/{}", TODOS_PATH, urlencoding::encode(&id.0))
    }
}

#[async_trait]
impl TaskStore for HttpTaskStore {
    async fn list(&self) -> TransportResult<Vec<Task>> {
        let task_dtos: Vec<TaskDto> = self.client.get(TODOS_PATH, StoreOperation::List).await?;
        Ok(task_dtos.into_iter().map(|dto| dto.into()).collect())
    }

    async fn create(&self, text: &str) -> TransportResult<Task> {
        let create_dto = TaskCreateDto {
            text: text.to_string(),
        };

        let task_dto: TaskDto = self
            .client
            .post(TODOS_PATH, &create_dto, StoreOperation::Create)
            .await?;
        Ok(task_dto.into())
    }

    async fn patch(&self, id: &TaskId, patch: &TaskPatch) -> TransportResult<Task> {
        let path = Self::task_path(id);
        let patch_dto = TaskPatchDto::from(patch);

        let task_dto: TaskDto = self
            .client
            .patch(&path, &patch_dto, StoreOperation::Update)
            .await?;
        Ok(task_dto.into())
    }

    async fn delete(&self, id: &TaskId) -> TransportResult<()> {
        let path = Self::task_path(id);
        self.client.delete(&path, StoreOperation::Delete).await
    }
}
