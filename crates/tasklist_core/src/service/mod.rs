use crate::error::AppError;
use crate::model::{DraftTask, Task, TaskId};

mod http;
pub use http::{DEFAULT_API_BASE_URL, HttpTaskService};

/// The remote collection the controller mirrors.
///
/// Implementations are expected to perform exactly one attempt per call and
/// report any non-success outcome as an error; the controller decides what
/// happens to local state.
pub trait TaskService: Send + Sync {
    /// `GET /tasks`
    fn list_tasks(&self) -> Result<Vec<Task>, AppError>;

    /// `POST /tasks`
    fn create_task(&self, draft: &DraftTask) -> Result<Task, AppError>;

    /// `PATCH /tasks/{id}/toggle`
    fn toggle_task(&self, id: &TaskId) -> Result<Task, AppError>;

    /// `DELETE /tasks/{id}`
    fn delete_task(&self, id: &TaskId) -> Result<(), AppError>;
}
