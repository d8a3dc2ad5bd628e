//! Local mirror of the remote task collection.
//!
//! [`TaskListController`] owns everything the front end displays: the task
//! list, the loading flag, the current error message and the draft being
//! typed. Each operation issues one request through a [`TaskService`] and
//! only touches the task list once the service has confirmed the change.

use crate::error::AppError;
use crate::model::{DraftTask, Task, TaskId};
use crate::service::TaskService;

pub const TITLE_REQUIRED: &str = "Task title is required";

/// Snapshot handed to observers after every transition.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskListState {
    pub tasks: Vec<Task>,
    pub loading: bool,
    pub error: Option<String>,
    pub draft: DraftTask,
}

impl TaskListState {
    pub fn find(&self, raw_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id.matches(raw_id))
    }
}

pub trait StateObserver {
    fn state_changed(&mut self, state: &TaskListState);
}

pub struct TaskListController<S: TaskService> {
    service: S,
    state: TaskListState,
    observers: Vec<Box<dyn StateObserver>>,
}

impl<S: TaskService> TaskListController<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: TaskListState::default(),
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn StateObserver>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> &TaskListState {
        &self.state
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn draft(&self) -> &DraftTask {
        &self.state.draft
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn set_draft_title<T: Into<String>>(&mut self, title: T) {
        self.state.draft.title = title.into();
        self.notify();
    }

    pub fn set_draft_description<D: Into<String>>(&mut self, description: D) {
        self.state.draft.description = description.into();
        self.notify();
    }

    pub fn set_draft(&mut self, draft: DraftTask) {
        self.state.draft = draft;
        self.notify();
    }

    /// Startup hook: the initial fetch.
    pub fn start(&mut self) -> Result<(), AppError> {
        self.load()
    }

    pub fn load(&mut self) -> Result<(), AppError> {
        self.state.loading = true;
        self.state.error = None;
        self.notify();

        let result = self.service.list_tasks();
        self.state.loading = false;
        match result {
            Ok(tasks) => {
                tracing::debug!(count = tasks.len(), "loaded tasks");
                self.state.tasks = tasks;
                self.notify();
                Ok(())
            }
            Err(err) => Err(self.fail("Error fetching tasks", err)),
        }
    }

    /// Submits the current draft and clears it on success.
    pub fn create(&mut self) -> Result<Task, AppError> {
        let draft = self.state.draft.clone();
        self.create_with(&draft, true)
    }

    /// Submits `draft` without reading or clearing the stored draft.
    pub fn create_from(&mut self, draft: &DraftTask) -> Result<Task, AppError> {
        self.create_with(draft, false)
    }

    fn create_with(&mut self, draft: &DraftTask, clear_draft: bool) -> Result<Task, AppError> {
        if !draft.has_title() {
            self.state.error = Some(TITLE_REQUIRED.to_string());
            self.notify();
            return Err(AppError::invalid_input(TITLE_REQUIRED));
        }

        self.state.error = None;
        match self.service.create_task(draft) {
            Ok(task) => {
                tracing::debug!(id = %task.id, "created task");
                self.state.tasks.push(task.clone());
                if clear_draft {
                    self.state.draft.clear();
                }
                self.notify();
                Ok(task)
            }
            Err(err) => Err(self.fail("Error creating task", err)),
        }
    }

    pub fn toggle_completion(&mut self, task: &Task) -> Result<Task, AppError> {
        match self.service.toggle_task(&task.id) {
            Ok(updated) => {
                tracing::debug!(id = %task.id, completed = updated.completed, "toggled task");
                // Applied to the list as it is now, not as it was when the
                // caller read `task`.
                for slot in self.state.tasks.iter_mut() {
                    if slot.id == task.id {
                        *slot = updated.clone();
                    }
                }
                self.notify();
                Ok(updated)
            }
            Err(err) => Err(self.fail("Error updating task", err)),
        }
    }

    pub fn remove(&mut self, id: &TaskId) -> Result<(), AppError> {
        match self.service.delete_task(id) {
            Ok(()) => {
                tracing::debug!(%id, "deleted task");
                self.state.tasks.retain(|task| &task.id != id);
                self.notify();
                Ok(())
            }
            Err(err) => Err(self.fail("Error deleting task", err)),
        }
    }

    fn fail(&mut self, context: &str, err: AppError) -> AppError {
        let message = format!("{context}: {}", err.message());
        if err.is_remote() {
            tracing::warn!(code = err.code(), "{}", message);
        } else {
            tracing::debug!(code = err.code(), "{}", message);
        }
        self.state.error = Some(message);
        self.notify();
        err
    }

    fn notify(&mut self) {
        for observer in self.observers.iter_mut() {
            observer.state_changed(&self.state);
        }
    }
}
