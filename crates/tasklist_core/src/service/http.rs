use super::TaskService;
use crate::error::AppError;
use crate::model::{DraftTask, Task, TaskId};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

// Characters that cannot appear verbatim inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Blocking HTTP client for the Task Service.
pub struct HttpTaskService {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpTaskService {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, None)
    }

    /// Without a timeout the transport's own defaults apply.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Self {
            agent: builder.build(),
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn task_url(&self, id: &TaskId) -> String {
        let segment = utf8_percent_encode(&id.to_string(), PATH_SEGMENT).to_string();
        format!("{}/tasks/{}", self.base_url, segment)
    }
}

impl TaskService for HttpTaskService {
    fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        let url = self.collection_url();
        tracing::debug!(%url, "GET");
        let response = check(self.agent.get(&url).call(), "Failed to fetch tasks")?;
        decode(response)
    }

    fn create_task(&self, draft: &DraftTask) -> Result<Task, AppError> {
        let url = self.collection_url();
        tracing::debug!(%url, title = %draft.title, "POST");
        let response = check(self.agent.post(&url).send_json(draft), "Failed to create task")?;
        decode(response)
    }

    fn toggle_task(&self, id: &TaskId) -> Result<Task, AppError> {
        let url = format!("{}/toggle", self.task_url(id));
        tracing::debug!(%url, "PATCH");
        let response = check(self.agent.request("PATCH", &url).call(), "Failed to update task")?;
        decode(response)
    }

    fn delete_task(&self, id: &TaskId) -> Result<(), AppError> {
        let url = self.task_url(id);
        tracing::debug!(%url, "DELETE");
        check(self.agent.delete(&url).call(), "Failed to delete task")?;
        Ok(())
    }
}

/// Collapses ureq's outcome into success (2xx) or an `AppError`.
fn check(
    result: Result<ureq::Response, ureq::Error>,
    failure: &str,
) -> Result<ureq::Response, AppError> {
    match result {
        Ok(response) if (200..300).contains(&response.status()) => {
            tracing::debug!(status = response.status(), "response");
            Ok(response)
        }
        Ok(response) => Err(AppError::status(format!(
            "{failure} (HTTP {})",
            response.status()
        ))),
        Err(ureq::Error::Status(code, _)) => {
            Err(AppError::status(format!("{failure} (HTTP {code})")))
        }
        Err(ureq::Error::Transport(transport)) => Err(AppError::transport(format!(
            "{failure}: {transport}"
        ))),
    }
}

fn decode<T: DeserializeOwned>(response: ureq::Response) -> Result<T, AppError> {
    response
        .into_json::<T>()
        .map_err(|err| AppError::invalid_data(format!("invalid response body: {err}")))
}
