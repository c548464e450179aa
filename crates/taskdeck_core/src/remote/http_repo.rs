//! HTTP/JSON task repository.
//!
//! # Responsibility
//! - Implement the repository contract over a REST-style JSON endpoint.
//! - Map response statuses onto the repository error taxonomy.
//!
//! # Invariants
//! - Any 2xx status with a parseable body is success.
//! - Non-2xx statuses surface as `RepoError::Remote` carrying status and
//!   response text; connectivity failures surface as
//!   `RepoError::Transport`.
//! - 404 maps per operation: `None` on get, `NotFound` on update, `false`
//!   on delete.
//! - Unknown enum text in a payload is rejected, never coerced.

use crate::model::task::{normalize_tags, Task, TaskId};
use crate::repo::task_repo::{
    parse_priority, parse_status, priority_to_db, status_to_db, RepoError, RepoResult,
    TaskListQuery, TaskRepository,
};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

// Bounded so a dead endpoint reports a transport failure instead of
// pinning a loading flag forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Wire shape exchanged with the endpoint. Enums travel as snake_case text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TaskWire {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    status: String,
    priority: String,
    #[serde(default)]
    tags: Vec<String>,
    created_at: i64,
    #[serde(default)]
    due_at: Option<i64>,
    #[serde(default)]
    completed_at: Option<i64>,
}

fn to_wire(task: &Task) -> TaskWire {
    TaskWire {
        id: task.id.to_string(),
        title: task.title.clone(),
        description: task.description.clone(),
        status: status_to_db(task.status).to_string(),
        priority: priority_to_db(task.priority).to_string(),
        tags: task.tags.clone(),
        created_at: task.created_at,
        due_at: task.due_at,
        completed_at: task.completed_at,
    }
}

fn from_wire(wire: TaskWire) -> RepoResult<Task> {
    let id = Uuid::parse_str(&wire.id)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{}` in payload", wire.id)))?;
    let status = parse_status(&wire.status).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{}` in payload", wire.status))
    })?;
    let priority = parse_priority(&wire.priority).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid priority `{}` in payload", wire.priority))
    })?;

    let task = Task {
        id,
        title: wire.title,
        description: wire.description,
        status,
        priority,
        tags: normalize_tags(&wire.tags),
        created_at: wire.created_at,
        due_at: wire.due_at,
        completed_at: wire.completed_at,
    };
    task.validate()?;
    Ok(task)
}

/// Query-string parameters for a list request.
fn list_query_params(query: &TaskListQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(status) = query.status {
        params.push(("status", status_to_db(status).to_string()));
    }
    if let Some(priority) = query.priority {
        params.push(("priority", priority_to_db(priority).to_string()));
    }
    if let Some(tag) = query.tag.as_ref() {
        params.push(("tag", tag.clone()));
    }
    if let Some(limit) = query.limit {
        params.push(("limit", limit.to_string()));
    }
    if query.offset > 0 {
        params.push(("offset", query.offset.to_string()));
    }
    params
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn transport(err: reqwest::Error) -> RepoError {
    RepoError::Transport(err.to_string())
}

fn remote_error(status: StatusCode, response: Response) -> RepoError {
    let message = response
        .text()
        .unwrap_or_default()
        .chars()
        .take(512)
        .collect::<String>();
    RepoError::Remote {
        status: status.as_u16(),
        message,
    }
}

/// Task repository talking to a REST/JSON endpoint.
///
/// Expected routes relative to the base URL:
/// `GET /tasks`, `POST /tasks`, `GET|PUT|DELETE /tasks/{id}`.
pub struct HttpTaskRepository {
    client: Client,
    base_url: String,
}

impl HttpTaskRepository {
    pub fn try_new(base_url: &str) -> RepoResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(transport)?;
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn task_url(&self, id: TaskId) -> String {
        format!("{}/tasks/{id}", self.base_url)
    }
}

impl TaskRepository for HttpTaskRepository {
    fn create_task(&mut self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        let response = self
            .client
            .post(self.collection_url())
            .json(&to_wire(task))
            .send()
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(remote_error(status, response));
        }
        Ok(task.id)
    }

    fn update_task(&mut self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let response = self
            .client
            .put(self.task_url(task.id))
            .json(&to_wire(task))
            .send()
            .map_err(transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RepoError::NotFound(task.id));
        }
        if !status.is_success() {
            return Err(remote_error(status, response));
        }
        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let response = self
            .client
            .get(self.task_url(id))
            .send()
            .map_err(transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(remote_error(status, response));
        }

        let wire: TaskWire = response
            .json()
            .map_err(|err| RepoError::InvalidData(format!("unparseable task payload: {err}")))?;
        from_wire(wire).map(Some)
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let response = self
            .client
            .get(self.collection_url())
            .query(&list_query_params(query))
            .send()
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(remote_error(status, response));
        }

        let wires: Vec<TaskWire> = response
            .json()
            .map_err(|err| RepoError::InvalidData(format!("unparseable task list: {err}")))?;
        wires.into_iter().map(from_wire).collect()
    }

    fn delete_task(&mut self, id: TaskId) -> RepoResult<bool> {
        let response = self
            .client
            .delete(self.task_url(id))
            .send()
            .map_err(transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !status.is_success() {
            return Err(remote_error(status, response));
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::{from_wire, list_query_params, normalize_base_url, to_wire, TaskWire};
    use crate::model::task::{Task, TaskPriority, TaskStatus};
    use crate::repo::task_repo::{RepoError, TaskListQuery};

    fn wire_fixture() -> TaskWire {
        TaskWire {
            id: "00000000-0000-4000-8000-000000000001".to_string(),
            title: "sync calendars".to_string(),
            description: String::new(),
            status: "in_progress".to_string(),
            priority: "high".to_string(),
            tags: vec!["Work".to_string()],
            created_at: 1_700_000_000_000,
            due_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn wire_roundtrip_preserves_fields() {
        let task = from_wire(wire_fixture()).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.tags, vec!["work"]);

        let wire = to_wire(&task);
        assert_eq!(wire.status, "in_progress");
        assert_eq!(wire.priority, "high");
        assert_eq!(wire.id, "00000000-0000-4000-8000-000000000001");
    }

    #[test]
    fn unknown_status_text_is_rejected() {
        let mut wire = wire_fixture();
        wire.status = "paused".to_string();
        let err = from_wire(wire).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(message) if message.contains("paused")));
    }

    #[test]
    fn inconsistent_completion_stamp_is_rejected() {
        let mut wire = wire_fixture();
        wire.completed_at = Some(1_700_000_001_000);
        let err = from_wire(wire).unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[test]
    fn list_params_cover_every_set_field() {
        let query = TaskListQuery {
            status: Some(TaskStatus::Pending),
            priority: Some(TaskPriority::Urgent),
            tag: Some("errands".to_string()),
            limit: Some(25),
            offset: 50,
        };
        let params = list_query_params(&query);
        assert_eq!(
            params,
            vec![
                ("status", "pending".to_string()),
                ("priority", "urgent".to_string()),
                ("tag", "errands".to_string()),
                ("limit", "25".to_string()),
                ("offset", "50".to_string()),
            ]
        );

        assert!(list_query_params(&TaskListQuery::default()).is_empty());
    }

    #[test]
    fn base_url_loses_trailing_slashes() {
        assert_eq!(
            normalize_base_url(" https://api.example.com/v1/ "),
            "https://api.example.com/v1"
        );
        let task = Task::new("probe", TaskPriority::Low);
        let repo = super::HttpTaskRepository::try_new("https://api.example.com/v1/").unwrap();
        assert_eq!(
            repo.task_url(task.id),
            format!("https://api.example.com/v1/tasks/{}", task.id)
        );
    }
}
