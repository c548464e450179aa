//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `tasks` row store.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Tag links are replaced atomically with their task row.
//! - List order is stable: creation time ascending, then ID ascending.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::task::{normalize_tags, Task, TaskId, TaskPriority, TaskStatus, TaskValidationError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    description,
    status,
    priority,
    created_at,
    due_at,
    completed_at
FROM tasks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task persistence, query and transport operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    NotFound(TaskId),
    /// Remote endpoint answered outside the 2xx range.
    Remote {
        status: u16,
        message: String,
    },
    /// Connectivity or protocol failure before any response status existed.
    Transport(String),
    /// Connection has no applied schema yet.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Remote { status, message } => {
                write!(f, "remote request failed with status {status}: {message}")
            }
            Self::Transport(message) => write!(f, "transport failure: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is not initialized (expected {expected_version})"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Exact tag membership match, case-insensitive.
    pub tag: Option<String>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for task CRUD operations.
///
/// Backends are not transactional across entities; batch callers get
/// per-item semantics with no partial-failure rollback.
pub trait TaskRepository {
    fn create_task(&mut self, task: &Task) -> RepoResult<TaskId>;
    /// Fails with [`RepoError::NotFound`] when the ID does not exist.
    fn update_task(&mut self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
    /// Returns whether a task was removed. Absent IDs report `false`.
    fn delete_task(&mut self, id: TaskId) -> RepoResult<bool>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// Rejects connections whose schema was never applied or no longer
    /// carries the tables and columns this repository relies on.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&mut self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        let tags = normalize_tags(&task.tags);
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO tasks (
                uuid,
                title,
                description,
                status,
                priority,
                created_at,
                due_at,
                completed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                task.id.to_string(),
                task.title.as_str(),
                task.description.as_str(),
                status_to_db(task.status),
                priority_to_db(task.priority),
                task.created_at,
                task.due_at,
                task.completed_at,
            ],
        )?;
        replace_tag_links(&tx, task.id, &tags)?;
        tx.commit()?;

        Ok(task.id)
    }

    fn update_task(&mut self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let tags = normalize_tags(&task.tags);
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE tasks
             SET
                title = ?1,
                description = ?2,
                status = ?3,
                priority = ?4,
                due_at = ?5,
                completed_at = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?7;",
            params![
                task.title.as_str(),
                task.description.as_str(),
                status_to_db(task.status),
                priority_to_db(task.priority),
                task.due_at,
                task.completed_at,
                task.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(task.id));
        }

        replace_tag_links(&tx, task.id, &tags)?;
        tx.commit()?;
        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            let mut task = parse_task_row(row)?;
            task.tags = load_tags_for_task(&*self.conn, task.id)?;
            task.validate()?;
            return Ok(Some(task));
        }

        Ok(None)
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status_to_db(status).to_string()));
        }

        if let Some(priority) = query.priority {
            sql.push_str(" AND priority = ?");
            bind_values.push(Value::Text(priority_to_db(priority).to_string()));
        }

        if let Some(tag) = query.tag.as_ref() {
            sql.push_str(
                " AND EXISTS (
                    SELECT 1
                    FROM task_tags tt
                    INNER JOIN tags t ON t.id = tt.tag_id
                    WHERE tt.task_uuid = tasks.uuid
                      AND t.name = ? COLLATE NOCASE
                )",
            );
            bind_values.push(Value::Text(tag.clone()));
        }

        sql.push_str(" ORDER BY created_at ASC, uuid ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        for task in &mut tasks {
            task.tags = load_tags_for_task(&*self.conn, task.id)?;
            task.validate()?;
        }

        Ok(tasks)
    }

    fn delete_task(&mut self, id: TaskId) -> RepoResult<bool> {
        // Tag links go with the row via ON DELETE CASCADE.
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE uuid = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }
}

/// Checks whether `task` satisfies the query predicates.
///
/// Shared by the in-memory backends, which filter after the fact instead of
/// in SQL.
pub(crate) fn matches_query(task: &Task, query: &TaskListQuery) -> bool {
    if let Some(status) = query.status {
        if task.status != status {
            return false;
        }
    }
    if let Some(priority) = query.priority {
        if task.priority != priority {
            return false;
        }
    }
    if let Some(tag) = query.tag.as_ref() {
        let needle = tag.trim().to_lowercase();
        if !task.tags.iter().any(|candidate| candidate == &needle) {
            return false;
        }
    }
    true
}

/// Applies offset/limit pagination the way the SQL backends do.
pub(crate) fn apply_page(tasks: Vec<Task>, query: &TaskListQuery) -> Vec<Task> {
    let skipped = tasks.into_iter().skip(query.offset as usize);
    match query.limit {
        Some(limit) => skipped.take(limit as usize).collect(),
        None => skipped.collect(),
    }
}

fn replace_tag_links(
    tx: &rusqlite::Transaction<'_>,
    task_id: TaskId,
    tags: &[String],
) -> RepoResult<()> {
    let task_uuid = task_id.to_string();
    tx.execute(
        "DELETE FROM task_tags WHERE task_uuid = ?1;",
        [task_uuid.as_str()],
    )?;

    for tag in tags {
        tx.execute(
            "INSERT OR IGNORE INTO tags (name) VALUES (?1);",
            [tag.as_str()],
        )?;
        tx.execute(
            "INSERT INTO task_tags (task_uuid, tag_id)
             SELECT ?1, id
             FROM tags
             WHERE name = ?2 COLLATE NOCASE;",
            params![task_uuid.as_str(), tag.as_str()],
        )?;
    }

    Ok(())
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in tasks.uuid"))
    })?;

    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in tasks.status"))
    })?;

    let priority_text: String = row.get("priority")?;
    let priority = parse_priority(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_text}` in tasks.priority"
        ))
    })?;

    Ok(Task {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        status,
        priority,
        tags: Vec::new(),
        created_at: row.get("created_at")?,
        due_at: row.get("due_at")?,
        completed_at: row.get("completed_at")?,
    })
}

fn load_tags_for_task(conn: &Connection, task_id: TaskId) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT t.name
         FROM task_tags tt
         INNER JOIN tags t ON t.id = tt.tag_id
         WHERE tt.task_uuid = ?1
         ORDER BY t.name COLLATE NOCASE ASC;",
    )?;
    let mut rows = stmt.query([task_id.to_string()])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        tags.push(value.to_lowercase());
    }
    Ok(tags)
}

pub(crate) fn status_to_db(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "pending",
        TaskStatus::InProgress => "in_progress",
        TaskStatus::Completed => "completed",
        TaskStatus::Cancelled => "cancelled",
    }
}

pub(crate) fn parse_status(value: &str) -> Option<TaskStatus> {
    match value {
        "pending" => Some(TaskStatus::Pending),
        "in_progress" => Some(TaskStatus::InProgress),
        "completed" => Some(TaskStatus::Completed),
        "cancelled" => Some(TaskStatus::Cancelled),
        _ => None,
    }
}

pub(crate) fn priority_to_db(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::Low => "low",
        TaskPriority::Medium => "medium",
        TaskPriority::High => "high",
        TaskPriority::Urgent => "urgent",
    }
}

pub(crate) fn parse_priority(value: &str) -> Option<TaskPriority> {
    match value {
        "low" => Some(TaskPriority::Low),
        "medium" => Some(TaskPriority::Medium),
        "high" => Some(TaskPriority::High),
        "urgent" => Some(TaskPriority::Urgent),
        _ => None,
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version == 0 {
        return Err(RepoError::UninitializedConnection {
            expected_version: latest_version(),
            actual_version,
        });
    }

    for table in ["tasks", "tags", "task_tags"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    for column in [
        "uuid",
        "title",
        "description",
        "status",
        "priority",
        "created_at",
        "due_at",
        "completed_at",
    ] {
        if !table_has_column(conn, "tasks", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "tasks",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &'static str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
