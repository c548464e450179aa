//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taskdeck_core` wiring
//!   end-to-end against an in-memory database.
//! - Keep output deterministic for quick local sanity checks.

use std::error::Error;
use std::process::ExitCode;
use taskdeck_core::db::open_db_in_memory;
use taskdeck_core::{
    SortDirection, SortKey, SqliteTaskRepository, TaskDraft, TaskFilter, TaskListContainer,
    TaskPriority, TaskRepository, TaskStatus,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("taskdeck smoke run failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    println!("taskdeck_core version={}", taskdeck_core::core_version());

    let mut conn = open_db_in_memory()?;
    let repo = SqliteTaskRepository::try_new(&mut conn)?;
    let mut container = TaskListContainer::new(repo);

    container.initialize();
    report_state(&container, "after initialize");

    let groceries = container.create(TaskDraft {
        title: "Buy groceries".to_string(),
        description: "milk, eggs, bread".to_string(),
        priority: TaskPriority::High,
        tags: vec!["errands".to_string()],
        due_at: None,
    });
    let _ = container.create(TaskDraft::new("Water the plants"));
    report_state(&container, "after create");

    if let Some(id) = groceries {
        // pending -> in-progress -> completed
        container.toggle_status(id);
        container.toggle_status(id);
    }
    report_state(&container, "after toggles");

    container.set_filter(TaskFilter {
        status: Some(TaskStatus::Completed),
        sort: Some(SortKey::Title),
        direction: SortDirection::Ascending,
        ..TaskFilter::default()
    });
    let completed = container.visible_tasks();
    println!("completed_view count={}", completed.len());
    for task in &completed {
        println!("completed_view item title={:?}", task.title);
    }

    Ok(())
}

fn report_state<R: TaskRepository>(container: &TaskListContainer<R>, stage: &str) {
    let snapshot = container.snapshot();
    println!(
        "state stage={stage} tasks={} error={:?}",
        snapshot.tasks.len(),
        snapshot.error
    );
    for task in &snapshot.tasks {
        println!(
            "state item title={:?} status={:?} priority={:?}",
            task.title, task.status, task.priority
        );
    }
}
