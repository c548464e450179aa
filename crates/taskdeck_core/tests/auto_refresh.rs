use std::sync::mpsc;
use std::time::Duration;
use taskdeck_core::{
    MemoryTaskRepository, RefreshScheduler, Task, TaskListContainer, TaskPriority, TaskRepository,
};

// The container is single-owner state, so the scheduler thread never touches
// it directly: ticks are forwarded over a channel into the loop that owns the
// container, mirroring a host event loop draining a timer.
#[test]
fn scheduler_ticks_drive_container_refresh_until_stopped() {
    let backend = MemoryTaskRepository::with_samples(vec![Task::new(
        "seeded entry",
        TaskPriority::Medium,
    )])
    .unwrap();
    let mut container = TaskListContainer::new(backend.clone());
    container.initialize();
    assert_eq!(container.snapshot().tasks.len(), 1);

    let (tick_tx, tick_rx) = mpsc::channel();
    let mut scheduler = RefreshScheduler::start(Duration::from_millis(20), move || {
        let _ = tick_tx.send(());
    });
    assert!(scheduler.is_running());
    assert_eq!(scheduler.interval(), Duration::from_millis(20));

    // New data lands in the backend while the container snapshot is stale.
    let mut writer = backend.clone();
    writer
        .create_task(&Task::new("arrived later", TaskPriority::Low))
        .unwrap();

    tick_rx
        .recv_timeout(Duration::from_secs(2))
        .expect("first tick should fire");
    container.refresh();
    assert_eq!(container.snapshot().tasks.len(), 2);

    scheduler.stop();
    assert!(!scheduler.is_running());

    // After stop() returns the channel drains and stays quiet.
    while tick_rx.try_recv().is_ok() {}
    std::thread::sleep(Duration::from_millis(60));
    assert!(tick_rx.try_recv().is_err());
}

#[test]
fn dropping_the_scheduler_cancels_the_thread() {
    let (tick_tx, tick_rx) = mpsc::channel();
    {
        let _scheduler = RefreshScheduler::start(Duration::from_millis(10), move || {
            let _ = tick_tx.send(());
        });
        tick_rx
            .recv_timeout(Duration::from_secs(2))
            .expect("tick should fire while scheduler is alive");
    }

    // Sender side lives in the callback; once the thread is joined the
    // channel disconnects.
    while tick_rx.try_recv().is_ok() {}
    std::thread::sleep(Duration::from_millis(40));
    assert!(matches!(
        tick_rx.try_recv(),
        Err(mpsc::TryRecvError::Disconnected)
    ));
}
