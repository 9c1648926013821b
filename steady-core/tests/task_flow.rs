use chrono::{DateTime, Duration, TimeZone, Utc};
use steady_core::data::{clear_completed_tasks, user_data_stats};
use steady_core::tasks::{apply_suggestions, complete_task, create_task, list_tasks, update_task};
use steady_core::templates::{all_templates, find_template};
use steady_core::{
    AutoFill, MemoryStore, NewTask, Task, TaskCategory, TaskFilter, TaskStatus, TaskStore, TaskUpdate,
    UrgencyLevel, UrgencySource,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 15, 0, 0).unwrap()
}

/// Quick-add path: a free-text title gets scored, stored, and read back intact.
#[test]
fn test_suggested_task_survives_store_round_trip() {
    let mut store = MemoryStore::new();
    let input = NewTask {
        title: "Finish quarterly report for client meeting".to_string(),
        due_date: Some(now() + Duration::hours(30)),
        ..NewTask::default()
    };
    let input = apply_suggestions(input, &AutoFill::default(), now());
    assert_eq!(input.category, Some(TaskCategory::Work));

    let created = create_task(&mut store, "u1", input, now()).unwrap();
    assert_eq!(created.category, TaskCategory::Work);
    assert_eq!(created.urgency_source, UrgencySource::Suggested);
    // 30h out: "due tomorrow" is high
    assert_eq!(created.urgency, UrgencyLevel::High);

    let json = serde_json::to_string(&created).unwrap();
    let back: Task = serde_json::from_str(&json).unwrap();
    assert_eq!(back, created);
    assert_eq!(store.task(&created.task_id).unwrap(), created);
}

#[test]
fn test_template_to_completion_flow() {
    let mut store = MemoryStore::new();
    let templates = all_templates(&store, "u1").unwrap();
    let morning = find_template(&templates, "Morning Routine").unwrap();

    let task = create_task(&mut store, "u1", morning.to_new_task(None), now()).unwrap();
    assert_eq!(task.subtasks.len(), 5);
    assert_eq!(task.subtask_progress(), Some(0.0));

    let update = TaskUpdate {
        urgency: Some(UrgencyLevel::Low),
        status: Some(TaskStatus::InProgress),
        ..TaskUpdate::default()
    };
    let task = update_task(&mut store, &task.task_id, update, now()).unwrap();
    assert_eq!(task.status, TaskStatus::InProgress);
    assert_eq!(task.urgency_source, UrgencySource::User);

    let done = complete_task(&mut store, &task.task_id, now() + Duration::days(1)).unwrap();
    assert_eq!(done.task.time_to_completion, Some(1));
    assert_eq!(done.task.actual_duration, Some(45));
    assert!(done.next.is_none());

    let completed = TaskFilter {
        status: Some(TaskStatus::Completed),
        ..TaskFilter::default()
    };
    assert_eq!(list_tasks(&store, "u1", &completed).unwrap().len(), 1);

    assert_eq!(clear_completed_tasks(&mut store, "u1").unwrap(), 1);
    assert_eq!(user_data_stats(&store, "u1").unwrap().total_tasks, 0);
}
