//! Bulk data management: clearing history, exports, and per-user counts.

use serde::Serialize;

use crate::store::{CheckInStore, StoreResult, TaskStore, TemplateStore};
use crate::task::TaskStatus;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserDataStats {
    pub total_tasks: usize,
    pub pending_tasks: usize,
    pub in_progress_tasks: usize,
    pub completed_tasks: usize,
    pub archived_tasks: usize,
    pub check_ins: usize,
    pub custom_templates: usize,
}

fn clear_tasks_with_status(
    store: &mut impl TaskStore,
    user_id: &str,
    status: TaskStatus,
) -> StoreResult<usize> {
    let doomed: Vec<String> = store
        .tasks_for_user(user_id)?
        .into_iter()
        .filter(|t| t.status == status)
        .map(|t| t.task_id)
        .collect();
    for id in &doomed {
        store.delete_task(id)?;
    }
    tracing::debug!(user_id, %status, removed = doomed.len(), "cleared tasks");
    Ok(doomed.len())
}

pub fn clear_completed_tasks(store: &mut impl TaskStore, user_id: &str) -> StoreResult<usize> {
    clear_tasks_with_status(store, user_id, TaskStatus::Completed)
}

pub fn clear_archived_tasks(store: &mut impl TaskStore, user_id: &str) -> StoreResult<usize> {
    clear_tasks_with_status(store, user_id, TaskStatus::Archived)
}

pub fn clear_wellness_history(store: &mut impl CheckInStore, user_id: &str) -> StoreResult<usize> {
    let removed = store.delete_check_ins_for_user(user_id)?;
    tracing::debug!(user_id, removed, "cleared wellness history");
    Ok(removed)
}

/// Pretty JSON array of the user's tasks, oldest first.
pub fn export_tasks_json(store: &impl TaskStore, user_id: &str) -> StoreResult<String> {
    let mut tasks = store.tasks_for_user(user_id)?;
    tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(serde_json::to_string_pretty(&tasks)?)
}

/// Pretty JSON array of the user's check-ins, oldest first.
pub fn export_wellness_json(store: &impl CheckInStore, user_id: &str) -> StoreResult<String> {
    let mut check_ins = store.check_ins_for_user(user_id)?;
    check_ins.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    Ok(serde_json::to_string_pretty(&check_ins)?)
}

pub fn user_data_stats<S>(store: &S, user_id: &str) -> StoreResult<UserDataStats>
where
    S: TaskStore + CheckInStore + TemplateStore,
{
    let tasks = store.tasks_for_user(user_id)?;
    let count = |s: TaskStatus| tasks.iter().filter(|t| t.status == s).count();

    Ok(UserDataStats {
        total_tasks: tasks.len(),
        pending_tasks: count(TaskStatus::Pending),
        in_progress_tasks: count(TaskStatus::InProgress),
        completed_tasks: count(TaskStatus::Completed),
        archived_tasks: count(TaskStatus::Archived),
        check_ins: store.check_ins_for_user(user_id)?.len(),
        custom_templates: store.templates_for_user(user_id)?.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::task::Task;
    use crate::wellness::{CheckInType, WellnessCheckIn};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).unwrap()
    }

    fn seeded() -> MemoryStore {
        let mut store = MemoryStore::new();
        let statuses = [
            TaskStatus::Pending,
            TaskStatus::Completed,
            TaskStatus::Completed,
            TaskStatus::Archived,
            TaskStatus::InProgress,
        ];
        for (i, status) in statuses.into_iter().enumerate() {
            let t = Task::new(format!("t{i}"), "u1", format!("Task {i}"), now() + Duration::minutes(i as i64))
                .with_status(status);
            store.insert_task(t).unwrap();
        }
        store
            .insert_task(Task::new("other", "u2", "Theirs", now()).with_status(TaskStatus::Completed))
            .unwrap();
        for i in 0..3 {
            store
                .insert_check_in(WellnessCheckIn {
                    check_in_id: format!("c{i}"),
                    user_id: "u1".to_string(),
                    check_in_type: CheckInType::Hydration,
                    timestamp: now() - Duration::hours(i),
                    mood: None,
                    energy: None,
                    notes: None,
                    tags: vec![],
                    created_at: now(),
                })
                .unwrap();
        }
        store
    }

    #[test]
    fn test_stats_by_status() {
        let store = seeded();
        let stats = user_data_stats(&store, "u1").unwrap();
        assert_eq!(
            stats,
            UserDataStats {
                total_tasks: 5,
                pending_tasks: 1,
                in_progress_tasks: 1,
                completed_tasks: 2,
                archived_tasks: 1,
                check_ins: 3,
                custom_templates: 0,
            }
        );
    }

    #[test]
    fn test_clear_only_touches_one_user_and_status() {
        let mut store = seeded();
        assert_eq!(clear_completed_tasks(&mut store, "u1").unwrap(), 2);
        assert_eq!(clear_archived_tasks(&mut store, "u1").unwrap(), 1);
        assert_eq!(store.tasks_for_user("u1").unwrap().len(), 2);
        assert_eq!(store.tasks_for_user("u2").unwrap().len(), 1);

        assert_eq!(clear_wellness_history(&mut store, "u1").unwrap(), 3);
        assert!(store.check_ins_for_user("u1").unwrap().is_empty());
    }

    #[test]
    fn test_exports_are_ordered_json_arrays() {
        let store = seeded();
        let tasks: serde_json::Value = serde_json::from_str(&export_tasks_json(&store, "u1").unwrap()).unwrap();
        let ids: Vec<_> = tasks
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["task_id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["t0", "t1", "t2", "t3", "t4"]);

        let wellness: serde_json::Value =
            serde_json::from_str(&export_wellness_json(&store, "u1").unwrap()).unwrap();
        let first = &wellness.as_array().unwrap()[0];
        assert_eq!(first["check_in_id"], "c2");
        assert_eq!(first["type"], "hydration");
    }
}
