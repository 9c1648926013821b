//! JSON files under the steady home directory.
//!
//! `tasks.json` and `templates.json` hold pretty-printed arrays and are
//! rewritten on every change. Check-ins are append-only JSONL. A change whose
//! write fails is undone in memory as well.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use steady_core::{
    CheckInStore, StoreError, StoreResult, Task, TaskStore, TaskTemplate, TemplateStore,
    WellnessCheckIn,
};

use crate::state::ensure_steady_home;

#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    tasks: BTreeMap<String, Task>,
    check_ins: Vec<WellnessCheckIn>,
    templates: Vec<TaskTemplate>,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let tasks: Vec<Task> = read_array(&dir.join("tasks.json"))?;
        let templates = read_array(&dir.join("templates.json"))?;
        let check_ins = read_jsonl(&dir.join("checkins.jsonl"))?;

        Ok(Self {
            tasks: tasks.into_iter().map(|t| (t.task_id.clone(), t)).collect(),
            check_ins,
            templates,
            dir,
        })
    }

    /// `<steady home>/data`
    pub fn open_default() -> Result<Self> {
        let dir = ensure_steady_home()?.join("data");
        Self::open(&dir).with_context(|| format!("open store at {}", dir.display()))
    }

    fn flush_tasks(&self) -> StoreResult<()> {
        let tasks: Vec<&Task> = self.tasks.values().collect();
        write_array(&self.dir.join("tasks.json"), &tasks)
    }

    fn flush_check_ins(&self) -> StoreResult<()> {
        let mut body = String::new();
        for c in &self.check_ins {
            body.push_str(&serde_json::to_string(c)?);
            body.push('\n');
        }
        replace_file(&self.dir.join("checkins.jsonl"), body.as_bytes())
    }
}

fn read_array<T: DeserializeOwned>(path: &Path) -> StoreResult<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let s = fs::read_to_string(path)?;
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&s)?)
}

fn read_jsonl<T: DeserializeOwned>(path: &Path) -> StoreResult<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let reader = BufReader::new(fs::File::open(path)?);
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        out.push(serde_json::from_str(&line)?);
    }
    Ok(out)
}

fn write_array<T: Serialize>(path: &Path, items: &[T]) -> StoreResult<()> {
    let json = serde_json::to_string_pretty(items)?;
    replace_file(path, json.as_bytes())
}

/// Write to a sibling temp file, then rename over the target.
fn replace_file(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

impl TaskStore for FileStore {
    fn insert_task(&mut self, task: Task) -> StoreResult<()> {
        if self.tasks.contains_key(&task.task_id) {
            return Err(StoreError::other(format!("duplicate task id: {}", task.task_id)));
        }
        let task_id = task.task_id.clone();
        self.tasks.insert(task_id.clone(), task);
        if let Err(e) = self.flush_tasks() {
            self.tasks.remove(&task_id);
            return Err(e);
        }
        Ok(())
    }

    fn task(&self, task_id: &str) -> StoreResult<Task> {
        self.tasks
            .get(task_id)
            .cloned()
            .ok_or_else(|| StoreError::task_not_found(task_id))
    }

    fn save_task(&mut self, task: Task) -> StoreResult<()> {
        let Some(slot) = self.tasks.get_mut(&task.task_id) else {
            return Err(StoreError::task_not_found(task.task_id));
        };
        let task_id = task.task_id.clone();
        let previous = std::mem::replace(slot, task);
        if let Err(e) = self.flush_tasks() {
            self.tasks.insert(task_id, previous);
            return Err(e);
        }
        Ok(())
    }

    fn delete_task(&mut self, task_id: &str) -> StoreResult<()> {
        let Some(removed) = self.tasks.remove(task_id) else {
            return Err(StoreError::task_not_found(task_id));
        };
        if let Err(e) = self.flush_tasks() {
            self.tasks.insert(removed.task_id.clone(), removed);
            return Err(e);
        }
        Ok(())
    }

    fn tasks_for_user(&self, user_id: &str) -> StoreResult<Vec<Task>> {
        Ok(self
            .tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }
}

impl CheckInStore for FileStore {
    fn insert_check_in(&mut self, check_in: WellnessCheckIn) -> StoreResult<()> {
        let line = serde_json::to_string(&check_in)?;
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.dir.join("checkins.jsonl"))?;
        writeln!(f, "{}", line)?;
        self.check_ins.push(check_in);
        Ok(())
    }

    fn check_ins_for_user(&self, user_id: &str) -> StoreResult<Vec<WellnessCheckIn>> {
        Ok(self
            .check_ins
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    fn delete_check_ins_for_user(&mut self, user_id: &str) -> StoreResult<usize> {
        let before = self.check_ins.clone();
        self.check_ins.retain(|c| c.user_id != user_id);
        let removed = before.len() - self.check_ins.len();
        if removed > 0 {
            if let Err(e) = self.flush_check_ins() {
                self.check_ins = before;
                return Err(e);
            }
        }
        Ok(removed)
    }
}

impl TemplateStore for FileStore {
    fn insert_template(&mut self, template: TaskTemplate) -> StoreResult<()> {
        self.templates.push(template);
        if let Err(e) = write_array(&self.dir.join("templates.json"), &self.templates) {
            self.templates.pop();
            return Err(e);
        }
        Ok(())
    }

    fn templates_for_user(&self, user_id: &str) -> StoreResult<Vec<TaskTemplate>> {
        Ok(self
            .templates
            .iter()
            .filter(|t| t.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use steady_core::{CheckInType, NewCheckIn, NewTask, TaskStatus};
    use steady_core::checkins::log_check_in;
    use steady_core::tasks::{complete_task, create_task, update_task};
    use steady_core::TaskUpdate;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 15, 0, 0).unwrap()
    }

    #[test]
    fn test_tasks_persist_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let id = {
            let mut store = FileStore::open(dir.path()).unwrap();
            let t = create_task(&mut store, "u1", NewTask::titled("Call dentist"), now()).unwrap();
            complete_task(&mut store, &t.task_id, now()).unwrap();
            t.task_id
        };

        let store = FileStore::open(dir.path()).unwrap();
        let t = store.task(&id).unwrap();
        assert_eq!(t.title, "Call dentist");
        assert_eq!(t.status, TaskStatus::Completed);
    }

    #[test]
    fn test_check_ins_append_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = FileStore::open(dir.path()).unwrap();
            log_check_in(&mut store, "u1", CheckInType::Hydration, NewCheckIn::default(), now()).unwrap();
            log_check_in(&mut store, "u2", CheckInType::Meal, NewCheckIn::default(), now()).unwrap();
        }
        let raw = fs::read_to_string(dir.path().join("checkins.jsonl")).unwrap();
        assert_eq!(raw.lines().count(), 2);

        let mut store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.delete_check_ins_for_user("u1").unwrap(), 1);

        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.check_ins_for_user("u1").unwrap().is_empty());
        assert_eq!(store.check_ins_for_user("u2").unwrap().len(), 1);
    }

    #[test]
    fn test_failed_write_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        let t = create_task(&mut store, "u1", NewTask::titled("Renew passport"), now()).unwrap();

        // A directory where the temp file should go makes every task write fail.
        fs::create_dir(dir.path().join("tasks.tmp")).unwrap();

        let err = create_task(&mut store, "u1", NewTask::titled("Book flights"), now()).unwrap_err();
        assert!(!err.is_not_found());
        assert_eq!(store.tasks_for_user("u1").unwrap().len(), 1);

        let rename = TaskUpdate {
            title: Some("Renew ID".to_string()),
            ..TaskUpdate::default()
        };
        assert!(update_task(&mut store, &t.task_id, rename, now()).is_err());
        assert_eq!(store.task(&t.task_id).unwrap().title, "Renew passport");

        assert!(store.delete_task(&t.task_id).is_err());
        assert!(store.task(&t.task_id).is_ok());

        // Memory still matches disk.
        fs::remove_dir(dir.path().join("tasks.tmp")).unwrap();
        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.tasks_for_user("u1").unwrap(), store.tasks_for_user("u1").unwrap());
    }

    #[test]
    fn test_corrupt_file_is_other_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tasks.json"), "{not json").unwrap();
        let err = FileStore::open(dir.path()).unwrap_err();
        assert!(!err.is_not_found());
    }
}
