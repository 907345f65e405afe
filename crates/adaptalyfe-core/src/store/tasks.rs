//! Daily task checklists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{decode_record, encode_record, scoped_key, scoped_prefix};
use crate::error::Error;

const TASKS_TREE: &[u8] = b"tasks";

/// How often a task recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Once,
}

/// A task on a user's checklist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTask {
    /// Stable identifier.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Short description shown in the checklist.
    pub title: String,
    /// Free-form category (morning routine, chores, ...).
    pub category: String,
    /// Recurrence.
    pub frequency: Frequency,
    /// Points awarded on completion.
    pub points: u32,
    /// Whether the task is currently checked off.
    pub completed: bool,
    /// When the task was last checked off.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Store for daily tasks, keyed by owner.
#[derive(Clone)]
pub struct TaskStore {
    tree: sled::Tree,
}

impl TaskStore {
    pub(crate) fn open(db: &sled::Db) -> Result<Self, Error> {
        Ok(Self {
            tree: db.open_tree(TASKS_TREE)?,
        })
    }

    /// Create a task for a user.
    pub fn create(
        &self,
        user_id: &str,
        title: &str,
        category: &str,
        frequency: Frequency,
        points: u32,
    ) -> Result<DailyTask, Error> {
        let task = DailyTask {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            category: category.to_string(),
            frequency,
            points,
            completed: false,
            completed_at: None,
            created_at: Utc::now(),
        };

        self.put(&task)?;
        Ok(task)
    }

    /// Get one of a user's tasks.
    pub fn get(&self, user_id: &str, task_id: &str) -> Result<Option<DailyTask>, Error> {
        match self.tree.get(scoped_key(user_id, task_id))? {
            Some(bytes) => Ok(Some(decode_record(&bytes)?)),
            None => Ok(None),
        }
    }

    /// List all of a user's tasks.
    pub fn list_for_user(&self, user_id: &str) -> Result<Vec<DailyTask>, Error> {
        let mut tasks = Vec::new();
        for result in self.tree.scan_prefix(scoped_prefix(user_id)) {
            let (_, bytes) = result?;
            tasks.push(decode_record(&bytes)?);
        }
        Ok(tasks)
    }

    /// Replace a task record. Fails with [`Error::NotFound`] when the task
    /// does not exist.
    pub fn update(&self, task: &DailyTask) -> Result<(), Error> {
        let key = scoped_key(&task.user_id, &task.id);
        if !self.tree.contains_key(&key)? {
            return Err(Error::NotFound);
        }
        self.tree.insert(key, encode_record(task)?)?;
        Ok(())
    }

    /// Flip a task's completion state, stamping the completion time.
    pub fn toggle_completed(&self, user_id: &str, task_id: &str) -> Result<DailyTask, Error> {
        let mut task = self.get(user_id, task_id)?.ok_or(Error::NotFound)?;
        task.completed = !task.completed;
        task.completed_at = task.completed.then(Utc::now);
        self.put(&task)?;
        Ok(task)
    }

    /// Delete a task. Returns whether anything was removed.
    pub fn delete(&self, user_id: &str, task_id: &str) -> Result<bool, Error> {
        Ok(self.tree.remove(scoped_key(user_id, task_id))?.is_some())
    }

    fn put(&self, task: &DailyTask) -> Result<(), Error> {
        self.tree
            .insert(scoped_key(&task.user_id, &task.id), encode_record(task)?)?;
        Ok(())
    }
}
