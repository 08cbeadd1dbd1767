use serde::{Deserialize, Serialize};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::time::parse_date;

/// Declaration order is the ordinal: `High` is the greatest.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepeatType {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Custom,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct RepeatConfig {
    #[serde(rename = "type")]
    pub repeat_type: RepeatType,
    /// Every N days/weeks/months.
    pub interval: u32,
    /// 1 = Monday .. 7 = Sunday.
    pub days_of_week: Vec<u8>,
    pub end_date: Option<String>,
}

impl Default for RepeatConfig {
    fn default() -> Self {
        Self {
            repeat_type: RepeatType::None,
            interval: 1,
            days_of_week: Vec::new(),
            end_date: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Subtask {
    pub id: String,
    pub title: String,
    pub is_completed: bool,
    pub created_at: i64,
    pub completed_at: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
    pub goal_id: Option<String>,

    // Both dates stay as the stored `yyyy-MM-dd` strings. A malformed value
    // must only knock the task out of date predicates, so parsing happens
    // at evaluation time.
    pub date: Option<String>,
    pub due_date: Option<String>,
    pub due_time: Option<String>,

    pub priority: Priority,
    pub tags: Vec<String>,
    pub subtasks: Vec<Subtask>,
    pub repeat: RepeatConfig,
    pub reminder_time: Option<String>,
    pub note: String,
    pub pomodoro_count: u32,
    pub order: i32,
    pub created_at: i64,
    pub completed_at: Option<i64>,
    pub updated_at: i64,
}

impl Task {
    pub fn new(title: String, due_date: Option<String>) -> Self {
        let now = Utc::now().timestamp_millis();
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            due_date,
            created_at: now,
            updated_at: now,
            ..Default::default()
        }
    }

    /// Parsed due date, `None` when absent or malformed.
    pub fn due_on(&self) -> Option<NaiveDate> {
        self.due_date.as_deref().and_then(|d| parse_date(d).ok())
    }

    /// Parsed plain date, `None` when absent or malformed.
    pub fn scheduled_on(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(|d| parse_date(d).ok())
    }

    /// Incomplete with a due date strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        if self.is_completed {
            return false;
        }
        match self.due_on() {
            Some(due) => due < today,
            None => false,
        }
    }

    pub fn has_subtasks(&self) -> bool {
        !self.subtasks.is_empty()
    }

    pub fn is_recurring(&self) -> bool {
        self.repeat.repeat_type != RepeatType::None
    }

    pub fn completed_subtasks(&self) -> usize {
        self.subtasks.iter().filter(|s| s.is_completed).count()
    }

    pub fn completion_progress(&self) -> f32 {
        if self.subtasks.is_empty() {
            return if self.is_completed { 1.0 } else { 0.0 };
        }
        self.completed_subtasks() as f32 / self.subtasks.len() as f32
    }
}
