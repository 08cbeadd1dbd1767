use serde::{Serialize, Deserialize};
use crate::model::smart_list::SmartList;
use crate::model::task::{Task, Priority};

/// A task flattened for display, with the date-dependent fields resolved.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    pub id: String,
    pub title: String,
    pub priority: Priority,
    pub date: Option<String>,
    pub due_date: Option<String>,
    pub goal_id: Option<String>,
    pub tags: Vec<String>,
    pub is_completed: bool,
    pub is_recurring: bool,

    // Computed against the evaluation date
    pub overdue: bool,
    pub progress: f32,
    pub subtasks_done: usize,
    pub subtasks_total: usize,
}

impl TaskDto {
    pub fn from_entity(task: Task, overdue: bool) -> Self {
        let progress = task.completion_progress();
        let subtasks_done = task.completed_subtasks();
        let subtasks_total = task.subtasks.len();
        let is_recurring = task.is_recurring();

        Self {
            id: task.id,
            title: task.title,
            priority: task.priority,
            date: task.date,
            due_date: task.due_date,
            goal_id: task.goal_id,
            tags: task.tags,
            is_completed: task.is_completed,
            is_recurring,
            overdue,
            progress,
            subtasks_done,
            subtasks_total,
        }
    }
}

/// A list with its badge count.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListSummary {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub is_system: bool,
    pub count: usize,
}

impl ListSummary {
    pub fn from_list(list: SmartList, count: usize) -> Self {
        Self {
            id: list.id,
            name: list.name,
            icon: list.icon,
            color: list.color,
            is_system: list.is_system,
            count,
        }
    }
}
