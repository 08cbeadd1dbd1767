use serde::{Deserialize, Serialize};

use crate::model::task::Priority;

pub const DEFAULT_LIST_ICON: &str = "📋";
pub const DEFAULT_LIST_COLOR: &str = "#3182F6";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateRangeType {
    Today,
    Tomorrow,
    ThisWeek,
    NextWeek,
    ThisMonth,
    Overdue,
    #[default]
    Custom,
}

/// `start`/`end` are `yyyy-MM-dd` and only consulted for `Custom`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
    #[serde(rename = "type")]
    pub range_type: DateRangeType,
}

impl DateRange {
    pub fn of(range_type: DateRangeType) -> Self {
        Self {
            range_type,
            ..Default::default()
        }
    }

    pub fn custom(start: Option<String>, end: Option<String>) -> Self {
        Self {
            start,
            end,
            range_type: DateRangeType::Custom,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TodoStatus {
    Active,
    Completed,
    Overdue,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortCriteria {
    #[default]
    DueDate,
    Priority,
    CreatedDate,
    Title,
    CustomOrder,
}

/// Inclusion criteria. Empty collections and `None` tri-states impose no
/// restriction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ListFilter {
    pub priorities: Vec<Priority>,
    pub tags: Vec<String>,
    pub date_range: Option<DateRange>,
    pub status: Vec<TodoStatus>,
    pub goal_ids: Vec<String>,
    pub has_subtasks: Option<bool>,
    pub has_due_date: Option<bool>,
    pub is_recurring: Option<bool>,
}

impl ListFilter {
    pub fn is_empty(&self) -> bool {
        *self == ListFilter::default()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SmartList {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub filters: ListFilter,
    pub sort_by: SortCriteria,
    pub is_system: bool,
    pub order: i32,
    pub created_at: i64,
}

impl Default for SmartList {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            icon: DEFAULT_LIST_ICON.to_string(),
            color: DEFAULT_LIST_COLOR.to_string(),
            filters: ListFilter::default(),
            sort_by: SortCriteria::default(),
            is_system: false,
            order: 0,
            created_at: 0,
        }
    }
}
