use crate::model::smart_list::{DateRange, DateRangeType, ListFilter, SmartList, SortCriteria, TodoStatus};
use crate::model::task::Priority;

pub const SYSTEM_ID_PREFIX: &str = "system_";

pub const INBOX_ID: &str = "system_inbox";
pub const TODAY_ID: &str = "system_today";
pub const TOMORROW_ID: &str = "system_tomorrow";
pub const WEEK_ID: &str = "system_week";
pub const OVERDUE_ID: &str = "system_overdue";
pub const HIGH_PRIORITY_ID: &str = "system_high_priority";
pub const COMPLETED_ID: &str = "system_completed";
pub const ALL_ID: &str = "system_all";

pub fn is_system_id(id: &str) -> bool {
    id.starts_with(SYSTEM_ID_PREFIX)
}

/// The predefined catalogue, built fresh on every call.
pub fn create_system_lists() -> Vec<SmartList> {
    let lists = [
        (INBOX_ID, "Inbox", "📥", ListFilter::default(), SortCriteria::CreatedDate),
        (TODAY_ID, "Today", "📅", in_range(DateRangeType::Today), SortCriteria::DueDate),
        (TOMORROW_ID, "Tomorrow", "➡️", in_range(DateRangeType::Tomorrow), SortCriteria::DueDate),
        (WEEK_ID, "This Week", "📆", in_range(DateRangeType::ThisWeek), SortCriteria::DueDate),
        (
            OVERDUE_ID,
            "Overdue",
            "⚠️",
            ListFilter {
                date_range: Some(DateRange::of(DateRangeType::Overdue)),
                status: vec![TodoStatus::Overdue],
                ..Default::default()
            },
            SortCriteria::DueDate,
        ),
        (
            HIGH_PRIORITY_ID,
            "High Priority",
            "🔴",
            ListFilter { priorities: vec![Priority::High], ..Default::default() },
            SortCriteria::DueDate,
        ),
        (
            COMPLETED_ID,
            "Completed",
            "✅",
            ListFilter { status: vec![TodoStatus::Completed], ..Default::default() },
            SortCriteria::DueDate,
        ),
        (ALL_ID, "All", "📋", ListFilter::default(), SortCriteria::DueDate),
    ];

    lists
        .into_iter()
        .enumerate()
        .map(|(order, (id, name, icon, filters, sort_by))| SmartList {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            filters,
            sort_by,
            is_system: true,
            order: order as i32,
            ..Default::default()
        })
        .collect()
}

fn in_range(range_type: DateRangeType) -> ListFilter {
    ListFilter {
        date_range: Some(DateRange::of(range_type)),
        ..Default::default()
    }
}
