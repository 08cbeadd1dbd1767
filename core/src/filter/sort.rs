use std::cmp::Ordering;

use crate::model::smart_list::SortCriteria;
use crate::model::task::Task;

/// Stable in-place sort; tasks with equal keys keep their relative order.
pub fn sort_tasks(tasks: &mut [Task], criteria: SortCriteria) {
    match criteria {
        SortCriteria::DueDate => tasks.sort_by(|a, b| compare_due_dates(a, b)),
        SortCriteria::Priority => tasks.sort_by(|a, b| b.priority.cmp(&a.priority)),
        SortCriteria::CreatedDate => tasks.sort_by_key(|t| t.created_at),
        SortCriteria::Title => tasks.sort_by_cached_key(|t| t.title.to_lowercase()),
        SortCriteria::CustomOrder => tasks.sort_by_key(|t| t.order),
    }
}

// Compared as stored strings; a missing due date goes last.
fn compare_due_dates(a: &Task, b: &Task) -> Ordering {
    match (&a.due_date, &b.due_date) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
