use anyhow::Result;
use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

use crate::filter::sort::sort_tasks;
use crate::filter::system_lists::create_system_lists;
use crate::model::smart_list::{DateRange, DateRangeType, ListFilter, SmartList, SortCriteria, TodoStatus};
use crate::model::task::Task;
use crate::time::{end_of_week, month_range, next_week_range, parse_date};

/// Evaluates smart-list queries against a fixed "today".
///
/// The engine holds nothing but the evaluation date, so it is `Copy` and can
/// be shared across threads. Inputs are never mutated; every query returns a
/// fresh vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterEngine {
    today: NaiveDate,
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterEngine {
    /// Evaluates relative ranges against the local wall-clock date.
    pub fn new() -> Self {
        Self::at(Local::now().date_naive())
    }

    pub fn at(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn apply_filter(&self, tasks: &[Task], filter: &ListFilter, sort_by: SortCriteria) -> Vec<Task> {
        let mut filtered: Vec<&Task> = tasks.iter().collect();

        if !filter.priorities.is_empty() {
            filtered.retain(|t| filter.priorities.contains(&t.priority));
        }

        if !filter.tags.is_empty() {
            filtered.retain(|t| filter.tags.iter().any(|tag| t.tags.contains(tag)));
        }

        if let Some(range) = &filter.date_range {
            let test = self.range_test(range);
            filtered.retain(|t| test.matches(t));
        }

        if !filter.status.is_empty() {
            filtered.retain(|t| filter.status.iter().any(|s| self.has_status(t, *s)));
        }

        if !filter.goal_ids.is_empty() {
            filtered.retain(|t| {
                t.goal_id
                    .as_ref()
                    .is_some_and(|goal| filter.goal_ids.contains(goal))
            });
        }

        if let Some(wanted) = filter.has_subtasks {
            filtered.retain(|t| t.has_subtasks() == wanted);
        }

        if let Some(wanted) = filter.has_due_date {
            filtered.retain(|t| t.due_date.is_some() == wanted);
        }

        if let Some(wanted) = filter.is_recurring {
            filtered.retain(|t| t.is_recurring() == wanted);
        }

        let mut result: Vec<Task> = filtered.into_iter().cloned().collect();
        sort_tasks(&mut result, sort_by);

        debug!(total = tasks.len(), matched = result.len(), ?sort_by, "apply_filter");
        result
    }

    pub fn create_system_lists(&self) -> Vec<SmartList> {
        create_system_lists()
    }

    /// Case-insensitive substring match on title, description, note and tags.
    /// A blank query returns every task in input order.
    pub fn search_todos(&self, tasks: &[Task], query: &str) -> Vec<Task> {
        if query.trim().is_empty() {
            return tasks.to_vec();
        }

        let needle = query.to_lowercase();
        tasks
            .iter()
            .filter(|t| {
                t.title.to_lowercase().contains(&needle)
                    || t.description.to_lowercase().contains(&needle)
                    || t.note.to_lowercase().contains(&needle)
                    || t.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }

    pub fn get_todo_count(&self, tasks: &[Task], list: &SmartList) -> usize {
        self.apply_filter(tasks, &list.filters, list.sort_by).len()
    }

    pub fn is_overdue(&self, task: &Task) -> bool {
        task.is_overdue(self.today)
    }

    fn has_status(&self, task: &Task, status: TodoStatus) -> bool {
        match status {
            TodoStatus::Completed => task.is_completed,
            TodoStatus::Overdue => self.is_overdue(task) && !task.is_completed,
            TodoStatus::Active => !task.is_completed && !self.is_overdue(task),
        }
    }

    fn range_test(&self, range: &DateRange) -> RangeTest {
        let today = self.today;
        match range.range_type {
            DateRangeType::Today => RangeTest::DueOrScheduledOn(today),
            DateRangeType::Tomorrow => match today.succ_opt() {
                Some(tomorrow) => RangeTest::DueOn(tomorrow),
                None => RangeTest::Never,
            },
            DateRangeType::ThisWeek => RangeTest::DueWithin(Some(today), Some(end_of_week(today))),
            DateRangeType::NextWeek => {
                let (start, end) = next_week_range(today);
                RangeTest::DueWithin(Some(start), Some(end))
            }
            DateRangeType::ThisMonth => {
                let (start, end) = month_range(today);
                RangeTest::DueWithin(Some(start), Some(end))
            }
            DateRangeType::Overdue => RangeTest::Overdue(today),
            DateRangeType::Custom => match custom_bounds(range) {
                Ok((start, end)) => RangeTest::DueWithin(start, end),
                Err(e) => {
                    warn!("custom date range never matches: {:#}", e);
                    RangeTest::Never
                }
            },
        }
    }
}

/// A date-range criterion resolved against a concrete day.
#[derive(Debug, Clone, Copy)]
enum RangeTest {
    DueOrScheduledOn(NaiveDate),
    DueOn(NaiveDate),
    /// Inclusive, `None` is unbounded on that side.
    DueWithin(Option<NaiveDate>, Option<NaiveDate>),
    Overdue(NaiveDate),
    Never,
}

impl RangeTest {
    fn matches(&self, task: &Task) -> bool {
        match *self {
            RangeTest::DueOrScheduledOn(day) => {
                task.due_on() == Some(day) || task.scheduled_on() == Some(day)
            }
            RangeTest::DueOn(day) => task.due_on() == Some(day),
            RangeTest::DueWithin(start, end) => match task.due_on() {
                Some(due) => start.map_or(true, |s| due >= s) && end.map_or(true, |e| due <= e),
                None => false,
            },
            RangeTest::Overdue(today) => task.is_overdue(today),
            RangeTest::Never => false,
        }
    }
}

fn custom_bounds(range: &DateRange) -> Result<(Option<NaiveDate>, Option<NaiveDate>)> {
    let start = range.start.as_deref().map(parse_date).transpose()?;
    let end = range.end.as_deref().map(parse_date).transpose()?;
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Priority, RepeatConfig, RepeatType, Subtask};

    fn day(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn task(id: &str) -> Task {
        Task { id: id.to_string(), title: id.to_string(), ..Default::default() }
    }

    fn due(id: &str, due_date: &str) -> Task {
        Task { due_date: Some(due_date.to_string()), ..task(id) }
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    fn range(range_type: DateRangeType) -> ListFilter {
        ListFilter { date_range: Some(DateRange::of(range_type)), ..Default::default() }
    }

    // Wednesday
    fn engine() -> FilterEngine {
        FilterEngine::at(day("2025-06-04"))
    }

    fn sample() -> Vec<Task> {
        vec![
            Task {
                title: "Buy milk".into(),
                priority: Priority::High,
                due_date: Some("2025-06-01".into()),
                ..task("1")
            },
            Task {
                title: "Write report".into(),
                priority: Priority::Low,
                tags: vec!["work".into()],
                ..task("2")
            },
        ]
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let tasks = vec![
            Task { created_at: 3, ..task("c") },
            Task { created_at: 1, ..task("a") },
            Task { created_at: 2, ..task("b") },
        ];
        let result = engine().apply_filter(&tasks, &ListFilter::default(), SortCriteria::CreatedDate);
        assert_eq!(ids(&result), vec!["a", "b", "c"]);
        // input untouched
        assert_eq!(ids(&tasks), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_priority_scenario() {
        let filter = ListFilter { priorities: vec![Priority::High], ..Default::default() };
        let result = engine().apply_filter(&sample(), &filter, SortCriteria::Priority);
        assert_eq!(ids(&result), vec!["1"]);
    }

    #[test]
    fn test_priority_filter_partitions() {
        let tasks: Vec<Task> = [Priority::None, Priority::Low, Priority::Medium, Priority::High]
            .into_iter()
            .enumerate()
            .map(|(i, p)| Task { priority: p, ..task(&i.to_string()) })
            .collect();
        let wanted = vec![Priority::Low, Priority::High];
        let filter = ListFilter { priorities: wanted.clone(), ..Default::default() };
        let result = engine().apply_filter(&tasks, &filter, SortCriteria::CustomOrder);

        assert!(result.iter().all(|t| wanted.contains(&t.priority)));
        let excluded: Vec<&Task> = tasks.iter().filter(|t| !result.contains(t)).collect();
        assert!(excluded.iter().all(|t| !wanted.contains(&t.priority)));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_apply_filter_is_deterministic() {
        let tasks = sample();
        let filter = ListFilter { tags: vec!["work".into(), "home".into()], ..Default::default() };
        let first = engine().apply_filter(&tasks, &filter, SortCriteria::Title);
        let second = engine().apply_filter(&tasks, &filter, SortCriteria::Title);
        assert_eq!(first, second);
        assert_eq!(ids(&first), vec!["2"]);
    }

    #[test]
    fn test_today_matches_due_or_plain_date() {
        let tasks = vec![
            due("due-today", "2025-06-04"),
            Task { date: Some("2025-06-04".into()), ..task("planned-today") },
            due("due-tomorrow", "2025-06-05"),
            task("undated"),
        ];
        let result = engine().apply_filter(&tasks, &range(DateRangeType::Today), SortCriteria::CustomOrder);
        assert_eq!(ids(&result), vec!["due-today", "planned-today"]);
    }

    #[test]
    fn test_tomorrow_uses_due_date_only() {
        let tasks = vec![
            due("due-tomorrow", "2025-06-05"),
            Task { date: Some("2025-06-05".into()), ..task("planned-tomorrow") },
        ];
        let result = engine().apply_filter(&tasks, &range(DateRangeType::Tomorrow), SortCriteria::CustomOrder);
        assert_eq!(ids(&result), vec!["due-tomorrow"]);
    }

    #[test]
    fn test_unpadded_dates_never_match_date_predicates() {
        let tasks = vec![
            due("unpadded-today", "2025-6-4"),
            Task { date: Some(" 2025-06-04".into()), ..task("spaced-plan") },
            due("unpadded-past", "2025-6-1"),
            due("signed-past", "+2025-06-01"),
        ];
        let today = engine().apply_filter(&tasks, &range(DateRangeType::Today), SortCriteria::CustomOrder);
        assert!(today.is_empty());

        let overdue = engine().apply_filter(&tasks, &range(DateRangeType::Overdue), SortCriteria::CustomOrder);
        assert!(overdue.is_empty());

        let overdue_status = ListFilter { status: vec![TodoStatus::Overdue], ..Default::default() };
        assert!(engine().apply_filter(&tasks, &overdue_status, SortCriteria::CustomOrder).is_empty());

        // Not overdue, so all of them count as active.
        let active = ListFilter { status: vec![TodoStatus::Active], ..Default::default() };
        let result = engine().apply_filter(&tasks, &active, SortCriteria::CustomOrder);
        assert_eq!(result.len(), 4);

        let custom = ListFilter {
            date_range: Some(DateRange::custom(Some("2025-01-01".into()), None)),
            ..Default::default()
        };
        assert!(engine().apply_filter(&tasks, &custom, SortCriteria::CustomOrder).is_empty());
    }

    #[test]
    fn test_tomorrow_at_end_of_calendar() {
        let last = FilterEngine::at(NaiveDate::MAX);
        let tasks = vec![due("a", "2025-06-05")];
        assert!(last.apply_filter(&tasks, &range(DateRangeType::Tomorrow), SortCriteria::DueDate).is_empty());
        assert!(last.apply_filter(&tasks, &range(DateRangeType::NextWeek), SortCriteria::DueDate).is_empty());
    }

    #[test]
    fn test_this_week_midweek() {
        let tasks = vec![
            due("yesterday", "2025-06-03"),
            due("today", "2025-06-04"),
            due("sunday", "2025-06-08"),
            due("next-monday", "2025-06-09"),
            due("garbage", "June 5th"),
        ];
        let result = engine().apply_filter(&tasks, &range(DateRangeType::ThisWeek), SortCriteria::DueDate);
        assert_eq!(ids(&result), vec!["today", "sunday"]);
    }

    #[test]
    fn test_this_week_on_sunday_is_single_day() {
        let sunday = FilterEngine::at(day("2025-06-08"));
        let tasks = vec![due("today", "2025-06-08"), due("monday", "2025-06-09")];
        let result = sunday.apply_filter(&tasks, &range(DateRangeType::ThisWeek), SortCriteria::DueDate);
        assert_eq!(ids(&result), vec!["today"]);
    }

    #[test]
    fn test_next_week_boundaries() {
        let tasks = vec![
            due("sunday", "2025-06-08"),
            due("monday", "2025-06-09"),
            due("next-sunday", "2025-06-15"),
            due("after", "2025-06-16"),
        ];
        let midweek = engine().apply_filter(&tasks, &range(DateRangeType::NextWeek), SortCriteria::DueDate);
        assert_eq!(ids(&midweek), vec!["monday", "next-sunday"]);

        // From Sunday, next week starts tomorrow.
        let sunday = FilterEngine::at(day("2025-06-08"));
        let result = sunday.apply_filter(&tasks, &range(DateRangeType::NextWeek), SortCriteria::DueDate);
        assert_eq!(ids(&result), vec!["monday", "next-sunday"]);

        // From Monday, the current week is skipped entirely.
        let monday = FilterEngine::at(day("2025-06-09"));
        let result = monday.apply_filter(&tasks, &range(DateRangeType::NextWeek), SortCriteria::DueDate);
        assert_eq!(ids(&result), vec!["after"]);
    }

    #[test]
    fn test_this_month() {
        let tasks = vec![
            due("may", "2025-05-31"),
            due("first", "2025-06-01"),
            due("last", "2025-06-30"),
            due("july", "2025-07-01"),
        ];
        let result = engine().apply_filter(&tasks, &range(DateRangeType::ThisMonth), SortCriteria::DueDate);
        assert_eq!(ids(&result), vec!["first", "last"]);
    }

    #[test]
    fn test_overdue_range() {
        let tasks = vec![
            due("late", "2025-06-01"),
            Task { is_completed: true, ..due("late-done", "2025-06-01") },
            due("today", "2025-06-04"),
            due("bad", "2025-13-01"),
        ];
        let result = engine().apply_filter(&tasks, &range(DateRangeType::Overdue), SortCriteria::DueDate);
        assert_eq!(ids(&result), vec!["late"]);
    }

    #[test]
    fn test_custom_range_bounds() {
        let tasks = vec![
            due("before", "2025-05-31"),
            due("start", "2025-06-01"),
            due("end", "2025-06-10"),
            due("after", "2025-06-11"),
            task("undated"),
        ];
        let closed = ListFilter {
            date_range: Some(DateRange::custom(Some("2025-06-01".into()), Some("2025-06-10".into()))),
            ..Default::default()
        };
        let result = engine().apply_filter(&tasks, &closed, SortCriteria::DueDate);
        assert_eq!(ids(&result), vec!["start", "end"]);

        let open_end = ListFilter {
            date_range: Some(DateRange::custom(Some("2025-06-01".into()), None)),
            ..Default::default()
        };
        let result = engine().apply_filter(&tasks, &open_end, SortCriteria::DueDate);
        assert_eq!(ids(&result), vec!["start", "end", "after"]);

        let open_start = ListFilter {
            date_range: Some(DateRange::custom(None, Some("2025-06-01".into()))),
            ..Default::default()
        };
        let result = engine().apply_filter(&tasks, &open_start, SortCriteria::DueDate);
        assert_eq!(ids(&result), vec!["before", "start"]);

        let unbounded = ListFilter { date_range: Some(DateRange::custom(None, None)), ..Default::default() };
        let result = engine().apply_filter(&tasks, &unbounded, SortCriteria::DueDate);
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_custom_range_with_bad_bound_matches_nothing() {
        let tasks = vec![due("a", "2025-06-01")];
        let filter = ListFilter {
            date_range: Some(DateRange::custom(Some("not a date".into()), None)),
            ..Default::default()
        };
        assert!(engine().apply_filter(&tasks, &filter, SortCriteria::DueDate).is_empty());
    }

    #[test]
    fn test_status_any_of() {
        let tasks = vec![
            due("active", "2025-06-10"),
            task("active-undated"),
            due("overdue", "2025-06-01"),
            Task { is_completed: true, ..due("done", "2025-06-01") },
        ];
        let active = ListFilter { status: vec![TodoStatus::Active], ..Default::default() };
        let result = engine().apply_filter(&tasks, &active, SortCriteria::CustomOrder);
        assert_eq!(ids(&result), vec!["active", "active-undated"]);

        let overdue = ListFilter { status: vec![TodoStatus::Overdue], ..Default::default() };
        let result = engine().apply_filter(&tasks, &overdue, SortCriteria::CustomOrder);
        assert_eq!(ids(&result), vec!["overdue"]);

        let either = ListFilter {
            status: vec![TodoStatus::Completed, TodoStatus::Overdue],
            ..Default::default()
        };
        let result = engine().apply_filter(&tasks, &either, SortCriteria::CustomOrder);
        assert_eq!(ids(&result), vec!["overdue", "done"]);
    }

    #[test]
    fn test_goal_filter() {
        let tasks = vec![
            Task { goal_id: Some("g1".into()), ..task("a") },
            Task { goal_id: Some("g2".into()), ..task("b") },
            task("unlinked"),
        ];
        let filter = ListFilter { goal_ids: vec!["g1".into()], ..Default::default() };
        let result = engine().apply_filter(&tasks, &filter, SortCriteria::CustomOrder);
        assert_eq!(ids(&result), vec!["a"]);
    }

    #[test]
    fn test_tri_state_filters() {
        let tasks = vec![
            Task { subtasks: vec![Subtask::default()], ..due("sub-due", "2025-06-10") },
            Task {
                repeat: RepeatConfig { repeat_type: RepeatType::Daily, ..Default::default() },
                ..task("recurring")
            },
            task("plain"),
        ];
        let with_subtasks = ListFilter { has_subtasks: Some(true), ..Default::default() };
        assert_eq!(ids(&engine().apply_filter(&tasks, &with_subtasks, SortCriteria::CustomOrder)), vec!["sub-due"]);

        let without_due = ListFilter { has_due_date: Some(false), ..Default::default() };
        assert_eq!(
            ids(&engine().apply_filter(&tasks, &without_due, SortCriteria::CustomOrder)),
            vec!["recurring", "plain"]
        );

        let recurring = ListFilter { is_recurring: Some(true), ..Default::default() };
        assert_eq!(ids(&engine().apply_filter(&tasks, &recurring, SortCriteria::CustomOrder)), vec!["recurring"]);

        let one_off = ListFilter { is_recurring: Some(false), has_subtasks: Some(false), ..Default::default() };
        assert_eq!(ids(&engine().apply_filter(&tasks, &one_off, SortCriteria::CustomOrder)), vec!["plain"]);
    }

    #[test]
    fn test_criteria_intersect() {
        let tasks = vec![
            Task { priority: Priority::High, tags: vec!["work".into()], ..due("match", "2025-06-05") },
            Task { priority: Priority::High, ..due("no-tag", "2025-06-05") },
            Task { priority: Priority::Low, tags: vec!["work".into()], ..due("low", "2025-06-05") },
            Task { priority: Priority::High, tags: vec!["work".into()], ..due("later", "2025-07-05") },
        ];
        let filter = ListFilter {
            priorities: vec![Priority::High],
            tags: vec!["work".into()],
            date_range: Some(DateRange::of(DateRangeType::ThisWeek)),
            ..Default::default()
        };
        let result = engine().apply_filter(&tasks, &filter, SortCriteria::DueDate);
        assert_eq!(ids(&result), vec!["match"]);
    }

    #[test]
    fn test_search_todos() {
        let mut tasks = sample();
        tasks.push(Task { note: "ask about MILKSHAKE".into(), ..task("3") });
        tasks.push(Task { tags: vec!["Dairy-Milk".into()], ..task("4") });

        let result = engine().search_todos(&tasks, "MILK");
        assert_eq!(ids(&result), vec!["1", "3", "4"]);

        let result = engine().search_todos(&tasks, "report");
        assert_eq!(ids(&result), vec!["2"]);
    }

    #[test]
    fn test_blank_search_returns_input() {
        let tasks = sample();
        assert_eq!(engine().search_todos(&tasks, "   "), tasks);
        assert_eq!(engine().search_todos(&tasks, ""), tasks);
    }

    #[test]
    fn test_get_todo_count_matches_system_lists() {
        let tasks = vec![
            Task { priority: Priority::High, ..due("late", "2025-06-01") },
            due("today", "2025-06-04"),
            due("tomorrow", "2025-06-05"),
            Task { is_completed: true, ..task("done") },
        ];
        let engine = engine();
        let counts: Vec<usize> = engine
            .create_system_lists()
            .iter()
            .map(|l| engine.get_todo_count(&tasks, l))
            .collect();
        // inbox, today, tomorrow, week, overdue, high, completed, all
        assert_eq!(counts, vec![4, 1, 1, 2, 1, 1, 1, 4]);
    }
}
