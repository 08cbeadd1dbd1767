pub mod filter;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;

pub use filter::{create_system_lists, sort_tasks, FilterEngine};
pub use model::smart_list::{DateRange, DateRangeType, ListFilter, SmartList, SortCriteria, TodoStatus};
pub use model::task::{Priority, RepeatConfig, RepeatType, Subtask, Task};
pub use repository::{FileSmartListRepository, FileTaskRepository, SmartListRepository, TaskRepository};
pub use service::dto::{ListSummary, TaskDto};
pub use service::smart_list_service::SmartListService;
pub use time::{parse_date, parse_human_date};
