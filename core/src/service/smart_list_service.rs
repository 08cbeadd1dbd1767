use std::collections::HashSet;

use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::filter::{is_system_id, FilterEngine};
use crate::model::smart_list::{ListFilter, SmartList, SortCriteria};
use crate::model::task::Task;
use crate::repository::{SmartListRepository, TaskRepository};
use crate::service::dto::{ListSummary, TaskDto};

/// Binds the engine to stored tasks and custom lists.
pub struct SmartListService<T: TaskRepository, L: SmartListRepository> {
    tasks: T,
    lists: L,
    engine: FilterEngine,
}

impl<T: TaskRepository, L: SmartListRepository> SmartListService<T, L> {
    pub fn new(tasks: T, lists: L, engine: FilterEngine) -> Self {
        Self { tasks, lists, engine }
    }

    pub fn engine(&self) -> FilterEngine {
        self.engine
    }

    /// System lists first, then custom lists.
    pub fn all_lists(&self) -> Result<Vec<SmartList>> {
        let mut lists = self.engine.create_system_lists();
        lists.extend(self.custom_lists()?);
        Ok(lists)
    }

    /// Stored lists ordered by `order`.
    ///
    /// Lists with an empty id, a system id or the system flag are dropped, and
    /// only the first list per id is kept.
    pub fn custom_lists(&self) -> Result<Vec<SmartList>> {
        let stored = self.lists.list()?;
        let stored_len = stored.len();

        let mut seen = HashSet::new();
        let mut custom: Vec<SmartList> = stored
            .into_iter()
            .filter(|l| !l.id.is_empty() && !l.is_system && !is_system_id(&l.id))
            .filter(|l| seen.insert(l.id.clone()))
            .collect();
        if custom.len() != stored_len {
            warn!(stored = stored_len, kept = custom.len(), "dropped invalid or duplicate smart lists");
        }

        custom.sort_by_key(|l| l.order);
        Ok(custom)
    }

    pub fn find_list(&self, id: &str) -> Result<SmartList> {
        self.all_lists()?
            .into_iter()
            .find(|l| l.id == id)
            .ok_or_else(|| anyhow!("Smart list with ID {} not found", id))
    }

    pub fn list_summaries(&self) -> Result<Vec<ListSummary>> {
        let tasks = self.tasks.list()?;
        let summaries = self
            .all_lists()?
            .into_iter()
            .map(|list| {
                let count = self.engine.get_todo_count(&tasks, &list);
                ListSummary::from_list(list, count)
            })
            .collect();
        Ok(summaries)
    }

    pub fn list_tasks(&self, id: &str) -> Result<Vec<TaskDto>> {
        let list = self.find_list(id)?;
        debug!(list = %list.id, "list_tasks");
        self.query(&list.filters, list.sort_by)
    }

    pub fn query(&self, filter: &ListFilter, sort_by: SortCriteria) -> Result<Vec<TaskDto>> {
        let tasks = self.tasks.list()?;
        let matched = self.engine.apply_filter(&tasks, filter, sort_by);
        Ok(self.to_dtos(matched))
    }

    pub fn search(&self, query: &str) -> Result<Vec<TaskDto>> {
        let tasks = self.tasks.list()?;
        let matched = self.engine.search_todos(&tasks, query);
        Ok(self.to_dtos(matched))
    }

    /// Stores a custom list, assigning an id and creation time when missing.
    pub fn create_list(&self, mut list: SmartList) -> Result<SmartList> {
        validate_custom(&list)?;
        if list.id.is_empty() {
            list.id = Uuid::new_v4().to_string();
        }
        if list.created_at == 0 {
            list.created_at = Utc::now().timestamp_millis();
        }
        self.lists.create(list)
    }

    pub fn update_list(&self, list: &SmartList) -> Result<()> {
        validate_custom(list)?;
        self.lists.update(list)
    }

    pub fn delete_list(&self, id: &str) -> Result<()> {
        if is_system_id(id) {
            bail!("System list {} cannot be deleted", id);
        }
        self.lists.delete(id)
    }

    fn to_dtos(&self, tasks: Vec<Task>) -> Vec<TaskDto> {
        tasks
            .into_iter()
            .map(|t| {
                let overdue = self.engine.is_overdue(&t);
                TaskDto::from_entity(t, overdue)
            })
            .collect()
    }
}

fn validate_custom(list: &SmartList) -> Result<()> {
    if list.is_system || is_system_id(&list.id) {
        bail!("System lists cannot be edited");
    }
    if list.name.trim().is_empty() {
        bail!("Smart list name is required");
    }
    Ok(())
}
