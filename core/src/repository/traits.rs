use crate::model::smart_list::SmartList;
use crate::model::task::Task;
use anyhow::Result;

pub trait TaskRepository {
    fn list(&self) -> Result<Vec<Task>>;
}

/// Storage for user-defined lists. System lists are never persisted.
pub trait SmartListRepository {
    fn list(&self) -> Result<Vec<SmartList>>;
    fn create(&self, list: SmartList) -> Result<SmartList>;
    fn update(&self, list: &SmartList) -> Result<()>;
    fn delete(&self, id: &str) -> Result<()>;
}
