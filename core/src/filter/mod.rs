//! Smart-list query evaluation: filtering, sorting, search and the
//! predefined list catalogue.

pub mod engine;
pub mod sort;
pub mod system_lists;

pub use engine::FilterEngine;
pub use sort::sort_tasks;
pub use system_lists::{create_system_lists, is_system_id};
