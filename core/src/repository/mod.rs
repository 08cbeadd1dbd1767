pub mod file;
pub mod smart_list;
pub mod traits;

// Re-export
pub use file::{default_data_dir, FileTaskRepository};
pub use smart_list::FileSmartListRepository;
pub use traits::{SmartListRepository, TaskRepository};
