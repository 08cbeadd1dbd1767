pub mod smart_list;
pub mod task;
