pub mod dto;
pub mod smart_list_service;
