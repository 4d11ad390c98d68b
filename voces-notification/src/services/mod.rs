pub mod fanout;
pub mod notification_service;
