//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod dashboard;
pub mod forms;
pub mod genre;
pub mod pagination;
pub mod user;

