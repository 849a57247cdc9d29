// file: src/service/mod.rs
// description: business rules between the HTTP handlers and the repositories
// reference: internal module structure

pub mod category_service;
pub mod task_service;

pub use category_service::CategoryService;
pub use task_service::TaskService;
