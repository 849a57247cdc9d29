// file: src/database/mod.rs
// description: database operations module exports
// reference: internal module structure

pub mod category_repo;
pub mod client;
pub mod filter;
pub mod records;
pub mod schema;
pub mod task_repo;

pub use category_repo::CategoryRepository;
pub use client::LanceDbClient;
pub use schema::SchemaManager;
pub use task_repo::TaskRepository;
