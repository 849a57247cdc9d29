// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns

pub mod api;
pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod exporter;
pub mod models;
pub mod service;
pub mod utils;

pub use api::AppState;
pub use client::TaskApiClient;
pub use config::{ClientConfig, Config, DatabaseConfig, PaginationConfig, ServerConfig};
pub use database::{CategoryRepository, LanceDbClient, SchemaManager, TaskRepository};
pub use error::{Result, TodoError};
pub use exporter::{ExportManifest, JsonExporter};
pub use models::{
    Category, CategoryRef, DateRange, NewCategory, NewTask, PageRequest, Pagination, Task,
    TaskPage, TaskResponse, TaskStatus, TaskUpdate,
};
pub use service::{CategoryService, TaskService};
pub use utils::{HealthCheck, HealthReport, HealthStatus, OperationTimer, Validator};
