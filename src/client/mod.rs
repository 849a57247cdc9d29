// file: src/client/mod.rs
// description: terminal front end for the task API
// reference: internal module structure

pub mod api_client;
pub mod display;
pub mod prompt;

pub use api_client::TaskApiClient;
