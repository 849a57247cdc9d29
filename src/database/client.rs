// file: src/database/client.rs
// description: LanceDB client wrapper with connection management
// reference: https://docs.rs/lancedb

use crate::config::DatabaseConfig;
use crate::error::{Result, TodoError};
use arrow_array::RecordBatch;
use futures::StreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{Connection, Table, connect};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct LanceDbClient {
    connection: Connection,
    config: DatabaseConfig,
}

impl LanceDbClient {
    pub async fn new(config: DatabaseConfig) -> Result<Self> {
        info!("Connecting to LanceDB at {}", config.uri);

        let connection = connect(&config.uri)
            .execute()
            .await
            .map_err(|e| TodoError::Database(format!("Failed to connect to LanceDB: {}", e)))?;

        Ok(Self { connection, config })
    }

    /// Connects and pings, retrying with a linearly growing delay. A
    /// `max_connect_retries` of 0 keeps retrying until the store is reachable.
    pub async fn connect_with_retry(config: DatabaseConfig) -> Result<Self> {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let result = match Self::new(config.clone()).await {
                Ok(client) => client.ping().await.map(|_| client),
                Err(e) => Err(e),
            };

            match result {
                Ok(client) => {
                    info!("LanceDB is connected");
                    return Ok(client);
                }
                Err(e) if config.max_connect_retries != 0 && attempt >= config.max_connect_retries => {
                    return Err(TodoError::Database(format!(
                        "Giving up after {} connection attempts: {}",
                        attempt, e
                    )));
                }
                Err(e) => {
                    let delay = Self::retry_delay(config.retry_base_delay_ms, attempt);
                    warn!(
                        "LanceDB connection unsuccessful, retry after {:.1} seconds: {}",
                        delay.as_secs_f64(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    pub fn retry_delay(base_delay_ms: u64, attempt: u32) -> Duration {
        Duration::from_millis(base_delay_ms.saturating_mul(attempt as u64))
    }

    pub fn get_connection(&self) -> &Connection {
        &self.connection
    }

    /// Lists tables as a cheap round trip to the store.
    pub async fn ping(&self) -> Result<()> {
        debug!("Checking LanceDB connection");

        self.connection
            .table_names()
            .execute()
            .await
            .map(|_| ())
            .map_err(|e| TodoError::Database(format!("LanceDB connection failed: {}", e)))
    }

    pub async fn table_exists(&self, table_name: &str) -> Result<bool> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .map_err(|e| TodoError::Database(format!("Failed to list tables: {}", e)))?;

        Ok(table_names.iter().any(|name| name == table_name))
    }

    pub async fn get_table(&self, table_name: &str) -> Result<Table> {
        self.connection
            .open_table(table_name)
            .execute()
            .await
            .map_err(|e| {
                TodoError::Database(format!("Failed to open table {}: {}", table_name, e))
            })
    }

    pub async fn count_rows(&self, table_name: &str, filter: Option<String>) -> Result<usize> {
        if !self.table_exists(table_name).await? {
            return Ok(0);
        }

        let table = self.get_table(table_name).await?;
        table
            .count_rows(filter)
            .await
            .map_err(|e| TodoError::Database(format!("Failed to count rows: {}", e)))
    }

    /// Runs a filtered scan and collects the resulting batches. Plain scans
    /// return rows in storage order.
    pub async fn query_batches(
        &self,
        table_name: &str,
        filter: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<RecordBatch>> {
        if limit == 0 || !self.table_exists(table_name).await? {
            return Ok(Vec::new());
        }

        let table = self.get_table(table_name).await?;

        let mut query = table.query().limit(limit);
        if offset > 0 {
            query = query.offset(offset);
        }
        if let Some(filter) = filter {
            debug!("Applied filter: {}", filter);
            query = query.only_if(filter);
        }

        let mut results_stream = query
            .execute()
            .await
            .map_err(|e| TodoError::Database(format!("Query on {} failed: {}", table_name, e)))?;

        let mut batches = Vec::new();
        while let Some(batch_result) = results_stream.next().await {
            let batch = batch_result.map_err(|e| {
                TodoError::Database(format!("Failed to read result batch: {}", e))
            })?;
            batches.push(batch);
        }

        Ok(batches)
    }

    pub fn tasks_table(&self) -> &str {
        &self.config.tasks_table
    }

    pub fn categories_table(&self) -> &str {
        &self.config.categories_table
    }
}
