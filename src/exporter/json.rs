// file: src/exporter/json.rs
// description: json export of all tasks and categories

use crate::error::Result;
use crate::models::{Category, TaskResponse};
use crate::service::{CategoryService, TaskService};
use crate::utils::OperationTimer;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportSnapshot {
    pub tasks: Vec<TaskResponse>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportManifest {
    pub exported_at: String,
    pub total_tasks: usize,
    pub total_categories: usize,
    pub files: Vec<String>,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub async fn export_all(
        &self,
        tasks: &TaskService,
        categories: &CategoryService,
        pretty: bool,
    ) -> Result<ExportManifest> {
        info!("Starting JSON export to {:?}", self.output_dir);
        let timer = OperationTimer::new("json export");

        let snapshot = ExportSnapshot {
            tasks: tasks.list(None).await?,
            categories: categories.list().await?,
        };

        let exported_at = Utc::now();
        let file_name = format!("whattodo-{}.json", exported_at.format("%Y%m%dT%H%M%S"));
        self.write_json(&self.output_dir.join(&file_name), &snapshot, pretty)?;

        let manifest = ExportManifest {
            exported_at: exported_at.to_rfc3339(),
            total_tasks: snapshot.tasks.len(),
            total_categories: snapshot.categories.len(),
            files: vec![file_name],
        };
        self.write_json(&self.output_dir.join("manifest.json"), &manifest, true)?;

        timer.finish_with_count(manifest.total_tasks);
        Ok(manifest)
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T, pretty: bool) -> Result<()> {
        let contents = if pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AppState;
    use crate::config::Config;
    use crate::models::NewTask;
    use tempfile::tempdir;

    #[test]
    fn test_exporter_creation() {
        let dir = tempdir().unwrap();
        let exporter = JsonExporter::new(dir.path().join("nested"));
        assert!(exporter.is_ok());
        assert!(dir.path().join("nested").is_dir());
    }

    #[tokio::test]
    async fn test_export_writes_snapshot_and_manifest() {
        let db_dir = tempdir().unwrap();
        let out_dir = tempdir().unwrap();
        let mut config = Config::default_config();
        config.database.uri = db_dir.path().display().to_string();
        let state = AppState::connect(&config).await.unwrap();

        state
            .tasks
            .create(NewTask {
                name: Some("Export me".to_string()),
                content: Some("please".to_string()),
                category: Some("Misc".to_string()),
                ..NewTask::default()
            })
            .await
            .unwrap();

        let exporter = JsonExporter::new(out_dir.path()).unwrap();
        let manifest = exporter
            .export_all(&state.tasks, &state.categories, false)
            .await
            .unwrap();

        assert_eq!(manifest.total_tasks, 1);
        assert_eq!(manifest.total_categories, 1);

        let written = fs::read_to_string(out_dir.path().join(&manifest.files[0])).unwrap();
        let snapshot: ExportSnapshot = serde_json::from_str(&written).unwrap();
        assert_eq!(snapshot.tasks[0].task.name, "Export me");
        assert!(out_dir.path().join("manifest.json").exists());
    }
}
