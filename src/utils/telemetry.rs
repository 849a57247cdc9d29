// file: src/utils/telemetry.rs
// description: health reporting and operation timing for the task service

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Ordered from best to worst so the report can take the maximum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    fn icon(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "✓",
            HealthStatus::Degraded => "⚠",
            HealthStatus::Unhealthy => "✗",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    pub component: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub response_time_ms: u64,
}

impl HealthCheck {
    pub fn new(component: &str, status: HealthStatus, elapsed: Duration) -> Self {
        Self {
            component: component.to_string(),
            status,
            message: None,
            response_time_ms: elapsed.as_millis() as u64,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Healthy on `Ok`, `failure` on `Err`. `describe` may attach a note to
    /// the successful value.
    pub fn from_outcome<T, E: fmt::Display>(
        component: &str,
        started: Instant,
        outcome: std::result::Result<T, E>,
        failure: HealthStatus,
        describe: impl FnOnce(T) -> Option<String>,
    ) -> Self {
        let elapsed = started.elapsed();
        match outcome {
            Ok(value) => {
                let check = Self::new(component, HealthStatus::Healthy, elapsed);
                match describe(value) {
                    Some(note) => check.with_message(note),
                    None => check,
                }
            }
            Err(e) => Self::new(component, failure, elapsed).with_message(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub overall_status: HealthStatus,
    pub checks: Vec<HealthCheck>,
    pub timestamp: i64,
    pub version: String,
}

impl HealthReport {
    pub fn new(checks: Vec<HealthCheck>, version: String) -> Self {
        let overall_status = checks
            .iter()
            .map(|c| c.status)
            .max()
            .unwrap_or(HealthStatus::Healthy);

        Self {
            overall_status,
            checks,
            timestamp: chrono::Utc::now().timestamp(),
            version,
        }
    }

    /// Degraded still counts as serving.
    pub fn is_healthy(&self) -> bool {
        self.overall_status != HealthStatus::Unhealthy
    }
}

impl fmt::Display for HealthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let checked_at = chrono::DateTime::from_timestamp(self.timestamp, 0)
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "unknown".to_string());

        writeln!(
            f,
            "{} whattodo {} is {:?} (checked {})",
            self.overall_status.icon(),
            self.version,
            self.overall_status,
            checked_at
        )?;

        for check in &self.checks {
            write!(
                f,
                "  {} {:<10} {:>5}ms",
                check.status.icon(),
                check.component,
                check.response_time_ms
            )?;
            if let Some(message) = &check.message {
                write!(f, "  {}", message)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

pub struct OperationTimer {
    label: String,
    started: Instant,
}

impl OperationTimer {
    pub fn new(label: &str) -> Self {
        debug!("{} started", label);
        Self {
            label: label.to_string(),
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        info!("{} took {:.2}s", self.label, elapsed.as_secs_f64());
        elapsed
    }

    pub fn finish_with_count(self, count: usize) -> Duration {
        let elapsed = self.elapsed();
        info!(
            "{} handled {} records in {:.2}s",
            self.label,
            count,
            elapsed.as_secs_f64()
        );
        elapsed
    }

    pub fn warn_if_slow(&self, threshold: Duration, what: &str) {
        let elapsed = self.elapsed();
        if elapsed > threshold {
            warn!(
                "{}: {} took {}ms (over {}ms)",
                self.label,
                what,
                elapsed.as_millis(),
                threshold.as_millis()
            );
        }
    }
}
