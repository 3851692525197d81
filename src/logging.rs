//! Logging setup and degradation reporting
//!
//! `init_tracing` installs the global `tracing` subscriber from the logging
//! config. The location core does not log through globals directly: it
//! reports every degraded step to a [`DegradationLog`] it is handed, so
//! tests can see exactly what fell back and why.

use anyhow::{Result, anyhow};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::LocateError;

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|err| anyhow!("invalid log filter '{}': {err}", config.level))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match config.format.as_str() {
        "json" => builder.json().try_init(),
        _ => builder.try_init(),
    };
    installed.map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

/// Receives every step of the location pipeline that fell back to an
/// empty value.
pub trait DegradationLog: Send + Sync {
    fn degraded(&self, step: &'static str, reason: &LocateError);
}

/// Reports degradations as `tracing` warnings
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl DegradationLog for TracingLog {
    fn degraded(&self, step: &'static str, reason: &LocateError) {
        tracing::warn!(step, %reason, "location step degraded");
    }
}

/// Keeps degradations in memory
#[derive(Debug, Default)]
pub struct RecordingLog {
    entries: Mutex<Vec<(&'static str, LocateError)>>,
}

impl RecordingLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, LocateError)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn steps(&self) -> Vec<&'static str> {
        self.entries().into_iter().map(|(step, _)| step).collect()
    }
}

impl DegradationLog for RecordingLog {
    fn degraded(&self, step: &'static str, reason: &LocateError) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((step, reason.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_log_keeps_order() {
        let log = RecordingLog::new();
        log.degraded("first", &LocateError::NoCandidates);
        log.degraded("second", &LocateError::MissingQueryPoint);

        assert_eq!(log.steps(), vec!["first", "second"]);
        assert_eq!(log.entries()[1].1, LocateError::MissingQueryPoint);
    }

    #[test]
    fn test_tracing_log_accepts_reasons_without_subscriber() {
        TracingLog.degraded("step", &LocateError::ReadingTime("soon".to_string()));
    }
}
