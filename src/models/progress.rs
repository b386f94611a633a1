// src/models/progress.rs

//! Progress events emitted by an ingestion run.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Percent value marking a fatal error that ended the run.
pub const ERROR_PERCENT: i32 = -1;

/// Pipeline state.
///
/// Events carry the state they were emitted from. `Idle` is the state
/// before the first event; `Succeeded` is reported only by the run's
/// final status, while `Failed` also tags the error event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Idle,
    LoadingRoutes,
    LoadingDirections,
    LoadingStops,
    Finalizing,
    Succeeded,
    Failed,
}

/// One progress/status update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub message: String,
    /// 0-100, or [`ERROR_PERCENT`]
    pub percent: i32,
    pub stage: Stage,
}

impl ProgressEvent {
    pub fn new(stage: Stage, message: impl Into<String>, percent: i32) -> Self {
        Self {
            message: message.into(),
            percent,
            stage,
        }
    }

    /// Terminal error event.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Stage::Failed, message, ERROR_PERCENT)
    }

    pub fn is_error(&self) -> bool {
        self.percent == ERROR_PERCENT
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_error() {
            write!(f, "[error] {}", self.message)
        } else {
            write!(f, "[{:>3}%] {}", self.percent, self.message)
        }
    }
}
