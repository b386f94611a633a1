// src/pipeline/progress.rs

//! Progress sinks.
//!
//! The pipeline reports through [`ProgressSink`]; frontends pick how events
//! are surfaced (channel to another task, log output, or nothing).

use tokio::sync::mpsc;

use crate::models::ProgressEvent;

/// Receiver of progress events, called in emission order from the pipeline task.
pub trait ProgressSink: Send + Sync {
    fn update(&self, event: ProgressEvent);
}

/// Forwards events to a channel consumer.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<ProgressEvent>) -> Self {
        Self { tx }
    }

    /// Create a sink together with its receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl ProgressSink for ChannelSink {
    fn update(&self, event: ProgressEvent) {
        if let Err(e) = self.tx.send(event) {
            log::debug!("Progress receiver gone, dropping event: {}", e.0);
        }
    }
}

/// Writes events to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn update(&self, event: ProgressEvent) {
        if event.is_error() {
            log::error!("{}", event.message);
        } else {
            log::info!("{}", event);
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn update(&self, _event: ProgressEvent) {}
}
