//! Progress events for whoever drives a run

use std::sync::Mutex;

use tokio::sync::mpsc::UnboundedSender;

use crate::report::{ImportReport, PushOutcome};

/// An event emitted while a run progresses
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// Human-readable status line
    Log(String),
    ImportComplete(ImportReport),
    ExportComplete(PushOutcome),
}

/// Receives progress events. Emitting never fails the run.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: Progress);

    fn log(&self, message: String) {
        self.emit(Progress::Log(message));
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn emit(&self, _event: Progress) {}
}

impl ProgressSink for UnboundedSender<Progress> {
    fn emit(&self, event: Progress) {
        if self.send(event).is_err() {
            tracing::trace!("Progress receiver dropped");
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct CollectProgress {
    events: Mutex<Vec<Progress>>,
}

impl CollectProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Progress> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Only the log lines
    pub fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Progress::Log(message) => Some(message),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for CollectProgress {
    fn emit(&self, event: Progress) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_collect_progress_keeps_order() {
        let sink = CollectProgress::new();
        sink.log("one".to_string());
        sink.emit(Progress::ExportComplete(PushOutcome::Unchanged));
        sink.log("two".to_string());

        assert_eq!(sink.events().len(), 3);
        assert_eq!(sink.messages(), vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_channel_sink_forwards_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.log("hello".to_string());
        assert_eq!(rx.try_recv().unwrap(), Progress::Log("hello".to_string()));
    }

    #[test]
    fn test_channel_sink_ignores_closed_receiver() {
        let (tx, rx) = mpsc::unbounded_channel::<Progress>();
        drop(rx);
        tx.log("nobody listening".to_string());
    }
}
