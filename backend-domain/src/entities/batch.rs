// Batch ingestion result

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::Event;

/// A submitted line that did not become an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedLine {
    pub record: Value,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub added: Vec<Event>,
    pub added_count: usize,
    pub failed: Vec<FailedLine>,
    pub failed_count: usize,
}

impl BatchResult {
    pub fn push_added(&mut self, event: Event) {
        self.added.push(event);
        self.added_count = self.added.len();
    }

    pub fn push_failed(&mut self, line: FailedLine) {
        self.failed.push(line);
        self.failed_count = self.failed.len();
    }

    pub fn total(&self) -> usize {
        self.added_count + self.failed_count
    }
}
