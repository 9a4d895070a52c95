use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A finished item. Never changed after it is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedRecord {
    pub text: String,
    pub category: String,
    #[serde(rename = "date")]
    pub completed_at: DateTime<Utc>,
}

impl CompletedRecord {
    pub fn new(text: impl Into<String>, category: impl Into<String>, completed_at: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
            completed_at,
        }
    }
}

/// Append-only history of completed items, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletedLog {
    records: Vec<CompletedRecord>,
}

impl CompletedLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<CompletedRecord>) -> Self {
        Self { records }
    }

    pub fn append(&mut self, record: CompletedRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[CompletedRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&CompletedRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
