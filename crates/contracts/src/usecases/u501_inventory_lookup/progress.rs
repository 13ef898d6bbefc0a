use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::InventoryRecord;

/// Текущий прогресс фонового опроса (для real-time мониторинга)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupProgress {
    pub session_id: String,
    pub status: LookupStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,

    pub total: usize,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// vendorItemId, который запрашивается прямо сейчас
    pub current_item: Option<String>,

    /// Уже полученные записи, в порядке ввода
    pub results: Vec<InventoryRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStatus {
    Running,
    Completed,
    /// Завершен, но часть запросов вернула ошибку
    CompletedWithErrors,
    Cancelled,
}

impl LookupProgress {
    pub fn new(session_id: String, total: usize) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            status: LookupStatus::Running,
            started_at: now,
            completed_at: None,
            updated_at: now,
            total,
            processed: 0,
            succeeded: 0,
            failed: 0,
            current_item: None,
            results: Vec::new(),
        }
    }

    /// Учесть очередную запись
    pub fn push_record(&mut self, record: InventoryRecord) {
        if record.is_error() {
            self.failed += 1;
        } else {
            self.succeeded += 1;
        }
        self.processed += 1;
        self.results.push(record);
        self.updated_at = Utc::now();
    }

    pub fn is_finished(&self) -> bool {
        self.status != LookupStatus::Running
    }
}
