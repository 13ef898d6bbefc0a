use contracts::usecases::u501_inventory_lookup::{InventoryRecord, LookupProgress, LookupStatus};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::watch;

/// Трекер прогресса фоновых опросов (in-memory, для real-time мониторинга)
#[derive(Clone, Default)]
pub struct ProgressTracker {
    sessions: Arc<RwLock<HashMap<String, LookupProgress>>>,
    cancel_signals: Arc<RwLock<HashMap<String, watch::Sender<bool>>>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn sessions(&self) -> RwLockReadGuard<'_, HashMap<String, LookupProgress>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn sessions_mut(&self) -> RwLockWriteGuard<'_, HashMap<String, LookupProgress>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }

    fn signals_mut(&self) -> RwLockWriteGuard<'_, HashMap<String, watch::Sender<bool>>> {
        self.cancel_signals.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Создать новую сессию; возвращает приемник сигнала отмены
    pub fn create_session(&self, session_id: String, total: usize) -> watch::Receiver<bool> {
        let (tx, rx) = watch::channel(false);
        self.signals_mut().insert(session_id.clone(), tx);
        self.sessions_mut()
            .insert(session_id.clone(), LookupProgress::new(session_id, total));
        rx
    }

    /// Получить текущий прогресс сессии
    pub fn get_progress(&self, session_id: &str) -> Option<LookupProgress> {
        self.sessions().get(session_id).cloned()
    }

    /// Установить текущий обрабатываемый vendorItemId
    pub fn set_current_item(&self, session_id: &str, option_id: Option<String>) {
        if let Some(progress) = self.sessions_mut().get_mut(session_id) {
            progress.current_item = option_id;
            progress.updated_at = chrono::Utc::now();
        }
    }

    /// Добавить полученную запись
    pub fn record_item(&self, session_id: &str, record: InventoryRecord) {
        if let Some(progress) = self.sessions_mut().get_mut(session_id) {
            progress.push_record(record);
        }
    }

    /// Завершить сессию
    pub fn complete_session(&self, session_id: &str, status: LookupStatus) {
        self.signals_mut().remove(session_id);
        if let Some(progress) = self.sessions_mut().get_mut(session_id) {
            let now = chrono::Utc::now();
            progress.status = status;
            progress.current_item = None;
            progress.completed_at = Some(now);
            progress.updated_at = now;
        }
    }

    /// Удалить завершенные сессии старше `max_age` (для очистки памяти).
    /// Возвращает число удаленных.
    pub fn cleanup_old_sessions(&self, max_age: chrono::Duration) -> usize {
        let now = chrono::Utc::now();
        let mut sessions = self.sessions_mut();
        let before = sessions.len();
        sessions.retain(|_, progress| match progress.completed_at {
            Some(completed_at) => now - completed_at < max_age,
            // Активные сессии не трогаем
            None => true,
        });
        before - sessions.len()
    }

    /// Запросить отмену. `false`, если сессии нет или она уже завершена.
    pub fn request_cancel(&self, session_id: &str) -> bool {
        match self.signals_mut().get(session_id) {
            Some(tx) => {
                tx.send_replace(true);
                true
            }
            None => false,
        }
    }
}
