use std::sync::Arc;

use crate::usecases::u501_inventory_lookup::LookupExecutor;

/// Общее состояние HTTP-обработчиков
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<LookupExecutor>,
}
