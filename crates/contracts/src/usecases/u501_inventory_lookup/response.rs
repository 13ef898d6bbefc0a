use serde::{Deserialize, Serialize};

use super::progress::LookupStatus;
use super::record::InventoryRecord;

/// Ответ синхронного опроса: по одной записи на каждый vendorItemId
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupResponse {
    pub results: Vec<InventoryRecord>,
}

/// Список vendorItemId, извлеченный из загруженного CSV
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub option_ids: Vec<String>,
}

/// Ответ на запуск фонового опроса
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartLookupResponse {
    pub session_id: String,
    pub status: LookupStatus,
    pub message: String,
}
