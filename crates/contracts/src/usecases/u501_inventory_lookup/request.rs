use serde::{Deserialize, Serialize};

use super::record::InventoryRecord;

/// Запрос на пакетный опрос остатков
///
/// Ключи приходят с каждым запросом и нигде не сохраняются.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub secret_key: String,
    /// Список vendorItemId в порядке ввода
    #[serde(default)]
    pub option_ids: Vec<String>,
}

// Secret key must never reach logs
impl std::fmt::Debug for LookupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupRequest")
            .field("access_key", &self.access_key)
            .field("secret_key", &"****")
            .field("option_ids", &self.option_ids)
            .finish()
    }
}

/// Запрос на выгрузку результатов в CSV
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub results: Vec<InventoryRecord>,
}

/// Вставленный оператором текст со списком vendorItemId
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseTextRequest {
    #[serde(default)]
    pub text: String,
}
