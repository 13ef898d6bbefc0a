use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use super::signer::SignedHeaders;
use crate::shared::config::GatewayConfig;
use crate::shared::marketplaces::InventoryGateway;

/// HTTP-клиент для работы с Coupang Open API
pub struct CoupangApiClient {
    client: reqwest::Client,
    base_url: String,
    request_log: Option<PathBuf>,
}

impl CoupangApiClient {
    pub fn new(config: &GatewayConfig) -> anyhow::Result<Self> {
        let mut client = Self::with_base_url(&config.base_url, config.timeout())?;
        client.request_log = config.request_log_path();
        Ok(client)
    }

    /// Клиент без журнала запросов
    pub fn with_base_url(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            request_log: None,
        })
    }

    /// Записать в лог-файл
    fn log_to_file(&self, message: &str) {
        let Some(path) = &self.request_log else {
            return;
        };
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let _ = writeln!(file, "[{}] {}", timestamp, message);
        }
    }
}

#[async_trait]
impl InventoryGateway for CoupangApiClient {
    /// GET /v2/providers/seller_api/apis/api/v1/marketplace/vendor-items/{id}/inventories
    async fn get_inventory(
        &self,
        path: &str,
        headers: &SignedHeaders,
    ) -> Result<InventoryPayload, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        self.log_to_file(&format!(
            "=== REQUEST ===\nGET {}\nAuthorization: CEA ****, signed-date={}",
            url, headers.signed_date
        ));

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, &headers.authorization)
            .header(reqwest::header::CONTENT_TYPE, headers.content_type)
            .send()
            .await
            .map_err(|e| {
                self.log_to_file(&format!("Request failed: {}", e));
                GatewayError::Transport(e)
            })?;

        let status = response.status();
        self.log_to_file(&format!("Response status: {}", status));

        let body = response.text().await?;

        if !status.is_success() {
            self.log_to_file(&format!("ERROR Response body:\n{}", body));
            tracing::warn!("Coupang API request failed with status {}", status);
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        self.log_to_file(&format!("=== RESPONSE BODY ===\n{}\n", body));

        serde_json::from_str::<InventoryPayload>(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            tracing::error!("Failed to parse Coupang API response: {}. Body: {}", e, preview);
            GatewayError::Decode(e.to_string())
        })
    }
}

/// Текст ошибки из JSON-ответа шлюза (`{"code": ..., "message": "..."}`)
fn error_message(body: &str) -> Option<String> {
    let payload: ErrorPayload = serde_json::from_str(body).ok()?;
    match payload.message? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::String(_) | Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: Option<Value>,
}

/// Ошибка одного запроса к шлюзу
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Сеть, таймаут, обрыв соединения
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed with status code {status}")]
    Status { status: u16, message: Option<String> },

    #[error("Failed to parse gateway response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Сообщение для оператора: текст от шлюза, если он есть, иначе описание ошибки
    pub fn operator_message(&self) -> String {
        match self {
            GatewayError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// Response structures для Coupang Open API
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InventoryPayload {
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<InventoryData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryData {
    #[serde(default)]
    pub seller_item_id: Option<Value>,
    #[serde(default)]
    pub amount_in_stock: Option<Value>,
    #[serde(default)]
    pub sale_price: Option<Value>,
    #[serde(default)]
    pub on_sale: Option<bool>,
}

impl InventoryPayload {
    /// Код ответа строкой; шлюз присылает его то строкой, то числом
    pub fn code_text(&self) -> Option<String> {
        match self.code.as_ref()? {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}
