//! Coupang Open API: подпись запросов и HTTP-клиент.

pub mod api_client;
pub mod signer;

pub use api_client::{CoupangApiClient, GatewayError, InventoryData, InventoryPayload};
pub use signer::{CoupangHmacSigner, Credentials, SignedHeaders};

const INVENTORY_PATH_PREFIX: &str =
    "/v2/providers/seller_api/apis/api/v1/marketplace/vendor-items";

/// Путь запроса остатков/цены/статуса для одного vendorItemId
pub fn inventory_path(option_id: &str) -> String {
    format!(
        "{}/{}/inventories",
        INVENTORY_PATH_PREFIX,
        urlencoding::encode(option_id)
    )
}
