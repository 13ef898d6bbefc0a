pub mod progress;
pub mod record;
pub mod request;
pub mod response;

pub use progress::{LookupProgress, LookupStatus};
pub use record::InventoryRecord;
pub use request::{ExportRequest, LookupRequest, ParseTextRequest};
pub use response::{LookupResponse, StartLookupResponse, UploadResponse};

use crate::usecases::common::UseCaseMetadata;

pub struct InventoryLookup;

impl UseCaseMetadata for InventoryLookup {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "inventory_lookup"
    }

    fn display_name() -> &'static str {
        "재고 조회"
    }

    fn description() -> &'static str {
        "Запрос остатков, цены и статуса продажи по списку vendorItemId через Coupang Open API"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        assert_eq!(InventoryLookup::full_name(), "u501_inventory_lookup");
    }
}
