use serde::{Deserialize, Serialize};

/// Заглушка для поля, отсутствующего в успешном ответе
pub const NOT_AVAILABLE: &str = "N/A";
/// Заглушка для всех полей записи при неудачном запросе
pub const ERROR_SENTINEL: &str = "ERROR";
/// Код ответа по умолчанию, если шлюз не прислал `code`
pub const SUCCESS_CODE: &str = "SUCCESS";

pub const STATUS_ON_SALE: &str = "판매중";
pub const STATUS_SUSPENDED: &str = "판매중지";

/// Сообщение, если ни шлюз, ни транспорт не дали текста ошибки
pub const DEFAULT_FAILURE_MESSAGE: &str = "API 호출 실패";

/// Колонки CSV в порядке выгрузки
pub const CSV_COLUMNS: [&str; 8] = [
    "조회일시",
    "옵션ID",
    "판매자상품ID",
    "재고수량",
    "판매가격",
    "판매상태",
    "응답코드",
    "메시지",
];

/// Результат опроса одного vendorItemId.
///
/// Имена полей совпадают с колонками CSV-выгрузки, поэтому одна и та же
/// структура используется и в JSON-ответе, и в экспорте.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    #[serde(rename = "조회일시")]
    pub queried_at: String,
    #[serde(rename = "옵션ID")]
    pub option_id: String,
    #[serde(rename = "판매자상품ID")]
    pub seller_item_id: String,
    #[serde(rename = "재고수량")]
    pub amount_in_stock: String,
    #[serde(rename = "판매가격")]
    pub sale_price: String,
    #[serde(rename = "판매상태")]
    pub sale_status: String,
    #[serde(rename = "응답코드")]
    pub response_code: String,
    #[serde(rename = "메시지", default)]
    pub message: String,
}

impl InventoryRecord {
    /// Запись для неудачного запроса: во всех полях данных `ERROR`
    pub fn failure(queried_at: String, option_id: String, message: String) -> Self {
        let message = if message.trim().is_empty() {
            DEFAULT_FAILURE_MESSAGE.to_string()
        } else {
            message
        };
        Self {
            queried_at,
            option_id,
            seller_item_id: ERROR_SENTINEL.to_string(),
            amount_in_stock: ERROR_SENTINEL.to_string(),
            sale_price: ERROR_SENTINEL.to_string(),
            sale_status: ERROR_SENTINEL.to_string(),
            response_code: ERROR_SENTINEL.to_string(),
            message,
        }
    }

    /// Запрос не удался. Смотрим на поле данных: `응답코드` приходит от шлюза
    /// и сам по себе может быть любым.
    pub fn is_error(&self) -> bool {
        self.sale_status == ERROR_SENTINEL
    }
}

pub fn sale_status_label(on_sale: bool) -> &'static str {
    if on_sale {
        STATUS_ON_SALE
    } else {
        STATUS_SUSPENDED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_fills_sentinels() {
        let record = InventoryRecord::failure("t".into(), "A1".into(), "boom".into());
        assert_eq!(record.seller_item_id, "ERROR");
        assert_eq!(record.amount_in_stock, "ERROR");
        assert_eq!(record.sale_price, "ERROR");
        assert_eq!(record.sale_status, "ERROR");
        assert_eq!(record.response_code, "ERROR");
        assert_eq!(record.message, "boom");
        assert!(record.is_error());
    }

    #[test]
    fn test_gateway_error_code_with_data_is_not_failure() {
        let record = InventoryRecord {
            queried_at: "t".into(),
            option_id: "A1".into(),
            seller_item_id: "S-1".into(),
            amount_in_stock: "3".into(),
            sale_price: "1000".into(),
            sale_status: STATUS_ON_SALE.into(),
            response_code: "ERROR".into(),
            message: String::new(),
        };
        assert!(!record.is_error());
    }

    #[test]
    fn test_failure_without_message_uses_default() {
        let record = InventoryRecord::failure("t".into(), "A1".into(), "  ".into());
        assert_eq!(record.message, DEFAULT_FAILURE_MESSAGE);
    }

    #[test]
    fn test_json_keys_match_csv_columns() {
        let record = InventoryRecord::failure("t".into(), "A1".into(), "boom".into());
        let json = serde_json::to_value(&record).unwrap();
        let object = json.as_object().unwrap();
        for column in CSV_COLUMNS {
            assert!(object.contains_key(column), "missing {}", column);
        }
        assert_eq!(object.len(), CSV_COLUMNS.len());
    }

    #[test]
    fn test_sale_status_label() {
        assert_eq!(sale_status_label(true), "판매중");
        assert_eq!(sale_status_label(false), "판매중지");
    }
}
