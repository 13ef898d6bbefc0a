use contracts::usecases::u501_inventory_lookup::InventoryRecord;

use super::error::LookupError;

/// Excel открывает UTF-8 CSV корректно только с BOM
const UTF8_BOM: &str = "\u{FEFF}";

pub const EXPORT_FILE_NAME: &str = "inventory.csv";

/// Сформировать CSV: BOM, строка заголовка, по строке на запись
pub fn export_csv(records: &[InventoryRecord]) -> Result<String, LookupError> {
    if records.is_empty() {
        return Err(LookupError::Export("CSV 데이터가 없습니다.".to_string()));
    }

    // Заголовок берется из serde-имен полей записи
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| LookupError::Export(format!("CSV 생성 실패: {}", e)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| LookupError::Export(format!("CSV 생성 실패: {}", e)))?;
    let body =
        String::from_utf8(bytes).map_err(|e| LookupError::Export(format!("CSV 생성 실패: {}", e)))?;

    Ok(format!("{}{}", UTF8_BOM, body))
}
