//! Сбор списка vendorItemId из вставленного текста или загруженного CSV.

use std::collections::HashSet;

use super::error::LookupError;

/// Заголовки колонки с vendorItemId, встречающиеся в выгрузках продавцов
const KNOWN_ID_HEADERS: [&str; 5] = ["옵션 id", "옵션id", "option_id", "vendoritemid", "optionid"];

/// Обрезать пробелы, выбросить пустые, убрать повторы с сохранением порядка
pub fn normalize<I, S>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    for id in ids {
        let id = id.as_ref().trim();
        if id.is_empty() {
            continue;
        }
        if seen.insert(id.to_string()) {
            result.push(id.to_string());
        }
    }
    result
}

/// Разобрать вставленный текст: разделители — перевод строки, запятая,
/// точка с запятой, табуляция и пробел
pub fn parse_text(text: &str) -> Vec<String> {
    normalize(
        text.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
            .filter(|s| !s.is_empty()),
    )
}

/// Разобрать загруженный CSV.
///
/// Первая строка — заголовок. Если в нем есть известное имя колонки
/// с vendorItemId, берется она, иначе первая колонка.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<String>, LookupError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| LookupError::Upload(format!("invalid UTF-8: {}", e)))?;
    // Strip UTF-8 BOM if present
    let text = text.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| LookupError::Upload(e.to_string()))?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        rows.push(record);
    }

    let Some((header, data)) = rows.split_first() else {
        return Ok(Vec::new());
    };

    let column = header
        .iter()
        .position(|name| KNOWN_ID_HEADERS.contains(&name.to_lowercase().as_str()))
        .unwrap_or(0);
    tracing::debug!("Option id column: {} ({:?})", column, header.get(column));

    Ok(normalize(data.iter().filter_map(|row| row.get(column))))
}
