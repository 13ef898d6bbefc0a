use contracts::usecases::common::UseCaseError;

/// Ошибки уровня всего запроса. Ошибки отдельных vendorItemId сюда не
/// попадают: они записываются в результат как строки со статусом `ERROR`.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// Не хватает ключей или списка vendorItemId; запросы к шлюзу не выполнялись
    #[error("{0}")]
    Validation(String),

    /// Загруженный CSV не удалось разобрать
    #[error("CSV 파싱 실패: {0}")]
    Upload(String),

    /// Выгрузку в CSV сформировать не удалось
    #[error("{0}")]
    Export(String),
}

impl LookupError {
    pub fn missing_input() -> Self {
        LookupError::Validation("필수 정보가 부족합니다.".to_string())
    }
}

impl From<LookupError> for UseCaseError {
    fn from(err: LookupError) -> Self {
        let message = err.to_string();
        match err {
            LookupError::Validation(_) => UseCaseError::validation(message),
            LookupError::Upload(_) => UseCaseError::upload(message),
            LookupError::Export(_) => UseCaseError::export(message),
        }
    }
}
