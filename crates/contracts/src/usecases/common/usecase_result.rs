use serde::{Deserialize, Serialize};

/// Ошибка выполнения UseCase.
///
/// Сериализуется как `{"error": "...", "code": "..."}` — поле `error`
/// читает веб-страница оператора.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCaseError {
    pub code: String,
    #[serde(rename = "error")]
    pub message: String,
}

impl UseCaseError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn upload(message: impl Into<String>) -> Self {
        Self::new("UPLOAD_ERROR", message)
    }

    pub fn export(message: impl Into<String>) -> Self {
        Self::new("EXPORT_ERROR", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }
}

impl std::fmt::Display for UseCaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for UseCaseError {}
