//! Подпись запросов к Coupang Open API (схема `CEA`, HMAC-SHA256).
//!
//! Строка для подписи: `signed-date + method + path [+ "?" + query]`,
//! где `signed-date` — UTC-время в формате `yyMMdd'T'HHmmss'Z'`.
//! Шлюз принимает только этот формат даты.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const ALGORITHM: &str = "HmacSHA256";
pub const CONTENT_TYPE: &str = "application/json;charset=UTF-8";

const SIGNED_DATE_FORMAT: &str = "%y%m%dT%H%M%SZ";

/// Пара ключей продавца
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Оба ключа заданы (пробелы не считаются)
    pub fn is_complete(&self) -> bool {
        !self.access_key.trim().is_empty() && !self.secret_key.trim().is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"****")
            .finish()
    }
}

/// Заголовки подписанного запроса
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub authorization: String,
    pub content_type: &'static str,
    /// signed-date, вошедший в подпись
    pub signed_date: String,
}

/// HMAC-SHA256 подпись запросов Coupang
#[derive(Debug, Clone)]
pub struct CoupangHmacSigner {
    credentials: Credentials,
}

impl CoupangHmacSigner {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Подписать запрос на момент `now`.
    ///
    /// `query` передается без ведущего `?`; пустая строка — запрос без параметров.
    pub fn sign(&self, method: &str, path: &str, query: &str, now: DateTime<Utc>) -> SignedHeaders {
        let signed_date = signed_date(now);
        let message = canonical_message(&signed_date, method, path, query);
        let signature = compute_signature(&self.credentials.secret_key, &message);

        SignedHeaders {
            authorization: format!(
                "CEA algorithm={}, access-key={}, signed-date={}, signature={}",
                ALGORITHM, self.credentials.access_key, signed_date, signature
            ),
            content_type: CONTENT_TYPE,
            signed_date,
        }
    }
}

/// Дата подписи: 2-значный год, без разделителей, литералы `T` и `Z`
pub fn signed_date(now: DateTime<Utc>) -> String {
    now.format(SIGNED_DATE_FORMAT).to_string()
}

pub fn canonical_message(signed_date: &str, method: &str, path: &str, query: &str) -> String {
    if query.is_empty() {
        format!("{}{}{}", signed_date, method, path)
    } else {
        format!("{}{}{}?{}", signed_date, method, path, query)
    }
}

/// HMAC-SHA256 в нижнем hex
pub fn compute_signature(secret_key: &str, message: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret_key.as_bytes()).expect("HMAC can take any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
