use axum::{
    extract::{multipart::Multipart, rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use contracts::usecases::common::UseCaseError;
use contracts::usecases::u501_inventory_lookup::{
    ExportRequest, LookupProgress, LookupRequest, LookupResponse, ParseTextRequest,
    StartLookupResponse, UploadResponse,
};

use crate::api::state::AppState;
use crate::shared::marketplaces::coupang::Credentials;
use crate::usecases::u501_inventory_lookup::{csv_export, option_ids, LookupError};

type ApiError = (StatusCode, Json<UseCaseError>);

fn bad_request(err: impl Into<UseCaseError>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(err.into()))
}

/// Тело запроса или понятная ошибка вместо стандартного текста axum
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|e| bad_request(UseCaseError::validation(e.body_text())))
}

fn split_request(request: LookupRequest) -> (Credentials, Vec<String>) {
    let option_ids = option_ids::normalize(&request.option_ids);
    (
        Credentials::new(request.access_key, request.secret_key),
        option_ids,
    )
}

/// POST /api/inventory
pub async fn lookup(
    State(state): State<AppState>,
    payload: Result<Json<LookupRequest>, JsonRejection>,
) -> Result<Json<LookupResponse>, ApiError> {
    let (credentials, option_ids) = split_request(json_body(payload)?);

    match state.executor.run_batch(&credentials, &option_ids).await {
        Ok(results) => Ok(Json(LookupResponse { results })),
        Err(e) => {
            tracing::warn!("Inventory lookup rejected: {}", e);
            Err(bad_request(e))
        }
    }
}

/// POST /api/inventory/sessions
pub async fn start_session(
    State(state): State<AppState>,
    payload: Result<Json<LookupRequest>, JsonRejection>,
) -> Result<Json<StartLookupResponse>, ApiError> {
    let (credentials, option_ids) = split_request(json_body(payload)?);

    match state.executor.start_session(credentials, option_ids) {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::warn!("Failed to start lookup session: {}", e);
            Err(bad_request(e))
        }
    }
}

/// GET /api/inventory/sessions/:session_id
pub async fn get_progress(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<LookupProgress>, ApiError> {
    state
        .executor
        .get_progress(&session_id)
        .map(Json)
        .ok_or_else(|| session_not_found(&session_id))
}

/// POST /api/inventory/sessions/:session_id/cancel
pub async fn cancel_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.executor.cancel_session(&session_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(&session_id))
    }
}

fn session_not_found(session_id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(UseCaseError::not_found(format!(
            "Active session not found: {}",
            session_id
        ))),
    )
}

/// POST /api/download-csv
pub async fn download_csv(
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = json_body(payload)?;
    let csv = csv_export::export_csv(&request.results).map_err(bad_request)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", csv_export::EXPORT_FILE_NAME),
            ),
        ],
        csv,
    )
        .into_response())
}

/// POST /api/upload-csv (multipart, поле `file`)
pub async fn upload_csv(mut multipart: Multipart) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(LookupError::Upload(e.body_text())))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| bad_request(LookupError::Upload(e.body_text())))?;
        let option_ids = option_ids::parse_csv(&bytes).map_err(|e| {
            tracing::warn!("Uploaded CSV rejected: {}", e);
            bad_request(e)
        })?;
        tracing::info!("Parsed {} option ids from uploaded CSV", option_ids.len());
        return Ok(Json(UploadResponse { option_ids }));
    }

    Err(bad_request(UseCaseError::upload("파일이 없습니다.")))
}

/// POST /api/option-ids/parse
pub async fn parse_text(
    payload: Result<Json<ParseTextRequest>, JsonRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let request = json_body(payload)?;
    Ok(Json(UploadResponse {
        option_ids: option_ids::parse_text(&request.text),
    }))
}
