use crate::error::{AppError, Result};
use crate::model::{ShortenRequest, ShortenResponse};
use crate::qr;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use burrow_core::ShortCode;
use tracing::{info, warn};

pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>> {
    let Json(request) = payload?;
    let url = request
        .url
        .ok_or_else(|| AppError::BadRequest("No URL provided".to_string()))?;

    let base_url = state.public_base_url(&headers)?;
    let shortened = state.shortener().shorten(&url).await?;
    let short_url = shortened.code.to_url(&base_url);

    info!(
        code = %shortened.code,
        url = %shortened.original_url,
        created = shortened.created,
        "shortened url"
    );

    let qr_code = match qr::png_data_uri(&short_url, state.qr_options()) {
        Ok(uri) => Some(uri),
        Err(e) => {
            warn!(error = %e, short_url = %short_url, "failed to render QR code");
            None
        }
    };

    Ok(Json(ShortenResponse {
        original_url: shortened.original_url,
        short_url,
        qr_code,
    }))
}

pub async fn redirect_handler(
    State(state): State<AppState>,
    path: std::result::Result<Path<String>, PathRejection>,
) -> Result<Response> {
    let Path(code) = path?;
    let code = ShortCode::new(code)?;

    let record = state
        .shortener()
        .resolve(&code)
        .await?
        .ok_or_else(|| AppError::NotFound("short URL not found".to_string()))?;

    Ok((StatusCode::FOUND, [(header::LOCATION, record.original_url)]).into_response())
}
