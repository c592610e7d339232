// API handlers for the web server

use super::{
    SharedState,
    archive::build_zip_archive,
    error::ApiError,
    extract_request_data::{extract_request_file, extract_upload_set},
    image_codec::{decode_input_image, encode_jpeg, encode_png, savings_percent},
    models::*,
};
use crate::rates::{Conversion, is_currency_code};
use axum::{
    Json,
    extract::{Path, Query, Request, State},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::{debug, info};
use uuid::Uuid;

const DEFAULT_JPEG_QUALITY: u8 = 80;
const MIN_JPEG_QUALITY: u8 = 10;
const MAX_JPEG_QUALITY: u8 = 100;

// --- POST /api/compress ---
// Bundles every uploaded file into a single zip archive
pub async fn create_archive(request: Request) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();

    let files = extract_upload_set(request).await?;
    if files.is_empty() {
        return Err(ApiError::BadRequest("No files".to_string()));
    }

    info!(
        "Archive request: {} file(s), {} bytes total, request_id={}",
        files.len(),
        files.iter().map(|f| f.data.len()).sum::<usize>(),
        request_id
    );

    // The whole archive is assembled in memory before responding
    let zipped = tokio::task::spawn_blocking(move || build_zip_archive(&files))
        .await
        .map_err(|e| ApiError::InternalServerError(format!("Archive task failed: {}", e)))??;

    debug!("Archive built: {} bytes", zipped.len());

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"archive.zip\"",
            ),
        ],
        zipped,
    )
        .into_response())
}

// --- POST /api/convert-image ---
// Re-encodes the uploaded image as PNG
pub async fn convert_image(request: Request) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();

    let (file_data, input_content_type) = extract_request_file(request).await?;

    info!(
        "Convert request: {} bytes, content_type={:?}, request_id={}",
        file_data.len(),
        input_content_type,
        request_id
    );

    let converted = tokio::task::spawn_blocking(move || {
        let img = decode_input_image(&file_data, input_content_type.as_deref())?;
        debug!("Input image decoded: {}x{}", img.width(), img.height());
        encode_png(&img)
    })
    .await
    .map_err(|e| ApiError::InternalServerError(format!("Image convert task failed: {}", e)))??;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"converted.png\"",
            ),
        ],
        converted,
    )
        .into_response())
}

// --- POST /api/compress-image?quality=N ---
// Re-encodes the uploaded image as JPEG at the requested quality
pub async fn compress_image(
    Query(params): Query<CompressQuery>,
    request: Request,
) -> Result<Response, ApiError> {
    let quality = params.quality.unwrap_or(DEFAULT_JPEG_QUALITY);
    if !(MIN_JPEG_QUALITY..=MAX_JPEG_QUALITY).contains(&quality) {
        return Err(ApiError::BadRequest(format!(
            "Invalid quality parameter: must be between {} and {}",
            MIN_JPEG_QUALITY, MAX_JPEG_QUALITY
        )));
    }

    let request_id = Uuid::new_v4();

    let (file_data, input_content_type) = extract_request_file(request).await?;
    let original_size = file_data.len();

    info!(
        "Compress request: {} bytes, quality={}, request_id={}",
        original_size, quality, request_id
    );

    let compressed = tokio::task::spawn_blocking(move || {
        let img = decode_input_image(&file_data, input_content_type.as_deref())?;
        encode_jpeg(&img, quality)
    })
    .await
    .map_err(|e| ApiError::InternalServerError(format!("Image compress task failed: {}", e)))??;

    let compressed_size = compressed.len();
    debug!(
        "Compressed {} -> {} bytes ({}% saved)",
        original_size,
        compressed_size,
        savings_percent(original_size, compressed_size)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "image/jpeg".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"compressed.jpg\"".to_string(),
            ),
            (
                header::HeaderName::from_static("x-original-size"),
                original_size.to_string(),
            ),
            (
                header::HeaderName::from_static("x-compressed-size"),
                compressed_size.to_string(),
            ),
        ],
        compressed,
    )
        .into_response())
}

// --- GET /api/rates/{base} ---
// Fetches a fresh rate table for the base currency
pub async fn get_rates(
    State(state): State<SharedState>,
    Path(base): Path<String>,
) -> Result<Json<RatesResponse>, ApiError> {
    if !is_currency_code(&base) {
        return Err(ApiError::BadRequest(format!(
            "Invalid currency code '{}'",
            base
        )));
    }
    let base = base.to_uppercase();

    let rates = state.rate_client.latest(&base).await?;

    Ok(Json(RatesResponse { base, rates }))
}

// --- GET /api/convert-currency?from=X&to=Y&amount=N ---
// Converts an amount between two currencies at the current rate
pub async fn convert_currency(
    State(state): State<SharedState>,
    Query(params): Query<ConvertCurrencyQuery>,
) -> Result<Json<ConvertCurrencyResponse>, ApiError> {
    if !is_currency_code(&params.from) || !is_currency_code(&params.to) {
        return Err(ApiError::BadRequest(format!(
            "Invalid currency code in '{}' -> '{}'",
            params.from, params.to
        )));
    }
    if !params.amount.is_finite() || params.amount < 0.0 {
        return Err(ApiError::BadRequest(
            "Invalid amount: must be a non-negative number".to_string(),
        ));
    }

    let mut conversion = Conversion::new(&params.from, &params.to, params.amount);

    let rates = state.rate_client.latest(&conversion.from).await?;

    let rate = *rates.get(&conversion.to).ok_or_else(|| {
        ApiError::NotFound(format!("Exchange rate for {} not available", conversion.to))
    })?;
    conversion.apply(&rates);

    debug!(
        "Converted {} {} -> {} at rate {}",
        conversion.amount, conversion.from, conversion.to, rate
    );

    Ok(Json(ConvertCurrencyResponse {
        // apply() leaves no result for a zero amount; zero of anything is zero
        result: conversion.result.unwrap_or(0.0),
        from: conversion.from,
        to: conversion.to,
        amount: conversion.amount,
        rate,
    }))
}
