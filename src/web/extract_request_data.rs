use axum::{
    body,
    extract::{FromRequest, Multipart, Request},
    http::header,
};
use tracing::{debug, warn};

use super::error::ApiError;

/// A single file received in an upload request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Extracts every file carried under the repeated `files` multipart field,
/// in submission order. Non-file fields are ignored.
pub async fn extract_upload_set(request: Request) -> Result<Vec<UploadedFile>, ApiError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to process multipart request: {}", e)))?;

    let mut files = Vec::new();
    let mut ignored_fields = 0;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to process multipart field: {}", e)))?
    {
        if field.name() == Some("files") {
            let name = field
                .file_name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("file-{}", files.len() + 1));
            let content_type = field.content_type().map(str::to_string);
            debug!("Received file '{}' with content type: {:?}", name, content_type);

            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read file data: {}", e)))?
                .to_vec();

            files.push(UploadedFile {
                name,
                content_type,
                data,
            });
        } else {
            let field_name = field.name().unwrap_or("unnamed").to_string();
            debug!("Ignoring multipart field: {}", field_name);
            ignored_fields += 1;
        }
    }

    if ignored_fields > 0 {
        debug!(
            "Ignored {} non-file fields in multipart request",
            ignored_fields
        );
    }

    Ok(files)
}

/// Extracts exactly one file from the request: either the `file` multipart
/// field or, for non-multipart requests, the raw request body.
pub async fn extract_request_file(
    request: Request,
) -> Result<(Vec<u8>, Option<String>), ApiError> {
    // Get the content type from the request headers
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if content_type.starts_with("multipart/form-data") {
        extract_multipart_file(request).await
    } else {
        extract_direct_file(request, &content_type).await
    }
}

// Helper function to extract file data from a multipart request
async fn extract_multipart_file(request: Request) -> Result<(Vec<u8>, Option<String>), ApiError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to process multipart request: {}", e)))?;

    let mut file_data_opt: Option<Vec<u8>> = None;
    let mut content_type_opt: Option<String> = None;

    // Loop through all fields to find "file" and ignore others
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to process multipart field: {}", e)))?
    {
        if field.name() == Some("file") {
            if file_data_opt.is_some() {
                // Found a second "file" field
                warn!("Multiple 'file' fields found in multipart request, using the last one");
            }

            let content_type_str = field.content_type().map(str::to_string);
            debug!("Received file with content type: {:?}", content_type_str);

            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read file data: {}", e)))?
                .to_vec();

            if data.is_empty() {
                return Err(ApiError::BadRequest(
                    "Uploaded 'file' field is empty.".to_string(),
                ));
            }

            file_data_opt = Some(data);
            content_type_opt = content_type_str;
        } else {
            let field_name = field.name().unwrap_or("unnamed").to_string();
            debug!("Ignoring multipart field: {}", field_name);
        }
    }

    match file_data_opt {
        Some(data) => Ok((data, content_type_opt)),
        None => Err(ApiError::BadRequest(
            "Missing 'file' field in multipart request.".to_string(),
        )),
    }
}

// Helper function to extract file data from a direct (non-multipart) request
async fn extract_direct_file(
    request: Request,
    content_type: &str,
) -> Result<(Vec<u8>, Option<String>), ApiError> {
    // Validate that Content-Type is a supported media type
    let supported = content_type
        .parse::<mime::Mime>()
        .ok()
        .is_some_and(|m| {
            m.type_() == mime::IMAGE
                || (m.type_() == mime::APPLICATION && m.subtype() == mime::OCTET_STREAM)
        });
    if !supported {
        return Err(ApiError::UnsupportedMediaType(format!(
            "Content-Type '{}' is not supported. Expected image/*, multipart/form-data, or application/octet-stream.",
            content_type
        )));
    }

    // Extract the body as bytes
    let body = request.into_body();
    let bytes = body::to_bytes(body, usize::MAX)
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read request body: {}", e)))?;

    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Request body is empty.".to_string()));
    }

    Ok((bytes.to_vec(), Some(content_type.to_string())))
}
