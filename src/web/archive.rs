// In-memory zip assembly for the archive endpoint

use std::io::{Cursor, Write};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use super::{error::ApiError, extract_request_data::UploadedFile};

/// Builds a zip archive holding every input file at its original name,
/// in submission order. The whole archive lives in memory; callers must
/// reject empty input sets before calling this.
pub fn build_zip_archive(files: &[UploadedFile]) -> Result<Vec<u8>, ApiError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for file in files {
        zip.start_file(file.name.as_str(), options).map_err(|e| {
            ApiError::ArchiveError(format!(
                "Failed to add '{}' to archive: {}",
                file.name, e
            ))
        })?;
        zip.write_all(&file.data).map_err(|e| {
            ApiError::ArchiveError(format!(
                "Failed to write '{}' into archive: {}",
                file.name, e
            ))
        })?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| ApiError::ArchiveError(format!("Failed to finalize archive: {}", e)))?;

    Ok(cursor.into_inner())
}
