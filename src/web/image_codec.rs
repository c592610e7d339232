use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

use super::error::ApiError;

// Helper function to decode various input image formats
pub fn decode_input_image(
    file_data: &[u8],
    content_type_str: Option<&str>,
) -> Result<DynamicImage, ApiError> {
    let media_type = content_type_str.map(|s| s[0..s.find(';').unwrap_or(s.len())].trim());

    let img_format_hint = match media_type {
        Some("image/jpeg") => Some(image::ImageFormat::Jpeg),
        Some("image/png") => Some(image::ImageFormat::Png),
        Some("image/webp") => Some(image::ImageFormat::WebP),
        Some("image/gif") => Some(image::ImageFormat::Gif),
        Some("image/bmp") => Some(image::ImageFormat::Bmp),
        Some("image/x-bmp") => Some(image::ImageFormat::Bmp),
        Some("image/tiff") => Some(image::ImageFormat::Tiff),
        _ => None,
    };

    match (media_type, img_format_hint) {
        // If an image format is detected from Content-Type or Content-Type is not provided
        // or is a generic binary type, decode (auto-detecting when there is no hint).
        (_, Some(_)) | (None, _) | (Some("application/octet-stream"), _) => {
            if let Some(format) = img_format_hint {
                image::load_from_memory_with_format(file_data, format).map_err(|e| {
                    ApiError::ImageProcessingError(format!(
                        "Failed to decode image (format: {:?}): {}",
                        format, e
                    ))
                })
            } else {
                image::load_from_memory(file_data).map_err(|e| {
                    ApiError::ImageProcessingError(format!(
                        "Failed to auto-detect and decode image: {}",
                        e
                    ))
                })
            }
        }
        // If Content-Type is provided but not a known image type, try auto-detection
        // anyway; multipart uploads from browsers often carry unhelpful types.
        (Some(declared), _) => {
            debug!(
                "Content type '{}' not recognized, auto-detecting image format",
                declared
            );
            image::load_from_memory(file_data).map_err(|e| {
                ApiError::ImageProcessingError(format!(
                    "Failed to auto-detect and decode image: {}",
                    e
                ))
            })
        }
    }
}

// Helper function to encode an image as PNG
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, ApiError> {
    debug!("Encoding output as PNG.");

    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)
        .map_err(|e| ApiError::ImageProcessingError(format!("PNG encoding failed: {}", e)))?;

    Ok(buffer.into_inner())
}

// Helper function to encode an image as JPEG at the given quality (1-100).
// Alpha is flattened to RGB since JPEG has no alpha channel.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, ApiError> {
    debug!("Encoding output as JPEG (quality {}).", quality);

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut buffer = Cursor::new(Vec::new());
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .encode(rgb.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| ApiError::ImageProcessingError(format!("JPEG encoding failed: {}", e)))?;

    Ok(buffer.into_inner())
}

/// Size savings of a recompression as a percentage, formatted for display.
pub fn savings_percent(original_size: usize, compressed_size: usize) -> String {
    if original_size == 0 {
        return "0.0".to_string();
    }
    let ratio = 1.0 - compressed_size as f64 / original_size as f64;
    format!("{:.1}", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    fn test_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x * 37 % 256) as u8, (y * 11 % 256) as u8, 128])
        }))
    }

    #[test]
    fn test_png_round_trip_preserves_dimensions() {
        let img = test_image(13, 7);
        let png = encode_png(&img).unwrap();

        let decoded = decode_input_image(&png, Some("image/png")).unwrap();
        assert_eq!(decoded.dimensions(), (13, 7));
    }

    #[test]
    fn test_decode_with_format_hint() {
        let img = test_image(4, 4);
        let jpeg = encode_jpeg(&img, 90).unwrap();

        let decoded = decode_input_image(&jpeg, Some("image/jpeg")).unwrap();
        assert_eq!(decoded.dimensions(), (4, 4));
    }

    #[test]
    fn test_decode_auto_detects_without_hint() {
        let img = test_image(5, 3);
        let png = encode_png(&img).unwrap();

        let decoded = decode_input_image(&png, None).unwrap();
        assert_eq!(decoded.dimensions(), (5, 3));
    }

    #[test]
    fn test_decode_ignores_parameters_in_content_type() {
        let img = test_image(3, 3);
        let png = encode_png(&img).unwrap();

        let decoded = decode_input_image(&png, Some("image/png; charset=binary")).unwrap();
        assert_eq!(decoded.dimensions(), (3, 3));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = decode_input_image(b"definitely not an image", None);
        assert!(matches!(result, Err(ApiError::ImageProcessingError(_))));
    }

    #[test]
    fn test_jpeg_flattens_alpha() {
        let rgba = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            6,
            6,
            image::Rgba([200, 100, 50, 128]),
        ));

        let jpeg = encode_jpeg(&rgba, 80).unwrap();
        let decoded = decode_input_image(&jpeg, Some("image/jpeg")).unwrap();
        assert_eq!(decoded.dimensions(), (6, 6));
        assert!(!decoded.color().has_alpha());
    }

    #[test]
    fn test_lower_quality_is_smaller() {
        let img = test_image(64, 64);
        let high = encode_jpeg(&img, 95).unwrap();
        let low = encode_jpeg(&img, 15).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_savings_percent() {
        assert_eq!(savings_percent(1000, 250), "75.0");
        assert_eq!(savings_percent(1000, 1000), "0.0");
        assert_eq!(savings_percent(0, 100), "0.0");
    }
}
