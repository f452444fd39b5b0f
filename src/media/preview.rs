//! Full-size rendition loading for the overlay
//! Downloads the large image and decodes it without cropping
use image::imageops::FilterType;
use tracing::debug;

use super::{decode_blocking, fetch_bytes, DecodedImage, MediaError};

/// Renditions wider or taller than this are scaled down to save memory
pub const MAX_PREVIEW_EDGE: u32 = 2048;

/// Download and decode the full-size image at `url`
pub async fn load_full_size(http: reqwest::Client, url: String) -> Result<DecodedImage, MediaError> {
    let bytes = fetch_bytes(&http, &url).await?;
    let preview = decode_blocking(move || decode_preview(&bytes)).await?;
    debug!(width = preview.width, height = preview.height, "full-size preview ready");
    Ok(preview)
}

/// Decode a full-size image, only shrinking it past `MAX_PREVIEW_EDGE`
pub fn decode_preview(bytes: &[u8]) -> Result<DecodedImage, MediaError> {
    let img = image::load_from_memory(bytes).map_err(|e| MediaError::Decode(e.to_string()))?;

    let img = if img.width() > MAX_PREVIEW_EDGE || img.height() > MAX_PREVIEW_EDGE {
        img.resize(MAX_PREVIEW_EDGE, MAX_PREVIEW_EDGE, FilterType::Triangle)
    } else {
        img
    };

    Ok(img.to_rgba8().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;

    #[test]
    fn test_preview_keeps_full_resolution() {
        let img = RgbaImage::from_pixel(1280, 853, image::Rgba([1, 2, 3, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();

        let preview = decode_preview(&out.into_inner()).unwrap();

        assert_eq!((preview.width, preview.height), (1280, 853));
    }
}
