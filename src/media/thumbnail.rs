use image::imageops::FilterType;
use tracing::debug;

use super::{decode_blocking, fetch_bytes, DecodedImage, MediaError};
use crate::state::data::Image;

/// Longest edge of a gallery thumbnail
pub const THUMBNAIL_SIZE: u32 = 320;

/// Download and decode the gallery thumbnail for `image`
pub async fn load_thumbnail(
    http: reqwest::Client,
    image: Image,
) -> Result<DecodedImage, MediaError> {
    let bytes = fetch_bytes(&http, &image.thumbnail_url).await?;
    let thumbnail = decode_blocking(move || decode_thumbnail(&bytes)).await?;
    debug!(
        image_id = image.id,
        width = thumbnail.width,
        height = thumbnail.height,
        "thumbnail ready"
    );
    Ok(thumbnail)
}

/// Decode encoded image bytes and shrink them to fit `THUMBNAIL_SIZE`.
///
/// Images already small enough are not upscaled.
pub fn decode_thumbnail(bytes: &[u8]) -> Result<DecodedImage, MediaError> {
    let img = image::load_from_memory(bytes).map_err(|e| MediaError::Decode(e.to_string()))?;

    let img = if img.width() > THUMBNAIL_SIZE || img.height() > THUMBNAIL_SIZE {
        img.resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Lanczos3)
    } else {
        img
    };

    Ok(img.to_rgba8().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn encoded_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_large_image_is_shrunk_preserving_aspect() {
        let thumb = decode_thumbnail(&encoded_png(640, 320)).unwrap();

        assert_eq!(thumb.width, THUMBNAIL_SIZE);
        assert_eq!(thumb.height, THUMBNAIL_SIZE / 2);
        assert_eq!(thumb.pixels.len(), (thumb.width * thumb.height * 4) as usize);
    }

    #[test]
    fn test_small_image_is_not_upscaled() {
        let thumb = decode_thumbnail(&encoded_png(40, 30)).unwrap();

        assert_eq!((thumb.width, thumb.height), (40, 30));
        assert_eq!(&thumb.pixels[..4], &[200, 120, 40, 255]);
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let err = decode_thumbnail(b"definitely not an image").unwrap_err();
        assert!(matches!(err, MediaError::Decode(_)));
    }
}
