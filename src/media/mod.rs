/// Remote image loading module
///
/// This module handles:
/// - Downloading image bytes from the CDN URLs the search returns
/// - Decoding and resizing gallery thumbnails (thumbnail.rs)
/// - Decoding full-size renditions for the overlay (preview.rs)
///
/// Decoding is CPU-bound, so it runs on tokio's blocking pool.

pub mod preview;
pub mod thumbnail;

use std::fmt;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("download failed: {0}")]
    Network(String),

    #[error("download failed with status code {0}")]
    Status(u16),

    #[error("could not decode image: {0}")]
    Decode(String),

    #[error("decode task failed: {0}")]
    Join(String),
}

/// Decoded RGBA8 pixels, ready to become an `iced` image handle
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

impl From<image::RgbaImage> for DecodedImage {
    fn from(rgba: image::RgbaImage) -> Self {
        Self {
            width: rgba.width(),
            height: rgba.height(),
            pixels: rgba.into_raw(),
        }
    }
}

/// Download the body at `url`
async fn fetch_bytes(http: &reqwest::Client, url: &str) -> Result<Vec<u8>, MediaError> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| MediaError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(MediaError::Status(status.as_u16()));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| MediaError::Network(e.to_string()))?;
    debug!(url, bytes = bytes.len(), "downloaded image");
    Ok(bytes.to_vec())
}

/// Run a decoder on the blocking pool
async fn decode_blocking<F>(decode: F) -> Result<DecodedImage, MediaError>
where
    F: FnOnce() -> Result<DecodedImage, MediaError> + Send + 'static,
{
    tokio::task::spawn_blocking(decode)
        .await
        .map_err(|e| MediaError::Join(e.to_string()))?
}
