//! Image asset loading from local paths or HTTP(S) URLs.
//!
//! Remote sources are fetched once with a bounded timeout. There is no retry:
//! a failed fetch surfaces as [`AssetError::Fetch`] and the caller decides
//! whether that is fatal (product, background) or recoverable (logos).

use image::{DynamicImage, RgbaImage};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("image not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("failed to decode {asset}: {reason}")]
    Decode { asset: String, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// True for `http://` and `https://` sources.
pub fn is_remote(source: &str) -> bool {
    let lower = source.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Logo references that stand for "no logo": empty, or stock placeholder URLs.
pub fn is_placeholder_logo(reference: &str) -> bool {
    let lower = reference.trim().to_ascii_lowercase();
    lower.is_empty() || lower.contains("example.com") || lower.contains("placeholder")
}

/// Loads images for the compositor.
///
/// The HTTP client is built on first remote fetch and reused afterwards, so
/// purely local jobs never construct one.
#[derive(Debug)]
pub struct AssetLoader {
    timeout: Duration,
    client: OnceLock<reqwest::blocking::Client>,
}

impl AssetLoader {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            client: OnceLock::new(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Load and decode an image, converted to RGBA8.
    pub fn load_image(&self, source: &str) -> Result<RgbaImage, AssetError> {
        Ok(self.load_dynamic(source)?.to_rgba8())
    }

    /// Load and decode an image in its native color type.
    pub fn load_dynamic(&self, source: &str) -> Result<DynamicImage, AssetError> {
        if !is_remote(source) {
            return load_local(Path::new(source));
        }
        let bytes = self.fetch(source)?;
        decode(&bytes, source)
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        let fetch_err = |reason: String| AssetError::Fetch {
            url: url.to_string(),
            reason,
        };

        let client = match self.client.get() {
            Some(client) => client,
            None => {
                let built = reqwest::blocking::Client::builder()
                    .timeout(self.timeout)
                    .build()
                    .map_err(|e| fetch_err(e.to_string()))?;
                self.client.get_or_init(|| built)
            }
        };

        tracing::debug!(url, timeout = ?self.timeout, "fetching remote image");
        let response = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| fetch_err(e.to_string()))?;
        let bytes = response.bytes().map_err(|e| fetch_err(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

/// Load and decode a file from disk. URLs are not fetched here.
pub fn load_local(path: &Path) -> Result<DynamicImage, AssetError> {
    let bytes = read_local(path)?;
    decode(&bytes, &path.display().to_string())
}

fn read_local(path: &Path) -> Result<Vec<u8>, AssetError> {
    if !path.is_file() {
        return Err(AssetError::NotFound(path.to_path_buf()));
    }
    Ok(std::fs::read(path)?)
}

fn decode(bytes: &[u8], asset: &str) -> Result<DynamicImage, AssetError> {
    image::load_from_memory(bytes).map_err(|e| AssetError::Decode {
        asset: asset.to_string(),
        reason: e.to_string(),
    })
}
