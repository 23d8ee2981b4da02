use anyhow::{Context, Result, anyhow};
use image::RgbImage;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Default timeout for HTTP image fetches
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Where an image comes from: a local file or an HTTP(S) URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Path(PathBuf),
    Url(String),
}

impl ImageSource {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            ImageSource::Url(trimmed.to_string())
        } else {
            ImageSource::Path(PathBuf::from(trimmed))
        }
    }

    /// Identifier reported next to the detection result
    pub fn identifier(&self) -> String {
        match self {
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Url(url) => url.clone(),
        }
    }

    /// Short name used for debug dump directories
    pub fn label(&self) -> String {
        let name = match self {
            ImageSource::Path(path) => path.file_name().map(|n| n.to_string_lossy().to_string()),
            ImageSource::Url(url) => url
                .split(['?', '#'])
                .next()
                .and_then(|u| u.trim_end_matches('/').rsplit('/').next())
                .map(str::to_string),
        };
        name.filter(|n| !n.is_empty()).unwrap_or_else(|| self.identifier())
    }
}

/// Parse a JSON array of image paths or URLs.
///
/// Blank input yields an empty list; any other payload that is not an
/// array of strings is an error.
pub fn parse_source_list(raw: &str) -> Result<Vec<ImageSource>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: serde_json::Value = serde_json::from_str(raw).context("Error parsing JSON")?;
    let items = value
        .as_array()
        .ok_or_else(|| anyhow!("Expected JSON array of image URLs"))?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(ImageSource::parse)
                .ok_or_else(|| anyhow!("Expected string entries, got {}", item))
        })
        .collect()
}

impl From<&str> for ImageSource {
    fn from(value: &str) -> Self {
        ImageSource::parse(value)
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier())
    }
}

/// A decoded, non-empty RGB image together with its origin
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub source: ImageSource,
    pub image: RgbImage,
}

impl LoadedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Decode an encoded image (JPEG, PNG, ...) into RGB, rejecting empty images
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| anyhow!("Failed to decode image: {}", e))?;
    let rgb = decoded.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(anyhow!("Decoded image has zero area"));
    }
    Ok(rgb)
}

/// Fetches and decodes images from files or HTTP
#[derive(Debug, Clone)]
pub struct ImageLoader {
    client: reqwest::Client,
}

impl ImageLoader {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    pub async fn load(&self, source: &ImageSource) -> Result<LoadedImage> {
        let bytes = match source {
            ImageSource::Path(path) => tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?,
            ImageSource::Url(url) => self.fetch(url).await?,
        };
        debug!(source = %source, bytes = bytes.len(), "Image bytes loaded");

        let image = decode_image(&bytes).with_context(|| format!("Invalid image at {}", source))?;
        Ok(LoadedImage {
            source: source.clone(),
            image,
        })
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to download {}", url))?;

        if !resp.status().is_success() {
            return Err(anyhow!("HTTP error {} for {}", resp.status(), url));
        }

        let bytes = resp
            .bytes()
            .await
            .with_context(|| format!("Failed to read body of {}", url))?;
        Ok(bytes.to_vec())
    }
}
