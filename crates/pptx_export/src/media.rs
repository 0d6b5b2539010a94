//! Render-time image fetching
//!
//! Image shapes carry URLs, not bytes, so export fetches them fresh. All
//! fetches for a slide run concurrently. A fetch failure drops that one
//! image shape from the output; export never fails because of a broken
//! image URL.

use std::collections::HashMap;

use deck_model::{Shape, Slide};
use tracing::warn;

/// Bytes-by-URL fetcher seam, so tests export without a network.
#[trait_variant::make(Send)]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, String>;
}

/// Fetcher backed by a real HTTP client.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("status {}", response.status()));
        }
        let bytes = response.bytes().await.map_err(|e| e.to_string())?;
        Ok(bytes.to_vec())
    }
}

/// In-memory fetcher for tests: serves only the URLs it was given.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    images: HashMap<String, Vec<u8>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.images.insert(url.to_string(), bytes);
        self
    }
}

impl ImageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, String> {
        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| "not found".to_string())
    }
}

/// One fetched image, ready to embed.
#[derive(Debug, Clone)]
pub struct MediaPart {
    /// Id of the image shape this part belongs to
    pub shape_id: String,
    /// File name under `ppt/media/`
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// File extension inferred from the URL path; jpeg for `.jpg`/`.jpeg`,
/// png for everything else.
pub fn media_extension(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let lower = path.to_ascii_lowercase();
    if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "jpeg"
    } else {
        "png"
    }
}

/// Fetch every image shape on the slide concurrently. Failures are logged
/// and omitted from the result.
pub async fn fetch_slide_media<F: ImageFetcher>(slide: &Slide, fetcher: &F) -> Vec<MediaPart> {
    let images: Vec<(&str, &str)> = slide
        .shapes
        .iter()
        .filter_map(|shape| match shape {
            Shape::Image(image) => Some((image.base.id.as_str(), image.url.as_str())),
            _ => None,
        })
        .collect();

    let fetches = images
        .iter()
        .map(|(_, url)| fetcher.fetch(url));
    let results = futures::future::join_all(fetches).await;

    let mut parts = Vec::new();
    for ((shape_id, url), result) in images.iter().zip(results) {
        match result {
            Ok(bytes) => {
                let file_name = format!("image{}.{}", parts.len() + 1, media_extension(url));
                parts.push(MediaPart {
                    shape_id: (*shape_id).to_string(),
                    file_name,
                    bytes,
                });
            }
            Err(reason) => {
                warn!(shape_id, url, %reason, "image fetch failed; dropping shape from export");
            }
        }
    }
    parts
}
