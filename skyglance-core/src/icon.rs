use image::{DynamicImage, ImageFormat};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{
    Config,
    cache::IconCache,
    config::DEFAULT_ICON_BASE_URL,
    error::{FetchError, truncate_body},
};

/// Where a resolved icon came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSource {
    Cache,
    Network,
}

impl std::fmt::Display for IconSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            IconSource::Cache => "cache",
            IconSource::Network => "network",
        })
    }
}

/// A decoded condition icon together with its encoded bytes.
#[derive(Debug, Clone)]
pub struct IconImage {
    id: String,
    source: IconSource,
    format: ImageFormat,
    encoded: Vec<u8>,
    image: DynamicImage,
}

impl IconImage {
    fn decode(id: &str, encoded: Vec<u8>, source: IconSource) -> Result<Self, FetchError> {
        let format =
            image::guess_format(&encoded).map_err(|e| FetchError::decode("icon image", e))?;
        let image = image::load_from_memory_with_format(&encoded, format)
            .map_err(|e| FetchError::decode("icon image", e))?;

        Ok(Self {
            id: id.to_string(),
            source,
            format,
            encoded,
            image,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> IconSource {
        self.source
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }
}

/// Two-tier icon lookup: the local file cache first, the icon host second.
#[derive(Debug, Clone)]
pub struct IconResolver {
    http: Client,
    base_url: String,
    cache: IconCache,
    write_back: bool,
}

impl IconResolver {
    pub fn new(cache: IconCache) -> Self {
        Self::with_base_url(cache, DEFAULT_ICON_BASE_URL)
    }

    pub fn with_base_url(cache: IconCache, base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
            write_back: true,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let cache = IconCache::from_config(config)?;
        Ok(Self::with_base_url(cache, &config.icon_base_url).write_back(config.write_icon_cache))
    }

    /// Whether icons fetched from the network are saved into the cache.
    pub fn write_back(mut self, enabled: bool) -> Self {
        self.write_back = enabled;
        self
    }

    pub fn icon_url(&self, icon: &str) -> String {
        format!("{}/img/w/{icon}.png", self.base_url)
    }

    pub async fn resolve(&self, icon: &str) -> Result<IconImage, FetchError> {
        validate_icon_id(icon)?;

        if let Some(bytes) = self.cache.read(icon).await {
            match IconImage::decode(icon, bytes, IconSource::Cache) {
                Ok(image) => {
                    debug!(icon, "loaded icon from cache");
                    return Ok(image);
                }
                Err(e) => warn!(icon, error = %e, "ignoring undecodable cached icon"),
            }
        }

        let image = self.fetch_from_network(icon).await?;

        if self.write_back {
            if let Err(e) = self.cache.write(icon, image.encoded()).await {
                warn!(icon, error = %e, "could not cache downloaded icon");
            }
        }

        Ok(image)
    }

    async fn fetch_from_network(&self, icon: &str) -> Result<IconImage, FetchError> {
        let url = self.icon_url(icon);

        let res = self.http.get(&url).send().await?;
        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                url,
                status,
                body: truncate_body(&body),
            });
        }

        let bytes = res.bytes().await?;
        let image = IconImage::decode(icon, bytes.to_vec(), IconSource::Network)?;
        info!(icon, %url, "loaded icon from network");

        Ok(image)
    }
}

/// Icon identifiers become file names, so only plain tokens like `01d` pass.
fn validate_icon_id(icon: &str) -> Result<(), FetchError> {
    let valid = !icon.is_empty()
        && icon
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(FetchError::InvalidIcon(icon.to_string()))
    }
}
