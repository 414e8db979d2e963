//! Spec store - holds the active API specification.
//!
//! The active spec is kept behind an `Arc` that is swapped wholesale on a
//! successful load. Readers clone the `Arc` and never observe a partially
//! replaced document; a failed load leaves the previous spec in place.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use url::Url;

use super::error::SpecError;
use super::model::{ApiSpecification, DocumentError, parse_document};

/// Where a spec document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
    Url(Url),
    File(PathBuf),
}

impl SpecSource {
    /// Classify a source string as an http(s) URL, a `file://` URL or a path.
    pub fn parse(source: &str) -> Result<Self, SpecError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(SpecError::invalid_source(source, "empty source"));
        }

        if source.starts_with("http://") || source.starts_with("https://") {
            let url =
                Url::parse(source).map_err(|e| SpecError::invalid_source(source, e.to_string()))?;
            Ok(Self::Url(url))
        } else if source.starts_with("file://") {
            let url =
                Url::parse(source).map_err(|e| SpecError::invalid_source(source, e.to_string()))?;
            let path = url
                .to_file_path()
                .map_err(|()| SpecError::invalid_source(source, "cannot convert to a path"))?;
            Ok(Self::File(path))
        } else {
            Ok(Self::File(PathBuf::from(source)))
        }
    }
}

/// A spec snapshot together with where and when it was loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedSpec {
    pub spec: ApiSpecification,

    /// Source string of the successful load, `None` for the empty default.
    pub source: Option<String>,

    pub loaded_at: Option<DateTime<Utc>>,
}

impl LoadedSpec {
    /// Whether this is the empty placeholder rather than a loaded document.
    pub fn is_empty_default(&self) -> bool {
        self.source.is_none()
    }
}

/// Holds the active API specification.
pub struct SpecStore {
    active: RwLock<Arc<LoadedSpec>>,
    client: reqwest::Client,
}

impl SpecStore {
    /// Create a store holding the empty spec.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            active: RwLock::new(Arc::new(LoadedSpec::default())),
            client,
        }
    }

    /// The active spec snapshot.
    pub fn current(&self) -> Arc<LoadedSpec> {
        self.active.read().clone()
    }

    /// Load `source` and make it the active spec. On failure the previously
    /// active spec stays in place.
    #[instrument(skip(self))]
    pub async fn load(&self, source: &str) -> Result<Arc<LoadedSpec>, SpecError> {
        let spec = self.fetch(source).await?;

        let loaded = Arc::new(LoadedSpec {
            spec,
            source: Some(source.trim().to_string()),
            loaded_at: Some(Utc::now()),
        });
        *self.active.write() = loaded.clone();

        info!(
            "Loaded API spec '{}' ({} paths) from {}",
            loaded.spec.info.title.as_deref().unwrap_or("untitled"),
            loaded.spec.path_count(),
            source
        );
        Ok(loaded)
    }

    /// Startup policy: try `primary`, then `fallback`; if both fail keep the
    /// empty spec and run degraded. Returns the source that loaded.
    pub async fn load_with_fallback(
        &self,
        primary: Option<&str>,
        fallback: Option<&str>,
    ) -> Option<String> {
        for source in [primary, fallback].into_iter().flatten() {
            match self.load(source).await {
                Ok(_) => return Some(source.to_string()),
                Err(e) => warn!("Could not load API spec: {}", e),
            }
        }

        error!("No API spec could be loaded; continuing with an empty specification");
        None
    }

    /// Read and parse a document without touching the active spec.
    pub async fn fetch(&self, source: &str) -> Result<ApiSpecification, SpecError> {
        let content = match SpecSource::parse(source)? {
            SpecSource::Url(url) => self.fetch_url(url).await?,
            SpecSource::File(path) => {
                info!("Reading API spec from {}", path.display());
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| SpecError::ReadFile {
                        path: path.display().to_string(),
                        source: e,
                    })?
            }
        };

        parse_document(&content).map_err(|e| match e {
            DocumentError::Yaml(source_err) => SpecError::Parse {
                location: source.to_string(),
                source: source_err,
            },
            other => SpecError::Shape {
                location: source.to_string(),
                message: other.to_string(),
            },
        })
    }

    async fn fetch_url(&self, url: Url) -> Result<String, SpecError> {
        info!("Fetching API spec from {}", url);
        let location = url.to_string();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SpecError::fetch(&location, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpecError::Status {
                url: location,
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| SpecError::fetch(&location, e.to_string()))
    }
}
