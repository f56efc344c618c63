//! Retrieval of the export document. A document is fetched exactly once per run and never
//! retried. Failures are split into "request failed" ([LoadError::Io], [LoadError::Request],
//! [LoadError::Status]) and "parse failed" ([LoadError::Parse]).

use std::{fmt::Display, future::Future, path::PathBuf};

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::export::RawExport;

/// File name the exporter writes by default.
pub const DEFAULT_EXPORT_FILE: &str = "activitywatch_data.json";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} returned HTTP status {status}")]
    Status { url: String, status: u16 },
    #[error("failed to parse export document: {0}")]
    Parse(#[from] serde_json::Error),
}

impl LoadError {
    pub fn is_parse(&self) -> bool {
        matches!(self, LoadError::Parse(_))
    }
}

/// Interface for anything the export document can be read from.
pub trait ExportSource {
    /// Returns the raw bytes of the document.
    fn fetch(&self) -> impl Future<Output = Result<Vec<u8>, LoadError>> + Send;
}

/// Location of the export. URLs with `http` or `https` schemes are downloaded, everything else is
/// treated as a path on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportLocation {
    File(PathBuf),
    Http(String),
}

impl ExportLocation {
    pub fn parse(value: &str) -> Self {
        let lowercase = value.to_ascii_lowercase();
        if lowercase.starts_with("http://") || lowercase.starts_with("https://") {
            ExportLocation::Http(value.to_string())
        } else {
            ExportLocation::File(PathBuf::from(value))
        }
    }
}

impl Default for ExportLocation {
    fn default() -> Self {
        ExportLocation::File(PathBuf::from(DEFAULT_EXPORT_FILE))
    }
}

impl Display for ExportLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportLocation::File(path) => write!(f, "{}", path.display()),
            ExportLocation::Http(url) => write!(f, "{url}"),
        }
    }
}

impl ExportSource for ExportLocation {
    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        match self {
            ExportLocation::File(path) => read_file(path.clone()).await,
            ExportLocation::Http(url) => download(url.clone()).await,
        }
    }
}

async fn read_file(path: PathBuf) -> Result<Vec<u8>, LoadError> {
    debug!("Reading {path:?}");
    tokio::fs::read(&path)
        .await
        .map_err(|source| LoadError::Io { path, source })
}

async fn download(url: String) -> Result<Vec<u8>, LoadError> {
    debug!("Requesting {url}");
    let response = match reqwest::get(&url).await {
        Ok(v) => v,
        Err(source) => return Err(LoadError::Request { url, source }),
    };

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url,
            status: status.as_u16(),
        });
    }

    match response.bytes().await {
        Ok(v) => Ok(v.to_vec()),
        Err(source) => Err(LoadError::Request { url, source }),
    }
}

/// Makes a single attempt at retrieving and parsing the export.
#[instrument(skip(source))]
pub async fn load_export(source: &impl ExportSource) -> Result<RawExport, LoadError> {
    let bytes = source.fetch().await?;
    debug!("Fetched {} bytes", bytes.len());
    let raw = RawExport::from_slice(&bytes)?;
    for bucket in &raw.buckets {
        debug!(
            "Bucket {} of type {} with {} events",
            bucket.id,
            bucket.kind.as_deref().unwrap_or("unknown"),
            bucket.events.len()
        );
    }
    info!(
        "Loaded export with {} buckets and {} events",
        raw.buckets.len(),
        raw.event_count()
    );
    Ok(raw)
}
