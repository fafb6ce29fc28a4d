//! Downloads the OpenAPI spec and checks that it is JSON.
//!
//! The body is streamed to `<output_dir>/<last URL segment>` and synced to
//! disk before it is read back for validation. A download that fails midway
//! or a document that is not JSON never stays on disk.

use std::path::{Path, PathBuf};

use reqwest::{Client, Response, Url};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, WorkflowError};

/// File name used when the URL has no usable last path segment.
pub const FALLBACK_SPEC_FILE_NAME: &str = "openapi.json";

/// Derives the spec file name from the URL's last non-empty path segment.
///
/// Falls back to [`FALLBACK_SPEC_FILE_NAME`] for URLs such as
/// `http://host/` so the output directory itself is never the target.
///
/// ## Examples
///
/// ```
/// use oapi_fetch_lib::fetch::spec_file_name;
/// use reqwest::Url;
///
/// let url = Url::parse("http://localhost:8000/openapi.json").unwrap();
/// assert_eq!(spec_file_name(&url), "openapi.json");
///
/// let url = Url::parse("http://localhost:8000/").unwrap();
/// assert_eq!(spec_file_name(&url), "openapi.json");
/// ```
pub fn spec_file_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .filter(|s| *s != "." && *s != "..")
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_SPEC_FILE_NAME.to_string())
}

/// Parses a user-supplied spec URL.
///
/// ## Errors
///
/// Returns [`WorkflowError::InvalidUrl`] when `raw` is not an absolute URL.
pub fn parse_spec_url(raw: &str) -> Result<Url> {
    Url::parse(raw.trim()).map_err(|e| WorkflowError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Downloads `url` into `output_dir` and validates it as JSON.
///
/// Returns the path of the saved spec file.
///
/// ## Errors
///
/// - [`WorkflowError::InvalidUrl`] for an unparsable URL
/// - [`WorkflowError::Network`] for connection failures and non-success statuses
/// - [`WorkflowError::Io`] when the directory or file cannot be written
/// - [`WorkflowError::InvalidJsonSpec`] when the body is not JSON (the file is removed)
#[instrument(skip(client, output_dir), fields(output_dir = %output_dir.display()))]
pub async fn download_spec(client: &Client, url: &str, output_dir: &Path) -> Result<PathBuf> {
    let parsed = parse_spec_url(url)?;
    let network = |source: reqwest::Error| WorkflowError::Network {
        url: url.to_string(),
        source,
    };

    let response = client
        .get(parsed.clone())
        .send()
        .await
        .and_then(Response::error_for_status)
        .map_err(network)?;
    debug!(status = %response.status(), "Received HTTP response");

    fs::create_dir_all(output_dir)
        .await
        .map_err(|e| WorkflowError::io(output_dir, e))?;

    let path = output_dir.join(spec_file_name(&parsed));
    let bytes = match stream_to_file(response, &path, url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            remove_quietly(&path).await;
            return Err(e);
        }
    };
    info!(path = %path.display(), bytes, "Spec downloaded");

    validate_json_file(&path, url).await?;
    Ok(path)
}

/// Writes the response body to `path` chunk by chunk, then flushes and syncs.
async fn stream_to_file(mut response: Response, path: &Path, url: &str) -> Result<u64> {
    let mut file = File::create(path)
        .await
        .map_err(|e| WorkflowError::io(path, e))?;

    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await.map_err(|source| WorkflowError::Network {
        url: url.to_string(),
        source,
    })? {
        file.write_all(&chunk)
            .await
            .map_err(|e| WorkflowError::io(path, e))?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(|e| WorkflowError::io(path, e))?;
    file.sync_all().await.map_err(|e| WorkflowError::io(path, e))?;
    Ok(written)
}

/// Reads `path` back and parses it as JSON, removing it when it does not parse.
///
/// ## Errors
///
/// Returns [`WorkflowError::InvalidJsonSpec`] for non-JSON content and
/// [`WorkflowError::Io`] when the file cannot be read.
pub async fn validate_json_file(path: &Path, url: &str) -> Result<()> {
    let contents = fs::read(path)
        .await
        .map_err(|e| WorkflowError::io(path, e))?;

    match serde_json::from_slice::<serde_json::Value>(&contents) {
        Ok(_) => Ok(()),
        Err(source) => {
            warn!(path = %path.display(), error = %source, "Downloaded spec is not JSON");
            remove_quietly(path).await;
            Err(WorkflowError::InvalidJsonSpec {
                url: url.to_string(),
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

async fn remove_quietly(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "Removed spec file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Could not remove spec file"),
    }
}
