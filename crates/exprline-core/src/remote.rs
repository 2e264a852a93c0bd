//! Injected symbol fetching (cargo feature `remote`).
//!
//! The core never fetches on its own; the host constructs a fetcher and
//! decides when to refresh the symbol cache with its results.

use serde::Deserialize;

use crate::complete::RemoteConfig;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("symbol request failed: {0}")]
    Transport(String),
    #[error("symbol response malformed: {0}")]
    Malformed(String),
    #[error("symbol endpoint returned status {0}")]
    Status(u16),
}

/// Source of the symbol-name list used to seed completion.
pub trait SymbolFetcher {
    fn fetch_symbols(&self) -> Result<Vec<String>, FetchError>;
}

#[derive(Deserialize)]
struct LabelValuesResponse {
    status: String,
    #[serde(default)]
    data: Vec<String>,
}

/// Blocking fetcher against the metrics backend's label-values endpoint.
pub struct HttpSymbolFetcher {
    endpoint: String,
}

impl HttpSymbolFetcher {
    pub fn new(remote: &RemoteConfig) -> Self {
        let base = remote.url.trim_end_matches('/');
        Self {
            endpoint: format!("{base}/api/v1/label/__name__/values"),
        }
    }
}

impl SymbolFetcher for HttpSymbolFetcher {
    fn fetch_symbols(&self) -> Result<Vec<String>, FetchError> {
        let mut response = ureq::get(&self.endpoint)
            .call()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        if response.status().as_u16() != 200 {
            return Err(FetchError::Status(response.status().as_u16()));
        }
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let body: LabelValuesResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Malformed(e.to_string()))?;
        if body.status != "success" {
            return Err(FetchError::Malformed(format!(
                "unexpected status field `{}`",
                body.status
            )));
        }
        Ok(body.data)
    }
}
