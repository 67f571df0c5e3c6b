use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// Errors that can occur while requesting an audit.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not read scenario file {}: {source}", path.display())]
    Scenario {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("audit request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("audit server returned {0}")]
    Status(reqwest::StatusCode),
}

/// Uploads scenarios to the `/audit` endpoint of an audit server.
#[derive(Debug)]
pub struct AuditFetcher {
    client: reqwest::Client,
    url: Url,
}

impl AuditFetcher {
    pub fn new(url: Url) -> Result<Self, FetchError> {
        // reqwest is built without a bundled crypto provider; an Err only
        // means a provider is already installed
        let _ = rustls::crypto::ring::default_provider().install_default();
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Upload `scenario` as the `file` field of a multipart form and return
    /// the raw response body.
    pub async fn fetch(&self, scenario: &Path) -> Result<String, FetchError> {
        let bytes = tokio::fs::read(scenario)
            .await
            .map_err(|source| FetchError::Scenario {
                path: scenario.to_path_buf(),
                source,
            })?;
        let file_name = scenario
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "scenario".to_string());
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));

        info!(
            "requesting audit at {} with scenario {} (takes a long time, ~3min)",
            self.url,
            scenario.display()
        );
        let resp = self
            .client
            .post(self.url.clone())
            .multipart(form)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status()));
        }

        let text = resp.text().await?;
        debug!("response received, {} bytes", text.len());
        Ok(text)
    }
}

/// The audit server prefixes its transcript with one status line.
pub fn remove_first_line(text: &str) -> &str {
    text.split_once('\n').map_or(text, |(_, rest)| rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_first_line() {
        assert_eq!(
            remove_first_line("Audit launched\nAudit terminated with success at x\nAudit Id : 1"),
            "Audit terminated with success at x\nAudit Id : 1"
        );
        assert_eq!(remove_first_line("only line"), "only line");
        assert_eq!(remove_first_line("first\n"), "");
    }

    #[tokio::test]
    async fn test_missing_scenario() {
        let fetcher = AuditFetcher::new(Url::parse("http://127.0.0.1:9/audit").unwrap()).unwrap();
        assert_eq!(fetcher.url().path(), "/audit");

        let err = fetcher
            .fetch(Path::new("does/not/exist.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Scenario { .. }));
        assert!(err.to_string().contains("does/not/exist.txt"));
    }
}
