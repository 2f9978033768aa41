//! Cloud drive client for the synced CSV file

use crate::domain::tabular::csv_header;
use crate::error::{Result, WorklogError};
use crate::infrastructure::token::AccessToken;
use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use std::time::Duration;
use tracing::{debug, info};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CSV_CONTENT_TYPE: &str = "text/csv";

/// Whether [`DriveClient::ensure_file`] found the file or made it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFile {
    Existing,
    Created,
}

/// Blocking client for one drive folder
pub struct DriveClient {
    http: Client,
    base_url: Url,
}

impl DriveClient {
    /// Create a client rooted at `base_url`, the folder whose children hold
    /// the synced file
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            WorklogError::Config(format!("Invalid cloud.base_url '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(WorklogError::Config(format!(
                "Invalid cloud.base_url '{}'",
                base_url
            )));
        }

        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(DriveClient { http, base_url })
    }

    /// `{base}/children/{name}`, plus `/content` for the file body
    fn item_url(&self, file_name: &str, content: bool) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("children").push(file_name);
            if content {
                segments.push("content");
            }
        }
        url
    }

    /// Look the file up; create it with just the header row on a 404
    pub fn ensure_file(&self, token: &AccessToken, file_name: &str) -> Result<RemoteFile> {
        let url = self.item_url(file_name, false);
        debug!(%url, "Checking remote file");

        let response = self.http.get(url).bearer_auth(token.secret()).send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(RemoteFile::Existing);
        }
        if status != StatusCode::NOT_FOUND {
            return Err(failure("Lookup failed", response));
        }

        info!(file_name, "Remote file missing; creating it");
        self.put_content(token, file_name, csv_header(), "Create failed")?;
        Ok(RemoteFile::Created)
    }

    /// Replace the file's content with `csv`
    pub fn upload(&self, token: &AccessToken, file_name: &str, csv: String) -> Result<()> {
        self.put_content(token, file_name, csv, "Upload failed")
    }

    fn put_content(
        &self,
        token: &AccessToken,
        file_name: &str,
        body: String,
        action: &str,
    ) -> Result<()> {
        let url = self.item_url(file_name, true);
        debug!(%url, bytes = body.len(), "Uploading file content");

        let response = self
            .http
            .put(url)
            .bearer_auth(token.secret())
            .header(CONTENT_TYPE, CSV_CONTENT_TYPE)
            .body(body)
            .send()?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(failure(action, response))
        }
    }
}

/// Cloud error carrying the status and response body
fn failure(action: &str, response: Response) -> WorklogError {
    let status = response.status();
    let body = response.text().unwrap_or_default();
    let detail = if body.trim().is_empty() {
        status.to_string()
    } else {
        format!("{} {}", status, body.trim())
    };
    WorklogError::Cloud(format!("{}: {}", action, detail))
}
