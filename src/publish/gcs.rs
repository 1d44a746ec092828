// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Google Cloud Storage media upload.

use std::time::Duration;

use reqwest::Client;
use url::Url;

use super::credentials::AccessToken;
use super::PublishError;

/// Host serving publicly readable objects.
pub const STORAGE_HOST: &str = "storage.googleapis.com";
const DEFAULT_UPLOAD_BASE_URL: &str = "https://storage.googleapis.com";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Public URL of `object` in `bucket`.
pub fn public_url(bucket: &str, object: &str) -> String {
    format!("https://{STORAGE_HOST}/{bucket}/{object}")
}

#[derive(Debug, Clone)]
pub struct GcsClient {
    upload_base_url: String,
    http: Client,
}

impl GcsClient {
    pub fn new() -> Result<Self, PublishError> {
        let http = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| PublishError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            upload_base_url: DEFAULT_UPLOAD_BASE_URL.to_string(),
            http,
        })
    }

    /// Point uploads at another endpoint (emulators, tests).
    pub fn with_upload_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.upload_base_url = base_url.into();
        self
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    /// `{base}/upload/storage/v1/b/{bucket}/o?uploadType=media&name={object}`
    pub fn upload_url(&self, bucket: &str, object: &str) -> Result<Url, PublishError> {
        let mut url = Url::parse(&self.upload_base_url)
            .map_err(|e| PublishError::Request(format!("invalid upload base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| PublishError::Request("upload base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(["upload", "storage", "v1", "b", bucket, "o"]);
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", object);
        Ok(url)
    }

    /// Upload `body` as a JSON object.
    pub async fn upload_json(
        &self,
        bucket: &str,
        object: &str,
        body: Vec<u8>,
        token: &AccessToken,
    ) -> Result<(), PublishError> {
        let url = self.upload_url(bucket, object)?;
        let response = self
            .http
            .post(url)
            .bearer_auth(token.secret())
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| PublishError::Request(format!("upload of {object} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Upload { status, body });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_follows_storage_pattern() {
        assert_eq!(
            public_url("my-bucket", "jwks.json"),
            "https://storage.googleapis.com/my-bucket/jwks.json"
        );
    }

    #[test]
    fn upload_url_encodes_object_name() {
        let client = GcsClient::new().unwrap();
        let url = client.upload_url("my-bucket", "keys/jwks.json").unwrap();
        assert_eq!(
            url.as_str(),
            "https://storage.googleapis.com/upload/storage/v1/b/my-bucket/o?uploadType=media&name=keys%2Fjwks.json"
        );
    }

    #[test]
    fn upload_url_respects_custom_base() {
        let client = GcsClient::new()
            .unwrap()
            .with_upload_base_url("http://127.0.0.1:4443/");
        let url = client.upload_url("b", "jwks.json").unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:4443/upload/storage/v1/b/b/o?uploadType=media&name=jwks.json"
        );
    }
}
