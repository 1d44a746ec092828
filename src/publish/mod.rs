// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # JWKS Publishing
//!
//! Writes the serialized key set to a local file and, when `BUCKET_NAME` is
//! configured, uploads it to Google Cloud Storage where it is publicly
//! readable at `https://storage.googleapis.com/<bucket>/<object>`.
//!
//! Publishing never aborts the run. The local write and the upload are
//! independent, failures are logged and reported as absent outputs in
//! [`PublishReport`].

pub mod credentials;
pub mod gcs;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

pub use credentials::{AccessToken, ApplicationDefault, CredentialChain, CredentialProvider};
pub use gcs::{public_url, GcsClient};

use crate::config::{self, Config};
use crate::jwks::JwkSet;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("failed to serialize JWKS: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", path.display())]
    LocalWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no credential provider configured")]
    NoCredentials,

    #[error("credentials from {provider} unavailable: {reason}")]
    Credentials {
        provider: &'static str,
        reason: String,
    },

    #[error("credential file {}: {reason}", path.display())]
    CredentialFile { path: PathBuf, reason: String },

    #[error("failed to sign token assertion: {0}")]
    Assertion(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("upload rejected with HTTP {status}: {body}")]
    Upload { status: u16, body: String },
}

/// Where the key set ended up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub local_path: Option<PathBuf>,
    pub public_url: Option<String>,
}

/// Write `json` to `dir/file_name`, creating `dir` if needed.
pub fn write_local(dir: &Path, file_name: &str, json: &str) -> Result<PathBuf, PublishError> {
    let path = dir.join(file_name);
    fs::create_dir_all(dir)
        .and_then(|()| fs::write(&path, json))
        .map_err(|source| PublishError::LocalWrite {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}

pub struct JwksPublisher {
    output_dir: PathBuf,
    object_name: String,
    bucket: Option<String>,
    credentials: CredentialChain,
    gcs: GcsClient,
}

impl JwksPublisher {
    pub fn from_config(config: &Config) -> Result<Self, PublishError> {
        Ok(Self {
            output_dir: PathBuf::from(
                config.get_or(config::JWKS_OUTPUT_DIR, config::DEFAULT_JWKS_OUTPUT_DIR),
            ),
            object_name: config
                .get_or(config::JWKS_FILE_NAME, config::DEFAULT_JWKS_FILE_NAME)
                .to_string(),
            bucket: config.get(config::BUCKET_NAME).map(str::to_string),
            credentials: CredentialChain::from_config(config),
            gcs: GcsClient::new()?,
        })
    }

    pub fn with_gcs(mut self, gcs: GcsClient) -> Self {
        self.gcs = gcs;
        self
    }

    pub fn with_credentials(mut self, credentials: CredentialChain) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn local_path(&self) -> PathBuf {
        self.output_dir.join(&self.object_name)
    }

    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// Persist locally, then upload if a bucket is configured.
    pub async fn publish(&self, jwks: &JwkSet) -> PublishReport {
        let mut report = PublishReport::default();

        let json = match jwks.to_pretty_json() {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Failed to serialize JWKS");
                return report;
            }
        };

        match write_local(&self.output_dir, &self.object_name, &json) {
            Ok(path) => {
                info!(path = %path.display(), "JWKS saved locally");
                report.local_path = Some(path);
            }
            Err(e) => error!(error = %e, "Error saving JWKS locally"),
        }

        let Some(bucket) = self.bucket.as_deref() else {
            info!("Skipping JWKS upload: BUCKET_NAME not configured");
            return report;
        };

        match self.upload(bucket, json.into_bytes()).await {
            Ok(url) => report.public_url = Some(url),
            Err(e) => error!(bucket = %bucket, error = %e, "JWKS upload failed"),
        }
        report
    }

    /// Upload with each credential provider in turn until one succeeds.
    pub async fn upload(&self, bucket: &str, body: Vec<u8>) -> Result<String, PublishError> {
        let mut last_error = None;

        for provider in self.credentials.providers() {
            let token = match provider.access_token(self.gcs.http()).await {
                Ok(token) => token,
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "Credential provider failed");
                    last_error = Some(e);
                    continue;
                }
            };

            match self
                .gcs
                .upload_json(bucket, &self.object_name, body.clone(), &token)
                .await
            {
                Ok(()) => {
                    let url = public_url(bucket, &self.object_name);
                    info!(provider = provider.name(), url = %url, "JWKS uploaded");
                    return Ok(url);
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "Upload failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(PublishError::NoCredentials))
    }
}
