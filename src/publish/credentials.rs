// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Object-store credentials.
//!
//! Credentials are modelled as an ordered chain of providers. The publisher
//! walks the chain once, moving to the next provider when obtaining a token
//! or uploading with it fails:
//!
//! 1. Application Default Credentials: `GOOGLE_APPLICATION_CREDENTIALS`, the
//!    gcloud well-known file, then the GCE metadata server.
//! 2. An explicit service account key (`SERVICE_ACCOUNT_KEY_FILE`).

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::PublishError;
use crate::config::{self, Config};

pub const STORAGE_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_write";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_METADATA_HOST: &str = "metadata.google.internal";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// OAuth2 bearer token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Where Application Default Credentials are looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationDefault {
    /// `GOOGLE_APPLICATION_CREDENTIALS`
    pub credentials_file: Option<PathBuf>,
    /// `$HOME/.config/gcloud/application_default_credentials.json`
    pub well_known_file: Option<PathBuf>,
    /// `GCE_METADATA_HOST`, host[:port]
    pub metadata_host: String,
}

impl ApplicationDefault {
    pub fn from_config(config: &Config) -> Self {
        Self {
            credentials_file: config.get_path(config::GOOGLE_APPLICATION_CREDENTIALS),
            well_known_file: config.get_path(config::HOME).map(|home| {
                home.join(".config")
                    .join("gcloud")
                    .join("application_default_credentials.json")
            }),
            metadata_host: config
                .get_or(config::GCE_METADATA_HOST, DEFAULT_METADATA_HOST)
                .to_string(),
        }
    }

    async fn access_token(&self, http: &Client) -> Result<AccessToken, PublishError> {
        if let Some(path) = &self.credentials_file {
            debug!(path = %path.display(), "Using GOOGLE_APPLICATION_CREDENTIALS");
            return CredentialFile::load(path)?.access_token(http).await;
        }
        if let Some(path) = self.well_known_file.as_deref().filter(|p| p.is_file()) {
            debug!(path = %path.display(), "Using gcloud application default credentials");
            return CredentialFile::load(path)?.access_token(http).await;
        }
        debug!(host = %self.metadata_host, "Using metadata server credentials");
        metadata_token(http, &self.metadata_host).await
    }
}

/// One way of obtaining an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialProvider {
    ApplicationDefault(ApplicationDefault),
    ServiceAccountKey(PathBuf),
}

impl CredentialProvider {
    pub fn name(&self) -> &'static str {
        match self {
            CredentialProvider::ApplicationDefault(_) => "application_default",
            CredentialProvider::ServiceAccountKey(_) => "service_account",
        }
    }

    pub async fn access_token(&self, http: &Client) -> Result<AccessToken, PublishError> {
        let result = match self {
            CredentialProvider::ApplicationDefault(adc) => adc.access_token(http).await,
            CredentialProvider::ServiceAccountKey(path) => match CredentialFile::load(path) {
                Ok(file) => file.access_token(http).await,
                Err(e) => Err(e),
            },
        };
        result.map_err(|e| PublishError::Credentials {
            provider: self.name(),
            reason: e.to_string(),
        })
    }
}

/// Ordered credential providers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialChain {
    providers: Vec<CredentialProvider>,
}

impl CredentialChain {
    pub fn new(providers: Vec<CredentialProvider>) -> Self {
        Self { providers }
    }

    /// ADC first, then `SERVICE_ACCOUNT_KEY_FILE` when configured.
    pub fn from_config(config: &Config) -> Self {
        let mut providers = vec![CredentialProvider::ApplicationDefault(
            ApplicationDefault::from_config(config),
        )];
        if let Some(path) = config.get_path(config::SERVICE_ACCOUNT_KEY_FILE) {
            providers.push(CredentialProvider::ServiceAccountKey(path));
        }
        Self { providers }
    }

    pub fn providers(&self) -> &[CredentialProvider] {
        &self.providers
    }
}

/// JSON credential file as written by gcloud or the IAM console.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum CredentialFile {
    ServiceAccount(ServiceAccountFile),
    AuthorizedUser(AuthorizedUser),
}

#[derive(Debug, Clone, Deserialize)]
struct ServiceAccountFile {
    client_email: String,
    private_key: String,
    #[serde(default)]
    private_key_id: Option<String>,
    #[serde(default)]
    token_uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct AuthorizedUser {
    client_id: String,
    client_secret: String,
    refresh_token: String,
    #[serde(default)]
    token_uri: Option<String>,
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl CredentialFile {
    fn load(path: &Path) -> Result<Self, PublishError> {
        let raw = fs::read_to_string(path).map_err(|e| PublishError::CredentialFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| PublishError::CredentialFile {
            path: path.to_path_buf(),
            reason: format!("unsupported credential file: {e}"),
        })
    }

    async fn access_token(&self, http: &Client) -> Result<AccessToken, PublishError> {
        match self {
            CredentialFile::ServiceAccount(key) => {
                let token_uri = key.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI);
                let assertion = key.assertion(token_uri)?;
                let mut form = HashMap::new();
                form.insert("grant_type", JWT_BEARER_GRANT);
                form.insert("assertion", assertion.as_str());
                exchange(http, token_uri, &form).await
            }
            CredentialFile::AuthorizedUser(user) => {
                let token_uri = user.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI);
                let mut form = HashMap::new();
                form.insert("grant_type", "refresh_token");
                form.insert("client_id", user.client_id.as_str());
                form.insert("client_secret", user.client_secret.as_str());
                form.insert("refresh_token", user.refresh_token.as_str());
                exchange(http, token_uri, &form).await
            }
        }
    }
}

impl ServiceAccountFile {
    /// Self-signed RS256 assertion for the JWT-bearer grant.
    fn assertion(&self, token_uri: &str) -> Result<String, PublishError> {
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| PublishError::Assertion(format!("invalid private_key: {e}")))?;

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        let iat = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: STORAGE_SCOPE,
            aud: token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        encode(&header, &claims, &key).map_err(|e| PublishError::Assertion(e.to_string()))
    }
}

async fn exchange(
    http: &Client,
    token_uri: &str,
    form: &HashMap<&str, &str>,
) -> Result<AccessToken, PublishError> {
    let response = http
        .post(token_uri)
        .form(form)
        .send()
        .await
        .map_err(|e| PublishError::Request(format!("token request failed: {e}")))?;
    parse_token_response(response).await
}

async fn metadata_token(http: &Client, host: &str) -> Result<AccessToken, PublishError> {
    let url = format!("http://{host}/computeMetadata/v1/instance/service-accounts/default/token");
    let response = http
        .get(url)
        .header("Metadata-Flavor", "Google")
        .send()
        .await
        .map_err(|e| PublishError::Request(format!("metadata server unreachable: {e}")))?;
    parse_token_response(response).await
}

async fn parse_token_response(response: reqwest::Response) -> Result<AccessToken, PublishError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(PublishError::Request(format!(
            "token request returned {status}: {body}"
        )));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| PublishError::Request(format!("invalid token response: {e}")))?;

    if token.access_token.trim().is_empty() {
        return Err(PublishError::Request(
            "token response did not include access_token".to_string(),
        ));
    }
    Ok(AccessToken::new(token.access_token))
}
