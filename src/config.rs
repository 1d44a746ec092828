// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is a flat string map loaded once per process from a
//! `.env`-style file and overlaid with the process environment (environment
//! wins). The resulting [`Config`] is passed explicitly to every component;
//! nothing below `main` reads the environment on its own.
//!
//! ## Keys
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `PRIVATE_KEY_FILE` | PEM-encoded RSA private key | Required |
//! | `KEY_ID` | `kid` placed in the token header and JWKS entry | Required |
//! | `PUBLIC_KEY_FILE` | PEM-encoded RSA public key | Derived from the private key |
//! | `ALGORITHM` | Signing algorithm (`RS256`, `RS384`, `RS512`, `PS256`, `PS384`, `PS512`) | `RS256` |
//! | `ISS` / `SUB` / `AUD` | Registered token claims | Omitted |
//! | `EXPIRY_SECONDS` | Token lifetime in seconds | `300` |
//! | `CUSTOM_CLAIM_<name>` | Extra claim `<name>` (lower-cased) | None |
//! | `BUCKET_NAME` | Cloud Storage bucket for the JWKS upload | Upload skipped |
//! | `SERVICE_ACCOUNT_KEY_FILE` | Fallback service account credential | None |
//! | `JWKS_FILE_NAME` | Local file / object name of the JWKS | `jwks.json` |
//! | `JWKS_OUTPUT_DIR` | Local directory for the JWKS file | `config` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |
//!
//! `LOG_FORMAT` and `RUST_LOG` take effect once the file is loaded, so
//! messages from the loader itself use the defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

pub const PRIVATE_KEY_FILE: &str = "PRIVATE_KEY_FILE";
pub const PUBLIC_KEY_FILE: &str = "PUBLIC_KEY_FILE";
pub const KEY_ID: &str = "KEY_ID";
pub const ALGORITHM: &str = "ALGORITHM";
pub const ISS: &str = "ISS";
pub const SUB: &str = "SUB";
pub const AUD: &str = "AUD";
pub const EXPIRY_SECONDS: &str = "EXPIRY_SECONDS";
pub const BUCKET_NAME: &str = "BUCKET_NAME";
pub const SERVICE_ACCOUNT_KEY_FILE: &str = "SERVICE_ACCOUNT_KEY_FILE";
pub const JWKS_FILE_NAME: &str = "JWKS_FILE_NAME";
pub const JWKS_OUTPUT_DIR: &str = "JWKS_OUTPUT_DIR";
pub const GOOGLE_APPLICATION_CREDENTIALS: &str = "GOOGLE_APPLICATION_CREDENTIALS";
pub const GCE_METADATA_HOST: &str = "GCE_METADATA_HOST";
pub const HOME: &str = "HOME";
pub const LOG_FORMAT: &str = "LOG_FORMAT";
pub const RUST_LOG: &str = "RUST_LOG";

/// Prefix marking configuration entries that become custom token claims.
pub const CUSTOM_CLAIM_PREFIX: &str = "CUSTOM_CLAIM_";

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config/config.env";
pub const DEFAULT_ALGORITHM: &str = "RS256";
pub const DEFAULT_EXPIRY_SECONDS: u64 = 300;
pub const DEFAULT_JWKS_FILE_NAME: &str = "jwks.json";
pub const DEFAULT_JWKS_OUTPUT_DIR: &str = "config";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} not found in the configuration")]
    Missing(String),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },

    #[error("failed to read configuration file {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// Flat key/value configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    values: BTreeMap<String, String>,
    /// The file the values were read from, if it existed.
    file: Option<PathBuf>,
}

impl Config {
    /// Load `path` and overlay the process environment.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, std::env::vars())
    }

    /// Load `path` and overlay `vars` on top of it.
    ///
    /// A missing file is not an error; the overlay alone is used.
    pub fn load_with_env(
        path: impl AsRef<Path>,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut values = BTreeMap::new();
        let mut file = None;

        if path.exists() {
            let entries = dotenvy::from_path_iter(path).map_err(|source| ConfigError::File {
                path: path.to_path_buf(),
                source,
            })?;
            for entry in entries {
                let (key, value) = entry.map_err(|source| ConfigError::File {
                    path: path.to_path_buf(),
                    source,
                })?;
                values.insert(key, value);
            }
            debug!(path = %path.display(), entries = values.len(), "Loaded configuration file");
            file = Some(path.to_path_buf());
        } else {
            debug!(path = %path.display(), "Configuration file not found, using environment only");
        }

        values.extend(vars);
        Ok(Self { values, file })
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            file: None,
        }
    }

    /// Look up `key`. Empty or whitespace-only values count as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key).ok_or_else(|| ConfigError::Missing(key.to_string()))
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).map(PathBuf::from)
    }

    /// Token lifetime, `EXPIRY_SECONDS` or 300. At most `i64::MAX`.
    pub fn expiry_seconds(&self) -> Result<u64, ConfigError> {
        let Some(raw) = self.get(EXPIRY_SECONDS) else {
            return Ok(DEFAULT_EXPIRY_SECONDS);
        };
        let seconds = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
            key: EXPIRY_SECONDS.to_string(),
            reason: format!("expected a non-negative integer, got {raw:?} ({e})"),
        })?;
        if i64::try_from(seconds).is_err() {
            return Err(ConfigError::Invalid {
                key: EXPIRY_SECONDS.to_string(),
                reason: format!("{seconds} exceeds the largest timestamp offset ({})", i64::MAX),
            });
        }
        Ok(seconds)
    }

    /// Claims sourced from `CUSTOM_CLAIM_<name>` entries.
    ///
    /// The claim name is the remainder after the prefix, lower-cased. When
    /// several keys lower-case to the same name, the key that sorts last
    /// wins and the others are logged.
    pub fn custom_claims(&self) -> BTreeMap<String, String> {
        let mut claims = BTreeMap::new();
        for (key, value) in &self.values {
            let Some(name) = key.strip_prefix(CUSTOM_CLAIM_PREFIX) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            if let Some(previous) = claims.insert(name.to_ascii_lowercase(), value.clone()) {
                warn!(
                    claim = %name.to_ascii_lowercase(),
                    key = %key,
                    dropped = %previous,
                    "Custom claim set by more than one key, keeping the last"
                );
            }
        }
        claims
    }

    /// The configuration file that was read, `None` when only the
    /// environment contributed.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
