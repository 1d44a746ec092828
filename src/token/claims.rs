// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claim set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::clock::Clock;
use crate::config::{self, Config, ConfigError};

/// Registered claims that custom claims may not shadow.
pub const REGISTERED_CLAIMS: [&str; 5] = ["iss", "sub", "aud", "iat", "exp"];

/// Claims carried by an issued token.
///
/// `iss`, `sub` and `aud` are omitted from the payload when unconfigured.
/// `exp` is always `iat + expiry_seconds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// Issued at (Unix seconds)
    pub iat: i64,

    /// Expiration (Unix seconds)
    pub exp: i64,

    #[serde(flatten)]
    pub custom: BTreeMap<String, String>,
}

impl Claims {
    /// Claims issued now according to `clock`, valid for `expiry_seconds`.
    ///
    /// `None` when `iat + expiry_seconds` does not fit in a timestamp.
    pub fn issued_at(clock: &dyn Clock, expiry_seconds: u64) -> Option<Self> {
        let iat = clock.now().timestamp();
        let exp = i64::try_from(expiry_seconds)
            .ok()
            .and_then(|lifetime| iat.checked_add(lifetime))?;
        Some(Self {
            iss: None,
            sub: None,
            aud: None,
            iat,
            exp,
            custom: BTreeMap::new(),
        })
    }

    /// Build the full claim set from configuration.
    pub fn from_config(config: &Config, clock: &dyn Clock) -> Result<Self, ConfigError> {
        let expiry = config.expiry_seconds()?;
        let mut claims = Self::issued_at(clock, expiry).ok_or_else(|| ConfigError::Invalid {
            key: config::EXPIRY_SECONDS.to_string(),
            reason: format!("expiry of {expiry} seconds overflows the token timestamp"),
        })?;
        claims.iss = config.get(config::ISS).map(str::to_string);
        claims.sub = config.get(config::SUB).map(str::to_string);
        claims.aud = config.get(config::AUD).map(str::to_string);
        for (name, value) in config.custom_claims() {
            claims.insert_custom(name, value);
        }
        Ok(claims)
    }

    /// Add a custom claim. Returns `false` if `name` is a registered claim.
    pub fn insert_custom(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if REGISTERED_CLAIMS.contains(&name.as_str()) {
            warn!(claim = %name, "Ignoring custom claim that shadows a registered claim");
            return false;
        }
        self.custom.insert(name, value.into());
        true
    }

    pub fn lifetime_seconds(&self) -> i64 {
        self.exp - self.iat
    }
}
