// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Supported signing schemes and the key descriptor.

use std::fmt;
use std::str::FromStr;

use jsonwebtoken::Algorithm;

use super::SigningError;
use crate::config::{self, Config};

/// RSA signing algorithms accepted for tokens and published in the JWKS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SigningAlgorithm {
    #[default]
    Rs256,
    Rs384,
    Rs512,
    Ps256,
    Ps384,
    Ps512,
}

impl SigningAlgorithm {
    pub const ALL: [SigningAlgorithm; 6] = [
        SigningAlgorithm::Rs256,
        SigningAlgorithm::Rs384,
        SigningAlgorithm::Rs512,
        SigningAlgorithm::Ps256,
        SigningAlgorithm::Ps384,
        SigningAlgorithm::Ps512,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SigningAlgorithm::Rs256 => "RS256",
            SigningAlgorithm::Rs384 => "RS384",
            SigningAlgorithm::Rs512 => "RS512",
            SigningAlgorithm::Ps256 => "PS256",
            SigningAlgorithm::Ps384 => "PS384",
            SigningAlgorithm::Ps512 => "PS512",
        }
    }
}

impl From<SigningAlgorithm> for Algorithm {
    fn from(alg: SigningAlgorithm) -> Self {
        match alg {
            SigningAlgorithm::Rs256 => Algorithm::RS256,
            SigningAlgorithm::Rs384 => Algorithm::RS384,
            SigningAlgorithm::Rs512 => Algorithm::RS512,
            SigningAlgorithm::Ps256 => Algorithm::PS256,
            SigningAlgorithm::Ps384 => Algorithm::PS384,
            SigningAlgorithm::Ps512 => Algorithm::PS512,
        }
    }
}

impl FromStr for SigningAlgorithm {
    type Err = SigningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.as_str() == s.trim())
            .ok_or_else(|| SigningError::UnsupportedAlgorithm(s.to_string()))
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which key signs tokens, and with what scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDescriptor {
    pub key_id: String,
    pub algorithm: SigningAlgorithm,
}

impl KeyDescriptor {
    pub fn new(key_id: impl Into<String>, algorithm: SigningAlgorithm) -> Result<Self, SigningError> {
        let key_id = key_id.into();
        if key_id.trim().is_empty() {
            return Err(SigningError::EmptyKeyId);
        }
        Ok(Self { key_id, algorithm })
    }

    /// `KEY_ID` (required) and `ALGORITHM` (default `RS256`).
    pub fn from_config(config: &Config) -> Result<Self, crate::error::Error> {
        let key_id = config.require(config::KEY_ID)?;
        let algorithm = algorithm_from_config(config)?;
        Ok(Self::new(key_id, algorithm)?)
    }
}

pub(crate) fn algorithm_from_config(config: &Config) -> Result<SigningAlgorithm, SigningError> {
    config
        .get_or(config::ALGORITHM, config::DEFAULT_ALGORITHM)
        .parse()
}
