// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Crate-level error.

use crate::config::ConfigError;
use crate::keys::KeyLoadError;
use crate::publish::PublishError;
use crate::token::SigningError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    KeyLoad(#[from] KeyLoadError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}

impl Error {
    /// Short machine-readable kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "config_error",
            Error::KeyLoad(_) => "key_load_error",
            Error::Signing(_) => "signing_error",
            Error::Publish(_) => "publish_error",
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_module_errors_transparently() {
        let err: Error = ConfigError::Missing("KEY_ID".to_string()).into();
        assert_eq!(err.kind(), "config_error");
        assert_eq!(err.to_string(), "KEY_ID not found in the configuration");

        let err: Error = SigningError::EmptyKeyId.into();
        assert_eq!(err.kind(), "signing_error");
        assert_eq!(err.to_string(), "key ID must not be empty");
    }

    #[test]
    fn publish_errors_keep_their_kind() {
        let err: Error = PublishError::NoCredentials.into();
        assert_eq!(err.kind(), "publish_error");
    }
}
