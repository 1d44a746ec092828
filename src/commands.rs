// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The CLI actions.

use clap::ValueEnum;
use tracing::error;

use crate::config::{self, Config};
use crate::error::Result;
use crate::jwks::{build_jwks, JwkSet};
use crate::keys::{load_private_key, resolve_public_key};
use crate::publish::{JwksPublisher, PublishReport};
use crate::token::{generate_jwt_with_clock, Clock, KeyDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Action {
    /// Build and publish the JWKS, then issue a JWT
    #[default]
    #[value(name = "all")]
    All,
    /// Only issue a JWT
    #[value(name = "jwt_only")]
    JwtOnly,
}

#[derive(Debug, Clone)]
pub struct Outcome {
    /// Present when the action published the key set.
    pub publish: Option<PublishReport>,
    pub token: String,
}

/// Load the configured key pair and build its key set.
pub fn jwks_from_config(config: &Config) -> Result<JwkSet> {
    let private_key_path = config.require(config::PRIVATE_KEY_FILE)?;
    let descriptor = KeyDescriptor::from_config(config)?;

    let private_key = load_private_key(private_key_path)?;
    let public_key = resolve_public_key(config, &private_key)?;
    Ok(build_jwks(&public_key, descriptor.algorithm, &descriptor.key_id))
}

/// Build the key set and publish it. Only key and configuration problems
/// are errors; publishing problems end up in the report.
pub async fn publish_jwks(config: &Config) -> Result<PublishReport> {
    let jwks = jwks_from_config(config)?;
    let publisher = match JwksPublisher::from_config(config) {
        Ok(publisher) => publisher,
        Err(e) => {
            error!(error = %e, "JWKS publisher unavailable");
            return Ok(PublishReport::default());
        }
    };
    Ok(publisher.publish(&jwks).await)
}

pub async fn run(action: Action, config: &Config, clock: &dyn Clock) -> Result<Outcome> {
    let publish = match action {
        Action::All => Some(publish_jwks(config).await?),
        Action::JwtOnly => None,
    };
    let token = generate_jwt_with_clock(config, clock)?;
    Ok(Outcome { publish, token })
}
