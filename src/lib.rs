// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! jwks-issuer - RSA-signed JWT issuer and JWKS publisher
//!
//! Signs short-lived tokens with a single RSA key pair and publishes the
//! public half as a JSON Web Key Set so relying parties can verify them.
//!
//! ## Modules
//!
//! - `config` - Flat key/value configuration (file + environment)
//! - `keys` - PEM key loading
//! - `jwks` - JWKS construction
//! - `token` - Claim set and JWT signing
//! - `publish` - Local file and Cloud Storage publishing
//! - `commands` - CLI actions

pub mod commands;
pub mod config;
pub mod error;
pub mod jwks;
pub mod keys;
pub mod logging;
pub mod publish;
pub mod token;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{Error, Result};
pub use jwks::{build_jwks, Jwk, JwkSet};
pub use keys::{load_private_key, load_public_key};
pub use token::{generate_jwt, Claims, KeyDescriptor, SigningAlgorithm};
