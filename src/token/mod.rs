// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Token Issuing
//!
//! Builds the claim set from configuration and signs it into a compact JWS
//! (`header.payload.signature`, each segment base64url). The header carries
//! the configured `kid` so relying parties can pick the matching entry from
//! the published JWKS.
//!
//! Only RSA schemes are accepted (`RS256/384/512`, `PS256/384/512`).

pub mod algorithm;
pub mod claims;
pub mod clock;
pub mod signer;

pub use algorithm::{KeyDescriptor, SigningAlgorithm};
pub use claims::Claims;
pub use clock::{Clock, FixedClock, SystemClock};
pub use signer::{generate_jwt, generate_jwt_with_clock, JwtSigner};

#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("unsupported signing algorithm {0:?} (expected RS256, RS384, RS512, PS256, PS384 or PS512)")]
    UnsupportedAlgorithm(String),

    #[error("key ID must not be empty")]
    EmptyKeyId,

    #[error("failed to encode private key for signing: {0}")]
    Encoding(String),

    #[error("failed to sign token: {0}")]
    Jwt(#[source] jsonwebtoken::errors::Error),
}
