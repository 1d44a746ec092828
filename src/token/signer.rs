// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Compact JWS signing.

use jsonwebtoken::{encode, EncodingKey, Header};
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::RsaPrivateKey;
use tracing::{debug, info};

use super::algorithm::KeyDescriptor;
use super::claims::Claims;
use super::clock::{Clock, SystemClock};
use super::SigningError;
use crate::config::{self, Config};
use crate::error::Result;
use crate::keys::load_private_key;

/// Signs claim sets with one RSA private key.
pub struct JwtSigner {
    key: EncodingKey,
    descriptor: KeyDescriptor,
}

impl JwtSigner {
    pub fn new(private_key: &RsaPrivateKey, descriptor: KeyDescriptor) -> Result<Self, SigningError> {
        let der = private_key
            .to_pkcs1_der()
            .map_err(|e| SigningError::Encoding(e.to_string()))?;
        Ok(Self {
            key: EncodingKey::from_rsa_der(der.as_bytes()),
            descriptor,
        })
    }

    pub fn descriptor(&self) -> &KeyDescriptor {
        &self.descriptor
    }

    /// Header carrying `alg` and `kid`.
    pub fn header(&self) -> Header {
        let mut header = Header::new(self.descriptor.algorithm.into());
        header.kid = Some(self.descriptor.key_id.clone());
        header
    }

    /// Serialize and sign `claims` as `header.payload.signature`.
    pub fn sign(&self, claims: &Claims) -> Result<String, SigningError> {
        encode(&self.header(), claims, &self.key).map_err(SigningError::Jwt)
    }
}

/// Issue a token from configuration using the wall clock.
pub fn generate_jwt(config: &Config) -> Result<String> {
    generate_jwt_with_clock(config, &SystemClock)
}

/// Issue a token from configuration.
///
/// Fails with a configuration error before touching the filesystem when
/// `PRIVATE_KEY_FILE` or `KEY_ID` is missing.
pub fn generate_jwt_with_clock(config: &Config, clock: &dyn Clock) -> Result<String> {
    let private_key_path = config.require(config::PRIVATE_KEY_FILE)?;
    let descriptor = KeyDescriptor::from_config(config)?;
    let claims = Claims::from_config(config, clock)?;

    let private_key = load_private_key(private_key_path)?;
    let signer = JwtSigner::new(&private_key, descriptor)?;
    let token = signer.sign(&claims)?;

    debug!(custom_claims = claims.custom.len(), "Signed claim set");
    info!(
        kid = %signer.descriptor().key_id,
        alg = %signer.descriptor().algorithm,
        iat = claims.iat,
        exp = claims.exp,
        "Issued JWT"
    );
    Ok(token)
}
