// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) construction.
//!
//! Maps an RSA public key onto a single-entry key set (RFC 7517/7518):
//! `kty`, `kid`, `alg`, `use`, and the modulus/exponent as unpadded
//! base64url of their minimal big-endian bytes.

use base64ct::{Base64UrlUnpadded, Encoding};
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;
use serde::{Deserialize, Serialize};

use crate::token::SigningAlgorithm;

/// A single JSON Web Key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    pub kid: String,
    pub alg: String,
    #[serde(rename = "use")]
    pub key_use: String,
    /// Modulus
    pub n: String,
    /// Public exponent
    pub e: String,
}

/// A JSON Web Key Set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

impl JwkSet {
    /// Two-space indented JSON, as written to disk and uploaded.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|k| k.kid == kid)
    }
}

/// Build the key set publishing `public_key` under `key_id`.
pub fn build_jwks(public_key: &RsaPublicKey, algorithm: SigningAlgorithm, key_id: &str) -> JwkSet {
    JwkSet {
        keys: vec![Jwk {
            kty: "RSA".to_string(),
            kid: key_id.to_string(),
            alg: algorithm.as_str().to_string(),
            key_use: "sig".to_string(),
            n: Base64UrlUnpadded::encode_string(&public_key.n().to_bytes_be()),
            e: Base64UrlUnpadded::encode_string(&public_key.e().to_bytes_be()),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::load_public_key;
    use crate::test_support::fixture;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use rsa::BigUint;

    const FIXTURE_MODULUS: &str = "z2rqfoG812QmEXiLtWLrHCtoJ57J5TjxgM0EzdTTAxcM993JSlOm5CdoUGnNXW_xJnreoFlIHI-DvIjFgGhCX5nteOs3NlmAENZPLjpLb5oO5SyoC2rBWwJL2IBkzG6Iou-WFicszuqt_FYsEMZY79OyeiH9D-NOk77y67prlCeSja1MjWO3byVxZpsrg_w71-PD5LBwQXccGfIJ2KsUW-QWXLyww_UvW4hW0BPTNx7zEqZTKuIy0J-z3t_UatR7ERi5E_xQHmJD3_jegbM31wY2WV0ylMqxsO-4VBgfD4Zc_F7dQH_acuFvvmYYd6TnlEd6Xt7iEFDwFqvUBkL_Hw";

    fn fixture_key() -> RsaPublicKey {
        load_public_key(fixture("public.pem")).unwrap()
    }

    #[test]
    fn single_rsa_signing_entry() {
        let jwks = build_jwks(&fixture_key(), SigningAlgorithm::Rs256, "abc123");
        assert_eq!(jwks.keys.len(), 1);

        let jwk = &jwks.keys[0];
        assert_eq!(jwk.kty, "RSA");
        assert_eq!(jwk.kid, "abc123");
        assert_eq!(jwk.alg, "RS256");
        assert_eq!(jwk.key_use, "sig");
        assert_eq!(jwk.e, "AQAB");
        assert_eq!(jwk.n, FIXTURE_MODULUS);
    }

    #[test]
    fn serializes_standard_field_names() {
        let jwks = build_jwks(&fixture_key(), SigningAlgorithm::Rs512, "k1");
        let value: serde_json::Value = serde_json::to_value(&jwks).unwrap();
        let key = &value["keys"][0];

        assert_eq!(key["use"], "sig");
        assert_eq!(key["alg"], "RS512");
        assert!(key.get("key_use").is_none());

        let pretty = jwks.to_pretty_json().unwrap();
        assert!(pretty.starts_with("{\n  \"keys\": [\n    {\n      \"kty\": \"RSA\","));
    }

    #[test]
    fn output_is_deterministic() {
        let key = fixture_key();
        let first = serde_json::to_vec(&build_jwks(&key, SigningAlgorithm::Rs256, "abc")).unwrap();
        let second = serde_json::to_vec(&build_jwks(&key, SigningAlgorithm::Rs256, "abc")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn modulus_and_exponent_round_trip() {
        for name in ["public.pem", "other_public.pem"] {
            let key = load_public_key(fixture(name)).unwrap();
            let jwk = build_jwks(&key, SigningAlgorithm::Rs256, "kid").keys.remove(0);

            let n = URL_SAFE_NO_PAD.decode(&jwk.n).unwrap();
            let e = URL_SAFE_NO_PAD.decode(&jwk.e).unwrap();
            assert_ne!(n[0], 0, "modulus must not carry a leading zero byte");
            assert_eq!(&BigUint::from_bytes_be(&n), key.n());
            assert_eq!(&BigUint::from_bytes_be(&e), key.e());
        }
    }

    #[test]
    fn parses_as_standard_jwk_set() {
        let jwks = build_jwks(&fixture_key(), SigningAlgorithm::Ps256, "abc123");
        let json = jwks.to_pretty_json().unwrap();

        let parsed: jsonwebtoken::jwk::JwkSet = serde_json::from_str(&json).unwrap();
        let jwk = parsed.find("abc123").expect("kid should be present");
        assert!(matches!(
            jwk.algorithm,
            jsonwebtoken::jwk::AlgorithmParameters::RSA(_)
        ));
        assert!(jsonwebtoken::DecodingKey::from_jwk(jwk).is_ok());
    }

    #[test]
    fn find_by_kid() {
        let jwks = build_jwks(&fixture_key(), SigningAlgorithm::Rs256, "abc123");
        assert!(jwks.find("abc123").is_some());
        assert!(jwks.find("other").is_none());
    }
}
