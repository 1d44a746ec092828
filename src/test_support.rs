// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared helpers for unit tests.
//!
//! Key fixtures under `testdata/` were generated with openssl:
//! `private.pem`/`public.pem` form one pair (also available as PKCS#1 in
//! `private_pkcs1.pem`/`public_pkcs1.pem`), `other_*.pem` form a second
//! pair, the `encrypted_*` files use the password `secret`, and `ec_*.pem`
//! is a P-256 pair.

use std::fs;
use std::path::PathBuf;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(name)
}

pub fn fixture_string(name: &str) -> String {
    fs::read_to_string(fixture(name)).unwrap()
}
