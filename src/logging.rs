// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tracing subscriber setup.
//!
//! Logs go to stderr so stdout carries nothing but the issued token.

use std::str::FromStr;

use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::config::{self, Config};

const DEFAULT_FILTER: &str = "info";

/// Returned when a global subscriber is already installed.
pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// `LOG_FORMAT` from `config`. Unknown values fall back to pretty.
    pub fn from_config(config: &Config) -> Self {
        let Some(raw) = config.get(config::LOG_FORMAT) else {
            return LogFormat::default();
        };
        raw.parse().unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to pretty logs");
            LogFormat::default()
        })
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" | "" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format {other:?}")),
        }
    }
}

/// Install the global subscriber.
///
/// `filter` uses `RUST_LOG` syntax; an invalid or missing filter falls back
/// to `info`. Fails if a subscriber is already installed.
pub fn init(format: LogFormat, filter: Option<&str>) -> Result<(), InitError> {
    let filter = filter
        .and_then(|f| EnvFilter::try_new(f).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    }
}

/// Install the global subscriber from `LOG_FORMAT` and `RUST_LOG` in
/// `config` (file values included, environment wins).
pub fn init_from_config(config: &Config) -> Result<(), InitError> {
    init(LogFormat::from_config(config), config.get(config::RUST_LOG))
}
