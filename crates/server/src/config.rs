//! Server configuration read from the environment.

use std::net::SocketAddr;

use anyhow::{Context, bail};
use url::Url;

use crate::auth::ApiToken;

pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_FETCH_TIMEOUT: u64 = 30;
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 60;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `GLEANER_ADDR`
    pub addr: SocketAddr,
    /// `GLEANER_API_TOKENS`, comma-separated `subject:sha256-hex` pairs
    pub api_tokens: Vec<ApiToken>,
    /// `DATABASE_URL`; the in-memory store is used when unset
    pub database_url: Option<String>,
    /// `GLEANER_FETCH_TIMEOUT`, seconds allowed for fetching a page
    pub fetch_timeout: u64,
    /// `GLEANER_REQUEST_TIMEOUT`, seconds allowed for a whole request
    pub request_timeout: u64,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let addr = var("GLEANER_ADDR")
            .unwrap_or_else(|| DEFAULT_ADDR.to_string())
            .parse()
            .context("GLEANER_ADDR must be a socket address such as 0.0.0.0:3000")?;

        let api_tokens = match var("GLEANER_API_TOKENS") {
            Some(raw) => parse_api_tokens(&raw)?,
            None => Vec::new(),
        };

        let database_url = var("DATABASE_URL");
        if let Some(database_url) = &database_url {
            let parsed = Url::parse(database_url).context("DATABASE_URL is not a valid URL")?;
            if !matches!(parsed.scheme(), "postgres" | "postgresql") {
                bail!("DATABASE_URL must use the postgres:// scheme");
            }
        }

        Ok(Self {
            addr,
            api_tokens,
            database_url,
            fetch_timeout: parse_seconds(var("GLEANER_FETCH_TIMEOUT"), "GLEANER_FETCH_TIMEOUT", DEFAULT_FETCH_TIMEOUT)?,
            request_timeout: parse_seconds(
                var("GLEANER_REQUEST_TIMEOUT"),
                "GLEANER_REQUEST_TIMEOUT",
                DEFAULT_REQUEST_TIMEOUT,
            )?,
        })
    }
}

fn parse_seconds(value: Option<String>, key: &str, default: u64) -> anyhow::Result<u64> {
    match value {
        Some(value) => match value.parse::<u64>() {
            Ok(0) | Err(_) => bail!("{key} must be a positive number of seconds, got {value:?}"),
            Ok(seconds) => Ok(seconds),
        },
        None => Ok(default),
    }
}

fn parse_api_tokens(raw: &str) -> anyhow::Result<Vec<ApiToken>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (subject, digest) = entry
                .split_once(':')
                .with_context(|| format!("API token entry {entry:?} is not subject:sha256-hex"))?;
            ApiToken::new(subject.trim(), digest.trim())
        })
        .collect()
}
