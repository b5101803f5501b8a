//! Request authentication.
//!
//! Routes only see the [`Authenticator`] trait. The shipped implementation
//! checks opaque bearer tokens against SHA-256 digests supplied through
//! configuration, so no secret is ever stored in plain text.

use std::fmt;

use anyhow::bail;
use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE};
use sha2::{Digest, Sha256};

/// Who made an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
}

/// Why a request was not authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    MissingToken,
    InvalidToken,
}

impl fmt::Display for AuthRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthRejection::MissingToken => f.write_str("no bearer token or token cookie"),
            AuthRejection::InvalidToken => f.write_str("token not recognised"),
        }
    }
}

pub trait Authenticator: Send + Sync {
    fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, AuthRejection>;
}

/// A configured token: the subject it identifies and the hex SHA-256 of its secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken {
    subject: String,
    sha256_hex: String,
}

impl ApiToken {
    pub fn new(subject: &str, sha256_hex: &str) -> anyhow::Result<Self> {
        if subject.is_empty() {
            bail!("API token subject must not be empty");
        }
        if sha256_hex.len() != 64 || !sha256_hex.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!("API token digest for {subject:?} must be 64 hex characters");
        }
        Ok(Self { subject: subject.to_string(), sha256_hex: sha256_hex.to_ascii_lowercase() })
    }

    /// Token entry for a plain secret.
    pub fn from_secret(subject: &str, secret: &str) -> anyhow::Result<Self> {
        Self::new(subject, &digest_hex(secret))
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiToken").field("subject", &self.subject).finish_non_exhaustive()
    }
}

/// Lowercase hex SHA-256 of `secret`.
pub fn digest_hex(secret: &str) -> String {
    format!("{:x}", Sha256::digest(secret.as_bytes()))
}

/// Accepts `Authorization: Bearer <token>` or a `token` cookie.
#[derive(Debug, Clone, Default)]
pub struct TokenAuthenticator {
    tokens: Vec<ApiToken>,
}

impl TokenAuthenticator {
    pub fn new(tokens: Vec<ApiToken>) -> Self {
        Self { tokens }
    }
}

impl Authenticator for TokenAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, AuthRejection> {
        let token = token_from_headers(headers).ok_or(AuthRejection::MissingToken)?;
        let digest = digest_hex(token);

        self.tokens
            .iter()
            .find(|candidate| candidate.sha256_hex == digest)
            .map(|candidate| Identity { subject: candidate.subject.clone() })
            .ok_or(AuthRejection::InvalidToken)
    }
}

fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    bearer.or_else(|| {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == "token")
            .map(|(_, token)| token.trim())
            .filter(|token| !token.is_empty())
    })
}
