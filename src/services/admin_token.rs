//! Ghost Admin API token signing.
//!
//! Ghost authenticates admin requests with a short-lived HS256 JWT whose key id
//! is the admin key id and whose signing key is the raw bytes of the hex secret.

use crate::constants::token::{ALGORITHM, AUDIENCE, TTL_SECONDS, TYPE};
use crate::errors::ToolError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("admin key id must not be empty")]
    EmptyKeyId,
    #[error("admin key secret must not be empty")]
    EmptySecret,
    #[error("admin key secret is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("admin key secret has an unusable length")]
    InvalidKeyLength,
    #[error("admin key must look like '<id>:<hex secret>'")]
    MalformedKey,
    #[error("token must have three '.'-separated segments")]
    MalformedToken,
    #[error("token segment is not valid base64url: {0}")]
    InvalidSegment(#[from] base64::DecodeError),
    #[error("token segment is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("token signature does not match")]
    BadSignature,
}

impl From<TokenError> for ToolError {
    fn from(err: TokenError) -> Self {
        ToolError::internal(err.to_string())
    }
}

/// Admin API credential: key id plus a MAC keyed by the decoded secret.
#[derive(Clone)]
pub struct AdminKey {
    id: String,
    mac: HmacSha256,
}

impl AdminKey {
    pub fn new(id: &str, secret_hex: &str) -> Result<Self, TokenError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(TokenError::EmptyKeyId);
        }
        let secret_hex = secret_hex.trim();
        if secret_hex.is_empty() {
            return Err(TokenError::EmptySecret);
        }
        let secret = hex::decode(secret_hex)?;
        let mac =
            HmacSha256::new_from_slice(&secret).map_err(|_| TokenError::InvalidKeyLength)?;
        Ok(Self {
            id: id.to_string(),
            mac,
        })
    }

    /// Parses the `id:secret` form Ghost shows in the integrations screen.
    pub fn parse(raw: &str) -> Result<Self, TokenError> {
        let (id, secret) = raw.trim().split_once(':').ok_or(TokenError::MalformedKey)?;
        Self::new(id, secret)
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminKey")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
    pub alg: String,
    pub typ: String,
    pub kid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iat: i64,
    pub exp: i64,
    pub aud: String,
}

fn encode_segment<T: Serialize>(value: &T) -> String {
    // Serializing plain structs of strings and integers cannot fail.
    let json = serde_json::to_vec(value).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Builds a signed token valid from `issued_at` for [`TTL_SECONDS`].
pub fn build_admin_token(key: &AdminKey, issued_at: i64) -> String {
    let header = TokenHeader {
        alg: ALGORITHM.to_string(),
        typ: TYPE.to_string(),
        kid: key.id.clone(),
    };
    let claims = Claims {
        iat: issued_at,
        exp: issued_at + TTL_SECONDS,
        aud: AUDIENCE.to_string(),
    };
    let signing_input = format!("{}.{}", encode_segment(&header), encode_segment(&claims));
    let mut mac = key.mac.clone();
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    format!("{}.{}", signing_input, signature)
}

pub fn create_admin_token(key: &AdminKey) -> String {
    build_admin_token(key, chrono::Utc::now().timestamp())
}

pub fn create_token(key_id: &str, key_secret: &str) -> Result<String, TokenError> {
    let key = AdminKey::new(key_id, key_secret)?;
    Ok(create_admin_token(&key))
}

/// Checks the signature and returns the decoded claims. Expiry is not enforced.
pub fn verify_admin_token(token: &str, key: &AdminKey) -> Result<Claims, TokenError> {
    let mut parts = token.split('.');
    let (Some(header), Some(payload), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::MalformedToken);
    };
    let signature = URL_SAFE_NO_PAD.decode(signature)?;
    let mut mac = key.mac.clone();
    mac.update(header.as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| TokenError::BadSignature)?;

    let header: TokenHeader = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(header)?)?;
    if header.kid != key.id {
        return Err(TokenError::BadSignature);
    }
    let claims: Claims = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload)?)?;
    Ok(claims)
}
