//! OAuth2 bearer tokens for Drive requests.

use super::DriveError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::RwLock;

/// Read-only Drive scope; the gateway never writes.
pub const DRIVE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String, DriveError>;
}

/// A fixed bearer token.
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn access_token(&self) -> Result<String, DriveError> {
        if self.token.is_empty() {
            return Err(DriveError::Auth("Drive access token is empty".to_string()));
        }
        Ok(self.token.clone())
    }
}

/// The fields of a Google service-account key file we need.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl ServiceAccountKey {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DriveError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DriveError::Auth(format!(
                "Failed to read service account key {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| DriveError::Auth(format!("Invalid service account key: {}", e)))
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Exchanges a signed JWT assertion for an access token and caches it
/// until shortly before it expires.
pub struct ServiceAccountTokenSource {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    client: Client,
    cached: RwLock<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    pub fn new(key: ServiceAccountKey) -> Result<Self, DriveError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| DriveError::Auth(format!("Failed to parse private key: {}", e)))?;

        Ok(Self {
            key,
            encoding_key,
            client: Client::new(),
            cached: RwLock::new(None),
        })
    }

    fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String, DriveError> {
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: DRIVE_READONLY_SCOPE,
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ASSERTION_LIFETIME_SECS)).timestamp(),
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| DriveError::Auth(format!("Failed to sign assertion: {}", e)))
    }

    async fn fetch_token(&self) -> Result<CachedToken, DriveError> {
        let now = Utc::now();
        let assertion = self.sign_assertion(now)?;

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| DriveError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::Auth(format!(
                "Token exchange failed {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| DriveError::Auth(format!("Invalid token response: {}", e)))?;

        tracing::debug!(
            client_email = %self.key.client_email,
            expires_in = token.expires_in,
            "Obtained Drive access token"
        );

        Ok(CachedToken {
            value: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        })
    }
}

fn still_fresh(token: &CachedToken, now: DateTime<Utc>) -> bool {
    token.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > now
}

#[async_trait]
impl TokenSource for ServiceAccountTokenSource {
    async fn access_token(&self) -> Result<String, DriveError> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref() {
                if still_fresh(token, Utc::now()) {
                    return Ok(token.value.clone());
                }
            }
        }

        let mut guard = self.cached.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(token) = guard.as_ref() {
            if still_fresh(token, Utc::now()) {
                return Ok(token.value.clone());
            }
        }

        let token = self.fetch_token().await?;
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }
}
