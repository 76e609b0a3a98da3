// src/domains/auth/services/jwt_service.rs
use crate::domains::auth::models::jwt::{AccessClaims, RefreshClaims};
use crate::domains::auth::models::user::User;
use crate::shared::config::JwtConfig;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// 토큰 검증 실패 원인
/// Why a token failed verification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    /// 서명 불일치 (위조 또는 다른 secret 으로 서명됨)
    #[error("invalid token signature")]
    Tampered,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::Tampered,
            _ => TokenError::Malformed(e.to_string()),
        }
    }
}

#[derive(Clone)]
struct SigningKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl SigningKeys {
    fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            ttl_secs,
        }
    }
}

/// JWT 서비스
/// JWT Service: access and refresh tokens, each with its own secret and TTL
#[derive(Clone)]
pub struct JwtService {
    access: SigningKeys,
    refresh: SigningKeys,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            access: SigningKeys::new(&config.access_secret, config.access_ttl_secs),
            refresh: SigningKeys::new(&config.refresh_secret, config.refresh_ttl_secs),
        }
    }

    /// Access Token 발급 (짧은 수명)
    /// Generate Access Token (short lifetime)
    pub fn generate_access_token(&self, user: &User) -> Result<String, TokenError> {
        let claims = AccessClaims::new(user, self.access.ttl_secs);

        encode(&Header::default(), &claims, &self.access.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Refresh Token 발급 (긴 수명, DB에 저장할 것)
    /// Generate Refresh Token (long lifetime, to be stored on the user record)
    pub fn generate_refresh_token(&self, user_id: u64) -> Result<String, TokenError> {
        let claims = RefreshClaims::new(user_id, self.refresh.ttl_secs);

        encode(&Header::default(), &claims, &self.refresh.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Access Token 검증
    /// Verify Access Token
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        Self::verify(token, &self.access.decoding_key)
    }

    /// Refresh Token 검증 (서명 + 만료만 확인, DB 대조는 SessionTokenManager 에서)
    /// Verify Refresh Token signature and expiry
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        Self::verify(token, &self.refresh.decoding_key)
    }

    fn verify<T: DeserializeOwned>(token: &str, key: &DecodingKey) -> Result<T, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let token_data = decode::<T>(token, key, &validation)?;
        Ok(token_data.claims)
    }
}
