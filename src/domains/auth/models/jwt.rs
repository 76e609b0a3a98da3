use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domains::auth::models::user::User;

/// Access Token Claims (토큰에 포함될 데이터)
/// Access token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// 사용자 ID
    /// User ID
    pub user_id: u64,
    pub email: String,
    pub username: String,
    pub fullname: String,

    /// 만료 시간 (Unix timestamp)
    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// 발급 시간 (Unix timestamp)
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl AccessClaims {
    /// 새 Claims 생성 (만료 시간 자동 계산)
    /// Create new claims, expiry computed from `ttl_secs`
    pub fn new(user: &User, ttl_secs: i64) -> Self {
        let now = chrono::Utc::now().timestamp();

        Self {
            user_id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            fullname: user.fullname.clone(),
            exp: now.saturating_add(ttl_secs),
            iat: now,
        }
    }
}

/// Refresh Token Claims
/// `jti` 로 같은 초에 발급된 토큰끼리도 항상 다른 값이 됨
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub user_id: u64,
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
}

impl RefreshClaims {
    pub fn new(user_id: u64, ttl_secs: i64) -> Self {
        let now = chrono::Utc::now().timestamp();

        Self {
            user_id,
            jti: Uuid::new_v4().to_string(),
            exp: now.saturating_add(ttl_secs),
            iat: now,
        }
    }
}
