use std::sync::Arc;
use crate::domains::auth::models::{TokenPair, User};
use crate::domains::auth::services::JwtService;
use crate::shared::database::UserStore;
use crate::shared::errors::ApiError;

const TOKEN_GENERATION_FAILED: &str = "Something went wrong while generating access and refresh token";

/// 세션 토큰 관리자
/// Session Token Manager
///
/// 사용자당 Refresh Token 은 하나만 기록됩니다.
/// - issue: 새 토큰 쌍 발급, 이전 Refresh Token 덮어씀 (last write wins)
/// - validate: 제시된 Refresh Token 을 서명/만료/DB 기록과 대조
/// - rotate: validate 후 issue (검증된 토큰도 즉시 폐기)
/// - revoke: 기록된 Refresh Token 제거 (멱등)
#[derive(Clone)]
pub struct SessionTokenManager {
    store: Arc<dyn UserStore>,
    jwt_service: JwtService,
}

impl SessionTokenManager {
    pub fn new(store: Arc<dyn UserStore>, jwt_service: JwtService) -> Self {
        Self { store, jwt_service }
    }

    /// 토큰 쌍 발급 및 Refresh Token 저장
    /// Issue a token pair and persist the refresh token (targeted update)
    pub async fn issue(&self, user: &User) -> Result<TokenPair, ApiError> {
        let access_token = self
            .jwt_service
            .generate_access_token(user)
            .map_err(|e| ApiError::internal(TOKEN_GENERATION_FAILED, e))?;
        let refresh_token = self
            .jwt_service
            .generate_refresh_token(user.id)
            .map_err(|e| ApiError::internal(TOKEN_GENERATION_FAILED, e))?;

        self.store
            .set_refresh_token(user.id, &refresh_token)
            .await
            .map_err(|e| ApiError::internal(TOKEN_GENERATION_FAILED, format!("{:#}", e)))?;

        tracing::debug!(user_id = user.id, "Issued token pair");

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Refresh Token 검증
    /// Validate a presented refresh token against the recorded one
    ///
    /// 토큰 문제는 원인과 관계없이 모두 401 로 응답합니다.
    pub async fn validate(&self, presented: Option<&str>) -> Result<User, ApiError> {
        // 1. 토큰 존재 여부
        // 공백 여부만 trim 으로 판단, 비교는 제시된 값 그대로
        let presented = match presented {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Err(ApiError::unauthorized("Unauthorized request")),
        };

        // 2. 서명 + 만료 검증
        let claims = self
            .jwt_service
            .verify_refresh_token(presented)
            .map_err(|e| ApiError::unauthorized_with_detail("Invalid Refresh Token", e.to_string()))?;

        // 3. 사용자 조회
        let user = self
            .store
            .get_user_by_id(claims.user_id)
            .await
            .map_err(|e| ApiError::internal("Failed to fetch user", format!("{:#}", e)))?
            .ok_or_else(|| ApiError::unauthorized("Unauthorized Refresh Token"))?;

        // 4. DB 에 기록된 토큰과 비교 (덮어써졌거나 로그아웃된 경우 불일치)
        if user.refresh_token.as_deref() != Some(presented) {
            tracing::info!(user_id = user.id, "Rejected superseded refresh token");
            return Err(ApiError::unauthorized("Refresh Token Expired"));
        }

        Ok(user)
    }

    /// 검증 후 새 토큰 쌍 발급 (Rotation)
    /// Validate, then issue a fresh pair; the validated token is destroyed
    pub async fn rotate(&self, presented: Option<&str>) -> Result<TokenPair, ApiError> {
        let user = self.validate(presented).await?;
        let tokens = self.issue(&user).await?;

        tracing::info!(user_id = user.id, "Refresh token rotated");
        Ok(tokens)
    }

    /// Refresh Token 제거 (이미 없어도 성공)
    /// Revoke the recorded refresh token; idempotent
    pub async fn revoke(&self, user_id: u64) -> Result<(), ApiError> {
        self.store
            .clear_refresh_token(user_id)
            .await
            .map_err(|e| ApiError::internal("Failed to logout user", format!("{:#}", e)))?;

        tracing::info!(user_id, "Refresh token revoked");
        Ok(())
    }
}
