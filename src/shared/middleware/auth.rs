use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use crate::domains::auth::models::UserResponse;
use crate::shared::errors::ApiError;
use crate::shared::services::AppState;
use crate::shared::utils::cookie::{get_cookie, ACCESS_COOKIE_NAME};

/// 인증된 사용자 정보 (Access Token 에서 추출 후 DB 조회)
/// Authenticated user, resolved from the access token
///
/// 사용법:
/// ```rust,ignore
/// pub async fn get_current_user(
///     authenticated_user: AuthenticatedUser,  // <- 이렇게 사용!
/// ) -> Result<...> {
///     let user_id = authenticated_user.user_id;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: u64,
    pub user: UserResponse,
}

/// 쿠키(accessToken) 우선, 없으면 "Authorization: Bearer <token>"
fn extract_access_token(parts: &Parts) -> Option<String> {
    if let Some(token) = get_cookie(&parts.headers, ACCESS_COOKIE_NAME) {
        return Some(token);
    }

    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // 1. 토큰 추출
        let token = extract_access_token(parts)
            .ok_or_else(|| ApiError::unauthorized("Unauthorized request"))?;

        // 2. JWT 검증
        let claims = state
            .auth_state
            .jwt_service
            .verify_access_token(&token)
            .map_err(|e| ApiError::unauthorized_with_detail("Invalid Access Token", e.to_string()))?;

        // 3. 사용자 조회 (삭제된 사용자의 토큰 거부)
        let user = state
            .auth_state
            .user_store
            .get_user_by_id(claims.user_id)
            .await
            .map_err(|e| ApiError::internal("Failed to fetch user", format!("{:#}", e)))?
            .ok_or_else(|| ApiError::unauthorized("Invalid Access Token"))?;

        Ok(AuthenticatedUser {
            user_id: user.id,
            user: user.into(),
        })
    }
}
