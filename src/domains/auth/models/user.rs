use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 사용자 모델 (DB 레코드 그대로)
/// User record as stored; never serialized to clients directly
#[derive(Debug, Clone)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub password_hash: String,
    pub avatar: String,
    /// 커버 이미지 URL (없으면 빈 문자열)
    pub cover_image: String,
    /// 현재 유효한 Refresh Token (없으면 None)
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 사용자 생성 요청 (해싱/업로드 완료 후)
/// Data for inserting a new user (password already hashed, images uploaded)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub password_hash: String,
    pub avatar: String,
    pub cover_image: String,
}

/// 사용자 응답 모델 (비밀번호, Refresh Token 제외)
/// Public user projection (password hash and refresh token stripped)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "ana")]
    pub username: String,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = "Ana")]
    pub fullname: String,
    #[schema(example = "https://res.cloudinary.com/demo/image/upload/avatar.png")]
    pub avatar: String,
    #[schema(example = "")]
    pub cover_image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            fullname: user.fullname,
            avatar: user.avatar,
            cover_image: user.cover_image,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
