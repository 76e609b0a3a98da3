use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use crate::domains::auth::models::user::UserResponse;
use crate::shared::utils::upload::LocalFile;

// 회원가입 입력 (multipart 폼에서 파싱됨)
// Registration input parsed from the multipart form
#[derive(Debug, Default)]
pub struct RegisterInput {
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub password: String,
    /// 아바타 이미지 (필수)
    pub avatar: Option<LocalFile>,
    /// 커버 이미지 (선택)
    pub cover_image: Option<LocalFile>,
}

// 로그인 요청 모델
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = LoginRequest)]
pub struct LoginRequest {
    /// Email address
    /// 이메일 주소
    #[schema(example = "a@x.com")]
    #[serde(default)]
    pub email: Option<String>,

    /// Username (accepted but not used for lookup)
    /// 사용자명 (받기만 하고 조회에는 사용하지 않음)
    #[schema(example = "ana")]
    #[serde(default)]
    pub username: Option<String>,

    /// Password
    /// 비밀번호
    #[schema(example = "p1")]
    #[serde(default)]
    pub password: String,
}

// 로그인 응답 데이터
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = LoginResponse)]
pub struct LoginResponse {
    /// User information (without password / refresh token)
    /// 사용자 정보 (비밀번호, Refresh Token 제외)
    pub user: UserResponse,

    /// JWT Access Token (짧은 수명)
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,

    /// JWT Refresh Token (긴 수명, DB에 저장)
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub refresh_token: String,
}

/// Access / Refresh Token 쌍
/// Access/refresh token pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = TokenPair)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

// 토큰 갱신 요청 모델 (쿠키가 없을 때 body 로 전달)
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = RefreshTokenRequest)]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

// 비밀번호 변경 요청 모델
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = ChangePasswordRequest)]
pub struct ChangePasswordRequest {
    #[schema(example = "p1")]
    #[serde(default)]
    pub old_password: String,

    #[schema(example = "p2")]
    #[serde(default)]
    pub new_password: String,
}

// 프로필 수정 요청 모델
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = UpdateAccountRequest)]
pub struct UpdateAccountRequest {
    #[schema(example = "Ana Maria")]
    #[serde(default)]
    pub fullname: Option<String>,

    #[schema(example = "ana@x.com")]
    #[serde(default)]
    pub email: Option<String>,
}
