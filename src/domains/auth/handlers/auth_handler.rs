use crate::domains::auth::models::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RefreshTokenRequest, RegisterInput,
    TokenPair, UpdateAccountRequest, UserResponse,
};
use crate::domains::auth::services::ProfileImage;
use crate::shared::errors::ApiError;
use crate::shared::middleware::auth::AuthenticatedUser;
use crate::shared::services::AppState;
use crate::shared::utils::cookie::{clear_cookie, get_cookie, set_cookie, ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME};
use crate::shared::utils::response::ApiResponse;
use crate::shared::utils::upload::save_multipart;
use axum::{
    extract::{Multipart, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};

fn token_cookies(tokens: &TokenPair) -> AppendHeaders<[(axum::http::HeaderName, String); 2]> {
    AppendHeaders([
        (SET_COOKIE, set_cookie(ACCESS_COOKIE_NAME, &tokens.access_token)),
        (SET_COOKIE, set_cookie(REFRESH_COOKIE_NAME, &tokens.refresh_token)),
    ])
}

fn cleared_cookies() -> AppendHeaders<[(axum::http::HeaderName, String); 2]> {
    AppendHeaders([
        (SET_COOKIE, clear_cookie(ACCESS_COOKIE_NAME)),
        (SET_COOKIE, clear_cookie(REFRESH_COOKIE_NAME)),
    ])
}

// 회원가입 핸들러 (multipart: username, fullname, email, password, avatar, coverImage)
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Missing field or avatar"),
        (status = 409, description = "Username or email already exists"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Users"
)]
pub async fn register(
    State(app_state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut form = save_multipart(multipart, &app_state.upload_temp_dir).await?;

    let input = RegisterInput {
        username: form.text("username"),
        fullname: form.text("fullname"),
        email: form.text("email"),
        password: form.text("password"),
        avatar: form.take_file("avatar"),
        cover_image: form.take_file("coverImage"),
    };

    let user = app_state.auth_state.account_service.register(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED, user, "User registered successfully")),
    ))
}

// 로그인 핸들러
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, sets accessToken/refreshToken cookies", body = LoginResponse),
        (status = 400, description = "Email missing or user does not exist"),
        (status = 401, description = "Invalid user credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Users"
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (user, tokens) = app_state.auth_state.account_service.login(request).await?;

    let cookies = token_cookies(&tokens);
    let body = LoginResponse {
        user,
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    };

    Ok((
        StatusCode::OK,
        cookies,
        Json(ApiResponse::ok(body, "User logged in successfully")),
    ))
}

/// 로그아웃 핸들러
/// Logout handler
#[utoipa::path(
    post,
    path = "/api/v1/users/logout",
    responses(
        (status = 200, description = "Logout successful, cookies cleared"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("BearerAuth" = [])),
    tag = "Users"
)]
pub async fn logout(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .auth_state
        .account_service
        .logout(authenticated_user.user_id)
        .await?;

    Ok((
        StatusCode::OK,
        cleared_cookies(),
        Json(ApiResponse::ok(serde_json::json!({}), "User logged out")),
    ))
}

/// 토큰 갱신 핸들러 (쿠키 우선, 없으면 body)
/// Refresh token handler
#[utoipa::path(
    post,
    path = "/api/v1/users/refresh-token",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Access token refreshed", body = TokenPair),
        (status = 401, description = "Missing, invalid, or superseded refresh token"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Users"
)]
pub async fn refresh_access_token(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<RefreshTokenRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let presented = get_cookie(&headers, REFRESH_COOKIE_NAME)
        .or_else(|| body.and_then(|Json(request)| request.refresh_token));

    let tokens = app_state
        .auth_state
        .account_service
        .refresh(presented.as_deref())
        .await?;

    Ok((
        StatusCode::OK,
        token_cookies(&tokens),
        Json(ApiResponse::ok(tokens, "Access token refreshed")),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed successfully"),
        (status = 400, description = "Invalid old password"),
        (status = 401, description = "Unauthorized")
    ),
    security(("BearerAuth" = [])),
    tag = "Users"
)]
pub async fn change_current_password(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .auth_state
        .account_service
        .change_password(authenticated_user.user_id, request)
        .await?;

    Ok(Json(ApiResponse::ok(serde_json::json!({}), "Password changed successfully")))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/current-user",
    responses(
        (status = 200, description = "Current user fetched successfully", body = UserResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("BearerAuth" = [])),
    tag = "Users"
)]
pub async fn get_current_user(authenticated_user: AuthenticatedUser) -> impl IntoResponse {
    Json(ApiResponse::ok(
        authenticated_user.user,
        "Current user fetched successfully",
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/update-account",
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account details updated successfully", body = UserResponse),
        (status = 400, description = "Missing field"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Email already in use")
    ),
    security(("BearerAuth" = [])),
    tag = "Users"
)]
pub async fn update_account_details(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(request): Json<UpdateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = app_state
        .auth_state
        .account_service
        .update_account_details(authenticated_user.user_id, request)
        .await?;

    Ok(Json(ApiResponse::ok(user, "Account details updated successfully")))
}

// 아바타 변경 핸들러 (multipart: avatar)
#[utoipa::path(
    patch,
    path = "/api/v1/users/avatar",
    responses(
        (status = 200, description = "Avatar updated successfully", body = UserResponse),
        (status = 400, description = "File missing or upload failed"),
        (status = 401, description = "Unauthorized")
    ),
    security(("BearerAuth" = [])),
    tag = "Users"
)]
pub async fn update_user_avatar(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut form = save_multipart(multipart, &app_state.upload_temp_dir).await?;

    let user = app_state
        .auth_state
        .account_service
        .update_profile_image(authenticated_user.user_id, ProfileImage::Avatar, form.take_file("avatar"))
        .await?;

    Ok(Json(ApiResponse::ok(user, "Avatar updated successfully")))
}

// 커버 이미지 변경 핸들러 (multipart: coverImage)
#[utoipa::path(
    patch,
    path = "/api/v1/users/cover-image",
    responses(
        (status = 200, description = "Cover image updated successfully", body = UserResponse),
        (status = 400, description = "File missing or upload failed"),
        (status = 401, description = "Unauthorized")
    ),
    security(("BearerAuth" = [])),
    tag = "Users"
)]
pub async fn update_user_cover_image(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut form = save_multipart(multipart, &app_state.upload_temp_dir).await?;

    let user = app_state
        .auth_state
        .account_service
        .update_profile_image(
            authenticated_user.user_id,
            ProfileImage::CoverImage,
            form.take_file("coverImage"),
        )
        .await?;

    Ok(Json(ApiResponse::ok(user, "Cover image updated successfully")))
}
