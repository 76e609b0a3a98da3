// Auth domain routes
// 사용자 계정 라우터
use axum::{routing::{get, patch, post}, Router};
use crate::domains::auth::handlers::auth_handler;
use crate::shared::services::AppState;

/// Create user account router
/// 사용자 계정 라우터 생성
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth_handler::register))
        .route("/login", post(auth_handler::login))
        .route("/refresh-token", post(auth_handler::refresh_access_token))
        // 인증 필요 (AuthenticatedUser)
        .route("/logout", post(auth_handler::logout))
        .route("/change-password", post(auth_handler::change_current_password))
        .route("/current-user", get(auth_handler::get_current_user))
        .route("/update-account", patch(auth_handler::update_account_details))
        .route("/avatar", patch(auth_handler::update_user_avatar))
        .route("/cover-image", patch(auth_handler::update_user_cover_image))
}
