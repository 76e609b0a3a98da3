use utoipa::OpenApi;
use crate::domains::auth::models::*;

// OpenAPI 스키마 정의: Swagger 문서 자동 생성
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::domains::auth::handlers::auth_handler::register,
        crate::domains::auth::handlers::auth_handler::login,
        crate::domains::auth::handlers::auth_handler::logout,
        crate::domains::auth::handlers::auth_handler::refresh_access_token,
        crate::domains::auth::handlers::auth_handler::change_current_password,
        crate::domains::auth::handlers::auth_handler::get_current_user,
        crate::domains::auth::handlers::auth_handler::update_account_details,
        crate::domains::auth::handlers::auth_handler::update_user_avatar,
        crate::domains::auth::handlers::auth_handler::update_user_cover_image
    ),
    components(schemas(
        UserResponse,
        LoginRequest,
        LoginResponse,
        TokenPair,
        RefreshTokenRequest,
        ChangePasswordRequest,
        UpdateAccountRequest
    )),
    modifiers(
        &SecurityAddon
    ),
    tags(
        (name = "Users", description = "User account and session endpoints")
    ),
    info(
        title = "User Account API",
        description = "Registration, login and JWT session management",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

// Security scheme 정의: Swagger UI에서 "Authorize" 버튼 추가
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
