// Routes module: 라우팅 설정
// 역할: 모든 도메인의 라우터를 조합
// Routes module: combines all domain routers

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use crate::docs::ApiDoc;
use crate::domains::auth::routes::create_auth_router;
use crate::shared::services::AppState;

/// Create main router (combines all domain routers)
/// 메인 라우터 생성 (모든 도메인 라우터 조합)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1/users", create_auth_router())
}

/// HTTP 레이어 설정
/// Layer settings applied around the router
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub cors_origin: Option<HeaderValue>,
    pub max_upload_bytes: usize,
}

/// 전체 애플리케이션 생성 (라우터 + Swagger + CORS + Trace)
/// Build the full application
pub fn create_app(app_state: AppState, settings: HttpSettings) -> Router {
    let mut app = Router::new()
        .merge(create_router())
        .merge(SwaggerUi::new("/api").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(settings.max_upload_bytes))
        .layer(TraceLayer::new_for_http());

    if let Some(origin) = settings.cors_origin {
        // 쿠키 인증을 위해 credentials 허용
        let cors = CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::OPTIONS,
            ])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                header::ACCEPT,
            ])
            .allow_credentials(true);
        app = app.layer(cors);
    }

    app.with_state(app_state)
}
