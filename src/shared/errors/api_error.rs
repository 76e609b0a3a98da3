use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API 에러 (클라이언트 오류 / 서버 오류)
/// API errors, split into client faults (4xx) and server faults (5xx)
#[derive(Error, Debug)]
pub enum ApiError {
    /// 잘못된 요청 (필수 값 누락 등)
    /// Missing or invalid input
    #[error("{0}")]
    BadRequest(String),

    /// 인증 실패. `detail` 은 보조 정보로만 노출됨
    /// Authorization failure; `detail` is surfaced only as supplementary info
    #[error("{message}")]
    Unauthorized {
        message: String,
        detail: Option<String>,
    },

    /// 리소스를 찾을 수 없음
    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// 중복 (username / email)
    /// Duplicate username or email
    #[error("{0}")]
    Conflict(String),

    /// 내부 서버 에러. `detail` 은 로그에만 남고 응답에는 포함되지 않음
    /// Internal server error; `detail` is logged, never sent to the client
    #[error("{message}")]
    Internal { message: String, detail: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
            detail: None,
        }
    }

    pub fn unauthorized_with_detail(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
            detail: Some(detail.into()),
        }
    }

    /// 협력자(DB, 외부 API) 실패를 서버 에러로 변환
    /// Wrap a collaborator failure as a server fault with a public message
    pub fn internal(message: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Internal {
            message: message.into(),
            detail: err.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_client_fault(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// ApiError를 HTTP 응답으로 변환
impl From<ApiError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: ApiError) -> Self {
        let status = err.status_code();
        if err.is_client_fault() {
            tracing::debug!(status = status.as_u16(), message = %err, "Request rejected");
        }

        let errors: Vec<String> = match &err {
            ApiError::Unauthorized {
                detail: Some(detail),
                ..
            } => vec![detail.clone()],
            ApiError::Internal { message, detail } => {
                tracing::error!(%detail, "{}", message);
                Vec::new()
            }
            _ => Vec::new(),
        };

        (
            status,
            Json(json!({
                "statusCode": status.as_u16(),
                "data": null,
                "message": err.to_string(),
                "success": false,
                "errors": errors,
            })),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        <(StatusCode, Json<serde_json::Value>)>::from(self).into_response()
    }
}
