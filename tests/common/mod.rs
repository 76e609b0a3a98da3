// =====================================================
// 통합 테스트 공통 헬퍼
// =====================================================
// 목적: 전체 라우터를 메모리 저장소 + Mock 미디어 저장소로 구성하고
//       요청/응답 헬퍼를 제공
//
// 사용법:
// ```rust
// mod common;
// use common::*;
//
// #[tokio::test]
// async fn test_something() {
//     let app = TestApp::new();
//     let response = app.register_default().await;
// }
// ```
// =====================================================
#![allow(dead_code)]

use std::sync::Arc;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use user_api::routes::{create_app, HttpSettings};
use user_api::shared::clients::MockMediaStore;
use user_api::shared::config::JwtConfig;
use user_api::shared::database::MemoryUserStore;
use user_api::shared::services::AppState;

pub const BOUNDARY: &str = "X-TEST-BOUNDARY";
pub const USERS: &str = "/api/v1/users";

pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryUserStore>,
    pub media: Arc<MockMediaStore>,
    pub upload_dir: tempfile::TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub cookies: Vec<String>,
    pub body: Value,
}

impl TestResponse {
    /// Set-Cookie 헤더에서 쿠키 값 조회 (삭제된 쿠키는 빈 문자열)
    pub fn cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{}=", name);
        self.cookies
            .iter()
            .find(|c| c.starts_with(&prefix))
            .map(|c| c[prefix.len()..].split(';').next().unwrap_or_default().to_string())
    }
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        access_secret: "test-access-secret".to_string(),
        access_ttl_secs: 900,
        refresh_secret: "test-refresh-secret".to_string(),
        refresh_ttl_secs: 86400,
    }
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryUserStore::new());
        let media = Arc::new(MockMediaStore::new());
        let upload_dir = tempfile::tempdir().expect("Failed to create temp dir");

        let state = AppState::new(
            &jwt_config(),
            upload_dir.path().to_path_buf(),
            store.clone(),
            media.clone(),
        );
        let app = create_app(
            state,
            HttpSettings {
                cors_origin: None,
                max_upload_bytes: 10 * 1024 * 1024,
            },
        );

        Self {
            app,
            store,
            media,
            upload_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let cookies = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, cookies, body }
    }

    pub async fn post_json(&self, path: &str, json: Value, cookie: Option<&str>) -> TestResponse {
        self.send_json("POST", path, json, cookie).await
    }

    pub async fn send_json(
        &self,
        method: &str,
        path: &str,
        json: Value,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(format!("{}{}", USERS, path))
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        self.send(builder.body(Body::from(json.to_string())).unwrap()).await
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().uri(format!("{}{}", USERS, path));
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn send_multipart(
        &self,
        method: &str,
        path: &str,
        fields: &[(&str, &str)],
        files: &[(&str, &str)],
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(format!("{}{}", USERS, path))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            );
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let body = multipart_body(fields, files);
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    pub async fn register(&self, fields: &[(&str, &str)], files: &[(&str, &str)]) -> TestResponse {
        self.send_multipart("POST", "/register", fields, files, None).await
    }

    /// 기본 사용자 (ana / a@x.com / p1) 등록
    pub async fn register_default(&self) -> TestResponse {
        self.register(&default_fields(), &[("avatar", "avatar.png")]).await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.post_json(
            "/login",
            serde_json::json!({ "email": email, "password": password }),
            None,
        )
        .await
    }

    /// 등록 + 로그인 후 응답 반환
    pub async fn register_and_login(&self) -> TestResponse {
        let registered = self.register_default().await;
        assert_eq!(registered.status, StatusCode::CREATED);

        let logged_in = self.login("a@x.com", "p1").await;
        assert_eq!(logged_in.status, StatusCode::OK);
        logged_in
    }

    /// 업로드 임시 디렉터리에 남은 파일 수
    pub fn staged_file_count(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

pub fn default_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("username", "ana"),
        ("email", "a@x.com"),
        ("password", "p1"),
        ("fullname", "Ana"),
    ]
}

pub fn access_cookie(response: &TestResponse) -> String {
    format!("accessToken={}", response.cookie("accessToken").expect("access cookie"))
}

pub fn refresh_cookie(token: &str) -> String {
    format!("refreshToken={}", token)
}

fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }

    for (name, file_name) in files {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
                BOUNDARY, name, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"\x89PNG fake image bytes");
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
