// 인증 쿠키 헬퍼
// Auth cookie helpers (HttpOnly + Secure, session lifetime)
use axum::http::{header, HeaderMap};

pub const ACCESS_COOKIE_NAME: &str = "accessToken";
pub const REFRESH_COOKIE_NAME: &str = "refreshToken";

const COOKIE_OPTIONS: &str = "HttpOnly; Secure; Path=/";

/// 요청 헤더에서 쿠키 값 조회
/// Look up a cookie value in the request headers
pub fn get_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// Set-Cookie 값 생성
pub fn set_cookie(name: &str, value: &str) -> String {
    format!("{}={}; {}", name, value, COOKIE_OPTIONS)
}

/// 쿠키 삭제용 Set-Cookie 값 생성
pub fn clear_cookie(name: &str) -> String {
    format!(
        "{}=; {}; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
        name, COOKIE_OPTIONS
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_cookie_among_several() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; refreshToken=abc.def.ghi; accessToken=xyz"),
        );

        assert_eq!(get_cookie(&headers, REFRESH_COOKIE_NAME).as_deref(), Some("abc.def.ghi"));
        assert_eq!(get_cookie(&headers, ACCESS_COOKIE_NAME).as_deref(), Some("xyz"));
        assert_eq!(get_cookie(&headers, "missing"), None);
    }

    #[test]
    fn empty_cookie_counts_as_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("refreshToken="));

        assert_eq!(get_cookie(&headers, REFRESH_COOKIE_NAME), None);
    }

    #[test]
    fn cookies_are_http_only_and_secure() {
        let set = set_cookie(ACCESS_COOKIE_NAME, "tok");
        assert!(set.starts_with("accessToken=tok;"));
        assert!(set.contains("HttpOnly") && set.contains("Secure"));

        let cleared = clear_cookie(REFRESH_COOKIE_NAME);
        assert!(cleared.starts_with("refreshToken=;"));
        assert!(cleared.contains("Max-Age=0"));
    }
}
