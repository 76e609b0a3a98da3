// Application configuration
// 역할: 환경 변수(.env 포함)에서 서버 설정을 읽어옴
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_ACCESS_TOKEN_EXPIRY: &str = "1d";
const DEFAULT_REFRESH_TOKEN_EXPIRY: &str = "10d";
const DEFAULT_UPLOAD_TEMP_DIR: &str = "./public/temp";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// JWT 설정 (Access / Refresh 각각 별도의 secret 과 만료 시간)
/// JWT configuration: separate secret and TTL per token kind
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    /// Access Token 만료 시간 (초)
    pub access_ttl_secs: i64,
    pub refresh_secret: String,
    /// Refresh Token 만료 시간 (초)
    pub refresh_ttl_secs: i64,
}

/// Cloudinary 설정
/// Cloudinary credentials
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub cors_origin: String,
    pub jwt: JwtConfig,
    pub cloudinary: CloudinaryConfig,
    /// 업로드 파일 임시 저장 경로
    /// Local staging directory for uploaded files
    pub upload_temp_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// 프로세스 환경 변수에서 설정 로드 (.env 파일이 있으면 먼저 로드)
    /// Load configuration from the process environment (reads `.env` first if present)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 lookup 함수로 설정 로드
    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => bail!("Missing required environment variable: {}", key),
            }
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = match lookup("PORT") {
            Some(p) => p.parse::<u16>().with_context(|| format!("Invalid PORT: {}", p))?,
            None => DEFAULT_PORT,
        };

        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(v) => v
                .parse::<usize>()
                .with_context(|| format!("Invalid MAX_UPLOAD_BYTES: {}", v))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .with_context(|| format!("Invalid DATABASE_MAX_CONNECTIONS: {}", v))?,
            None => DEFAULT_DATABASE_MAX_CONNECTIONS,
        };

        let access_expiry = or_default("ACCESS_TOKEN_EXPIRY", DEFAULT_ACCESS_TOKEN_EXPIRY);
        let refresh_expiry = or_default("REFRESH_TOKEN_EXPIRY", DEFAULT_REFRESH_TOKEN_EXPIRY);

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections,
            port,
            cors_origin: or_default("CORS_ORIGIN", DEFAULT_CORS_ORIGIN),
            jwt: JwtConfig {
                access_secret: required("ACCESS_TOKEN_SECRET")?,
                access_ttl_secs: parse_duration_secs(&access_expiry)
                    .context("Invalid ACCESS_TOKEN_EXPIRY")?,
                refresh_secret: required("REFRESH_TOKEN_SECRET")?,
                refresh_ttl_secs: parse_duration_secs(&refresh_expiry)
                    .context("Invalid REFRESH_TOKEN_EXPIRY")?,
            },
            cloudinary: CloudinaryConfig {
                cloud_name: required("CLOUDINARY_CLOUD_NAME")?,
                api_key: required("CLOUDINARY_API_KEY")?,
                api_secret: required("CLOUDINARY_API_SECRET")?,
            },
            upload_temp_dir: PathBuf::from(or_default("UPLOAD_TEMP_DIR", DEFAULT_UPLOAD_TEMP_DIR)),
            max_upload_bytes,
        })
    }
}

/// "15m", "1d", "3600" 같은 만료 표기를 초 단위로 변환
/// Parse an expiry like `15m`, `12h`, `10d` or plain seconds
pub fn parse_duration_secs(value: &str) -> Result<i64> {
    let value = value.trim();
    if value.is_empty() {
        bail!("empty duration");
    }

    let (number, multiplier) = match value.char_indices().last() {
        Some((idx, 's')) => (&value[..idx], 1),
        Some((idx, 'm')) => (&value[..idx], 60),
        Some((idx, 'h')) => (&value[..idx], 3600),
        Some((idx, 'd')) => (&value[..idx], 86400),
        _ => (value, 1),
    };

    let number: i64 = number
        .trim()
        .parse()
        .with_context(|| format!("invalid duration: {}", value))?;

    if number <= 0 {
        bail!("duration must be positive: {}", value);
    }

    number
        .checked_mul(multiplier)
        .with_context(|| format!("duration is too large: {}", value))
}
