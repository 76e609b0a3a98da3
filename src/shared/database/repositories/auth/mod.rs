// =====================================================
// 사용자 저장소 인터페이스
// User Store Interface
// =====================================================
// Service 계층은 이 trait만 사용하여 사용자 레코드에 접근합니다.
//
// 구현체:
// - `UserRepository`: PostgreSQL (운영)
// - `MemoryUserStore`: 메모리 기반 (테스트용)
//
// 모든 update 메서드는 특정 필드만 갱신하는 targeted update 입니다.
// 레코드 전체를 다시 검증하지 않습니다.
// =====================================================

pub mod memory;
pub mod user_repository;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use crate::domains::auth::models::user::{NewUser, User};

pub use memory::MemoryUserStore;
pub use user_repository::UserRepository;

/// username / email 유니크 제약 위반
/// Returned (inside `anyhow::Error`) when a write hits the username or email unique constraint
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("username or email already taken")]
pub struct DuplicateUser;

/// 사용자 저장소
/// Persistent identity store
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, new_user: NewUser) -> Result<User>;

    async fn get_user_by_id(&self, id: u64) -> Result<Option<User>>;

    // 이메일로 사용자 조회 (로그인용)
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    // username 또는 email 이 일치하는 사용자 조회 (중복 확인용)
    async fn find_by_username_or_email(&self, username: &str, email: &str) -> Result<Option<User>>;

    /// Refresh Token 저장 (이전 값 덮어씀)
    /// Overwrite the recorded refresh token
    async fn set_refresh_token(&self, id: u64, refresh_token: &str) -> Result<()>;

    /// Refresh Token 제거 (이미 없어도 성공)
    /// Unset the recorded refresh token; no-op when already absent
    async fn clear_refresh_token(&self, id: u64) -> Result<()>;

    async fn update_password(&self, id: u64, password_hash: &str) -> Result<()>;

    async fn update_details(&self, id: u64, fullname: &str, email: &str) -> Result<Option<User>>;

    async fn update_avatar(&self, id: u64, avatar_url: &str) -> Result<Option<User>>;

    async fn update_cover_image(&self, id: u64, cover_image_url: &str) -> Result<Option<User>>;
}
