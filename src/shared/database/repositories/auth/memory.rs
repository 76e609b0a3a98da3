use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use crate::domains::auth::models::user::{NewUser, User};
use super::{DuplicateUser, UserStore};

/// 메모리 기반 사용자 저장소 (테스트용)
/// In-memory `UserStore` used by tests
///
/// username / email 유니크 제약은 PostgreSQL 과 동일하게 동작합니다.
/// 호출 횟수를 기록하므로 "저장소 호출 전에 실패" 같은 조건을 검증할 수 있습니다.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<u64, User>>,
    next_id: AtomicU64,
    calls: AtomicUsize,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 지금까지의 저장소 호출 횟수
    /// Number of store calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 원본 레코드 조회 (호출 횟수에 포함되지 않음)
    /// Raw record snapshot; not counted as a store call
    pub fn snapshot(&self, id: u64) -> Option<User> {
        self.users.read().get(&id).cloned()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn modify<F>(&self, id: u64, f: F) -> Option<User>
    where
        F: FnOnce(&mut User),
    {
        let mut users = self.users.write();
        let user = users.get_mut(&id)?;
        f(user);
        user.updated_at = Utc::now();
        Some(user.clone())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        self.record_call();
        let mut users = self.users.write();

        if users
            .values()
            .any(|u| u.username == new_user.username || u.email == new_user.email)
        {
            return Err(DuplicateUser.into());
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let user = User {
            id,
            username: new_user.username,
            email: new_user.email,
            fullname: new_user.fullname,
            password_hash: new_user.password_hash,
            avatar: new_user.avatar,
            cover_image: new_user.cover_image,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(id, user.clone());

        Ok(user)
    }

    async fn get_user_by_id(&self, id: u64) -> Result<Option<User>> {
        self.record_call();
        Ok(self.users.read().get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.record_call();
        Ok(self.users.read().values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username_or_email(&self, username: &str, email: &str) -> Result<Option<User>> {
        self.record_call();
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.username == username || u.email == email)
            .cloned())
    }

    async fn set_refresh_token(&self, id: u64, refresh_token: &str) -> Result<()> {
        self.record_call();
        match self.modify(id, |u| u.refresh_token = Some(refresh_token.to_string())) {
            Some(_) => Ok(()),
            None => bail!("User {} not found while storing refresh token", id),
        }
    }

    async fn clear_refresh_token(&self, id: u64) -> Result<()> {
        self.record_call();
        self.modify(id, |u| u.refresh_token = None);
        Ok(())
    }

    async fn update_password(&self, id: u64, password_hash: &str) -> Result<()> {
        self.record_call();
        match self.modify(id, |u| u.password_hash = password_hash.to_string()) {
            Some(_) => Ok(()),
            None => bail!("User {} not found while updating password", id),
        }
    }

    async fn update_details(&self, id: u64, fullname: &str, email: &str) -> Result<Option<User>> {
        self.record_call();
        {
            let users = self.users.read();
            if users.values().any(|u| u.id != id && u.email == email) {
                return Err(DuplicateUser.into());
            }
        }
        Ok(self.modify(id, |u| {
            u.fullname = fullname.to_string();
            u.email = email.to_string();
        }))
    }

    async fn update_avatar(&self, id: u64, avatar_url: &str) -> Result<Option<User>> {
        self.record_call();
        Ok(self.modify(id, |u| u.avatar = avatar_url.to_string()))
    }

    async fn update_cover_image(&self, id: u64, cover_image_url: &str) -> Result<Option<User>> {
        self.record_call();
        Ok(self.modify(id, |u| u.cover_image = cover_image_url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            fullname: "Test".to_string(),
            password_hash: "hash".to_string(),
            avatar: "https://cdn/avatar.png".to_string(),
            cover_image: String::new(),
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_username_or_email() {
        let store = MemoryUserStore::new();
        store.create_user(new_user("ana", "a@x.com")).await.unwrap();

        let err = store.create_user(new_user("ana", "b@x.com")).await.unwrap_err();
        assert!(err.is::<DuplicateUser>());
        let err = store.create_user(new_user("bob", "a@x.com")).await.unwrap_err();
        assert!(err.is::<DuplicateUser>());
        assert!(store.create_user(new_user("bob", "b@x.com")).await.is_ok());
    }

    #[tokio::test]
    async fn clear_refresh_token_is_idempotent() {
        let store = MemoryUserStore::new();
        let user = store.create_user(new_user("ana", "a@x.com")).await.unwrap();

        store.set_refresh_token(user.id, "tok").await.unwrap();
        assert_eq!(store.snapshot(user.id).unwrap().refresh_token.as_deref(), Some("tok"));

        store.clear_refresh_token(user.id).await.unwrap();
        store.clear_refresh_token(user.id).await.unwrap();
        assert!(store.snapshot(user.id).unwrap().refresh_token.is_none());
    }
}
