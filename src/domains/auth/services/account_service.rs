use std::sync::Arc;
use crate::domains::auth::models::{
    ChangePasswordRequest, LoginRequest, NewUser, RegisterInput, TokenPair, UpdateAccountRequest,
    User, UserResponse,
};
use crate::domains::auth::services::SessionTokenManager;
use crate::shared::clients::MediaStore;
use crate::shared::database::{DuplicateUser, UserStore};
use crate::shared::errors::ApiError;
use crate::shared::utils::upload::LocalFile;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{rand_core::OsRng, SaltString};

/// 업로드 대상 이미지 종류
/// Which profile image is being replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileImage {
    Avatar,
    CoverImage,
}

impl ProfileImage {
    fn label(self) -> &'static str {
        match self {
            ProfileImage::Avatar => "avatar",
            ProfileImage::CoverImage => "cover image",
        }
    }
}

// 계정 서비스
// AccountService: registration, login and profile business logic
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn UserStore>,
    media: Arc<dyn MediaStore>,
    token_manager: SessionTokenManager,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn UserStore>,
        media: Arc<dyn MediaStore>,
        token_manager: SessionTokenManager,
    ) -> Self {
        Self {
            store,
            media,
            token_manager,
        }
    }

    // 회원가입 (비즈니스 로직)
    pub async fn register(&self, input: RegisterInput) -> Result<UserResponse, ApiError> {
        // 1. 필수 값 확인 (저장소/업로드 호출 전에)
        if [&input.fullname, &input.email, &input.username, &input.password]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(ApiError::bad_request("All fields are required"));
        }

        let avatar_file = input
            .avatar
            .as_ref()
            .ok_or_else(|| ApiError::bad_request("Avatar file is required"))?;

        let username = input.username.trim().to_lowercase();
        let email = input.email.trim().to_string();

        // 2. username / email 중복 확인
        let existing = self
            .store
            .find_by_username_or_email(&username, &email)
            .await
            .map_err(|e| ApiError::internal("Failed to check existing user", format!("{:#}", e)))?;

        if existing.is_some() {
            return Err(ApiError::Conflict(
                "User with email or username already exists".to_string(),
            ));
        }

        // 3. 이미지 업로드
        let avatar = self
            .upload(avatar_file)
            .await
            .ok_or_else(|| ApiError::bad_request("Error while uploading avatar"))?;

        // 커버 이미지는 선택사항: 없거나 업로드 실패 시 빈 값
        let cover_image = match &input.cover_image {
            Some(file) => match self.upload(file).await {
                Some(url) => url,
                None => {
                    tracing::warn!(%username, "Cover image upload failed, registering without it");
                    String::new()
                }
            },
            None => String::new(),
        };

        // 4. 비밀번호 해싱 후 생성
        let password_hash = Self::hash_password(&input.password)?;

        let created = self
            .store
            .create_user(NewUser {
                username,
                email,
                fullname: input.fullname.trim().to_string(),
                password_hash,
                avatar,
                cover_image,
            })
            .await
            .map_err(|e| {
                store_write_error(
                    e,
                    "User with email or username already exists",
                    "Something went wrong while registering the user",
                )
            })?;

        // 5. 생성된 레코드 다시 조회
        let user = self
            .store
            .get_user_by_id(created.id)
            .await
            .map_err(|e| ApiError::internal("Something went wrong while registering the user", format!("{:#}", e)))?
            .ok_or_else(|| {
                ApiError::internal(
                    "Something went wrong while registering the user",
                    format!("user {} missing right after insert", created.id),
                )
            })?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user.into())
    }

    // 로그인 (비즈니스 로직)
    // Returns: (User, TokenPair)
    pub async fn login(&self, request: LoginRequest) -> Result<(UserResponse, TokenPair), ApiError> {
        let email = match request.email.as_deref().map(str::trim) {
            Some(e) if !e.is_empty() => e.to_string(),
            _ => return Err(ApiError::bad_request("Email is required")),
        };

        if let Some(username) = &request.username {
            // username 은 받지만 조회는 email 로만 함
            tracing::debug!(%username, "Ignoring username on login, looking up by email");
        }

        // 1. 이메일로 사용자 조회
        let user = self
            .store
            .get_user_by_email(&email)
            .await
            .map_err(|e| ApiError::internal("Failed to fetch user", format!("{:#}", e)))?
            .ok_or_else(|| ApiError::bad_request("User does not exist"))?;

        // 2. 비밀번호 검증
        if !Self::verify_password(&request.password, &user.password_hash)? {
            return Err(ApiError::unauthorized("Invalid user credentials"));
        }

        // 3. 토큰 발급 (기존 Refresh Token 덮어씀)
        let tokens = self.token_manager.issue(&user).await?;

        tracing::info!(user_id = user.id, "User logged in");
        Ok((user.into(), tokens))
    }

    /// 로그아웃 - Refresh Token 제거
    /// Logout - unset the recorded refresh token
    pub async fn logout(&self, user_id: u64) -> Result<(), ApiError> {
        self.token_manager.revoke(user_id).await
    }

    /// 토큰 갱신 (Rotation)
    pub async fn refresh(&self, presented: Option<&str>) -> Result<TokenPair, ApiError> {
        self.token_manager.rotate(presented).await
    }

    pub async fn change_password(
        &self,
        user_id: u64,
        request: ChangePasswordRequest,
    ) -> Result<(), ApiError> {
        if request.old_password.is_empty() || request.new_password.trim().is_empty() {
            return Err(ApiError::bad_request("Old and new password are required"));
        }

        let user = self.fetch_user(user_id).await?;

        if !Self::verify_password(&request.old_password, &user.password_hash)? {
            return Err(ApiError::bad_request("Invalid old password"));
        }

        let password_hash = Self::hash_password(&request.new_password)?;
        self.store
            .update_password(user_id, &password_hash)
            .await
            .map_err(|e| ApiError::internal("Failed to change password", format!("{:#}", e)))?;

        tracing::info!(user_id, "Password changed");
        Ok(())
    }

    pub async fn get_user_info(&self, user_id: u64) -> Result<UserResponse, ApiError> {
        Ok(self.fetch_user(user_id).await?.into())
    }

    pub async fn update_account_details(
        &self,
        user_id: u64,
        request: UpdateAccountRequest,
    ) -> Result<UserResponse, ApiError> {
        let (fullname, email) = match (request.fullname.as_deref(), request.email.as_deref()) {
            (Some(f), Some(e)) if !f.trim().is_empty() && !e.trim().is_empty() => {
                (f.trim().to_string(), e.trim().to_string())
            }
            _ => return Err(ApiError::bad_request("All fields are required")),
        };

        // 다른 계정이 이미 사용 중인 이메일인지 확인
        let taken = self
            .store
            .get_user_by_email(&email)
            .await
            .map_err(|e| ApiError::internal("Failed to fetch user", format!("{:#}", e)))?
            .is_some_and(|other| other.id != user_id);
        if taken {
            return Err(ApiError::Conflict("Email is already in use".to_string()));
        }

        let user = self
            .store
            .update_details(user_id, &fullname, &email)
            .await
            .map_err(|e| store_write_error(e, "Email is already in use", "Failed to update account details"))?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(user.into())
    }

    /// 아바타 / 커버 이미지 교체 (업로드 먼저, 성공 시 URL 저장)
    /// Replace a profile image: upload first, then store the new URL
    pub async fn update_profile_image(
        &self,
        user_id: u64,
        kind: ProfileImage,
        file: Option<LocalFile>,
    ) -> Result<UserResponse, ApiError> {
        let label = kind.label();
        let file = file.ok_or_else(|| ApiError::bad_request(format!("{} file is missing", capitalize(label))))?;

        let url = self
            .upload(&file)
            .await
            .ok_or_else(|| ApiError::bad_request(format!("Error while uploading {}", label)))?;

        let updated = match kind {
            ProfileImage::Avatar => self.store.update_avatar(user_id, &url).await,
            ProfileImage::CoverImage => self.store.update_cover_image(user_id, &url).await,
        };

        let user = updated
            .map_err(|e| ApiError::internal(format!("Failed to update {}", label), format!("{:#}", e)))?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        tracing::info!(user_id, image = label, "Profile image updated");
        Ok(user.into())
    }

    async fn fetch_user(&self, user_id: u64) -> Result<User, ApiError> {
        self.store
            .get_user_by_id(user_id)
            .await
            .map_err(|e| ApiError::internal("Failed to fetch user", format!("{:#}", e)))?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    // 업로드 실패는 None (호출자가 의미를 결정)
    async fn upload(&self, file: &LocalFile) -> Option<String> {
        match self.media.upload(file.path()).await {
            Ok(media) => Some(media.url),
            Err(e) => {
                let detail = format!("{:#}", e);
                tracing::warn!(file = %file.original_name(), error = %detail, "Media upload failed");
                None
            }
        }
    }

    fn hash_password(password: &str) -> Result<String, ApiError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ApiError::internal("Failed to hash password", e))?
            .to_string();

        Ok(password_hash)
    }

    fn verify_password(password: &str, password_hash: &str) -> Result<bool, ApiError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| ApiError::internal("Failed to verify password", e))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

// 중복 확인과 쓰기 사이에 다른 요청이 먼저 쓴 경우에도 409
fn store_write_error(e: anyhow::Error, conflict_message: &str, internal_message: &str) -> ApiError {
    if e.is::<DuplicateUser>() {
        ApiError::Conflict(conflict_message.to_string())
    } else {
        ApiError::internal(internal_message, format!("{:#}", e))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use crate::domains::auth::services::JwtService;
    use crate::shared::clients::MockMediaStore;
    use crate::shared::config::JwtConfig;
    use crate::shared::database::MemoryUserStore;

    struct Fixture {
        service: AccountService,
        store: Arc<MemoryUserStore>,
        media: Arc<MockMediaStore>,
        dir: tempfile::TempDir,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryUserStore::new());
        let media = Arc::new(MockMediaStore::new());
        let jwt = JwtService::new(&JwtConfig {
            access_secret: "access".to_string(),
            access_ttl_secs: 60,
            refresh_secret: "refresh".to_string(),
            refresh_ttl_secs: 3600,
        });
        let token_manager = SessionTokenManager::new(store.clone(), jwt);
        let service = AccountService::new(store.clone(), media.clone(), token_manager);

        Fixture {
            service,
            store,
            media,
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn file(dir: &tempfile::TempDir, name: &str) -> LocalFile {
        let path = dir.path().join(name);
        std::fs::write(&path, b"image-bytes").unwrap();
        LocalFile::new(path, name)
    }

    fn input(f: &Fixture) -> RegisterInput {
        RegisterInput {
            username: "Ana".to_string(),
            fullname: "Ana".to_string(),
            email: "a@x.com".to_string(),
            password: "p1".to_string(),
            avatar: Some(file(&f.dir, "avatar.png")),
            cover_image: None,
        }
    }

    #[tokio::test]
    async fn register_lowercases_username_and_defaults_cover() {
        let f = fixture();

        let user = f.service.register(input(&f)).await.unwrap();

        assert_eq!(user.username, "ana");
        assert_eq!(user.avatar, "https://media.test/avatar.png");
        assert_eq!(user.cover_image, "");
        let stored = f.store.snapshot(user.id).unwrap();
        assert_ne!(stored.password_hash, "p1");
        assert!(stored.refresh_token.is_none());
    }

    #[tokio::test]
    async fn blank_field_fails_before_any_collaborator_call() {
        let f = fixture();
        let mut input = input(&f);
        input.fullname = "   ".to_string();

        let err = f.service.register(input).await.unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(f.store.call_count(), 0);
        assert_eq!(f.media.upload_count(), 0);
    }

    #[tokio::test]
    async fn missing_avatar_is_client_fault() {
        let f = fixture();
        let mut input = input(&f);
        input.avatar = None;

        let err = f.service.register(input).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(f.media.upload_count(), 0);
    }

    #[tokio::test]
    async fn duplicate_username_is_conflict() {
        let f = fixture();
        f.service.register(input(&f)).await.unwrap();

        let mut again = input(&f);
        again.email = "other@x.com".to_string();
        let err = f.service.register(again).await.unwrap_err();

        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    // 중복 확인이 항상 "없음" 을 돌려주는 저장소 (동시 가입에서 확인과 쓰기 사이에 끼어든 경우)
    struct StaleCheckStore(MemoryUserStore);

    #[async_trait::async_trait]
    impl UserStore for StaleCheckStore {
        async fn create_user(&self, new_user: NewUser) -> anyhow::Result<User> {
            self.0.create_user(new_user).await
        }
        async fn get_user_by_id(&self, id: u64) -> anyhow::Result<Option<User>> {
            self.0.get_user_by_id(id).await
        }
        async fn get_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
            self.0.get_user_by_email(email).await
        }
        async fn find_by_username_or_email(&self, _username: &str, _email: &str) -> anyhow::Result<Option<User>> {
            Ok(None)
        }
        async fn set_refresh_token(&self, id: u64, token: &str) -> anyhow::Result<()> {
            self.0.set_refresh_token(id, token).await
        }
        async fn clear_refresh_token(&self, id: u64) -> anyhow::Result<()> {
            self.0.clear_refresh_token(id).await
        }
        async fn update_password(&self, id: u64, hash: &str) -> anyhow::Result<()> {
            self.0.update_password(id, hash).await
        }
        async fn update_details(&self, id: u64, fullname: &str, email: &str) -> anyhow::Result<Option<User>> {
            self.0.update_details(id, fullname, email).await
        }
        async fn update_avatar(&self, id: u64, url: &str) -> anyhow::Result<Option<User>> {
            self.0.update_avatar(id, url).await
        }
        async fn update_cover_image(&self, id: u64, url: &str) -> anyhow::Result<Option<User>> {
            self.0.update_cover_image(id, url).await
        }
    }

    #[tokio::test]
    async fn insert_conflict_after_stale_check_is_conflict() {
        let f = fixture();
        let store: Arc<dyn UserStore> = Arc::new(StaleCheckStore(MemoryUserStore::new()));
        let jwt = JwtService::new(&JwtConfig {
            access_secret: "access".to_string(),
            access_ttl_secs: 60,
            refresh_secret: "refresh".to_string(),
            refresh_ttl_secs: 3600,
        });
        let service = AccountService::new(
            store.clone(),
            f.media.clone(),
            SessionTokenManager::new(store, jwt),
        );

        service.register(input(&f)).await.unwrap();
        let err = service.register(input(&f)).await.unwrap_err();

        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "User with email or username already exists");
    }

    #[test]
    fn store_write_error_keeps_other_failures_internal() {
        let err = store_write_error(anyhow::anyhow!("connection reset"), "taken", "Failed");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = store_write_error(DuplicateUser.into(), "taken", "Failed");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn avatar_upload_failure_is_client_fault() {
        let f = fixture();
        f.media.fail_uploads(true);

        let err = f.service.register(input(&f)).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Error while uploading avatar");
    }

    #[tokio::test]
    async fn login_checks_password() {
        let f = fixture();
        f.service.register(input(&f)).await.unwrap();

        let wrong = LoginRequest {
            email: Some("a@x.com".to_string()),
            username: None,
            password: "wrong".to_string(),
        };
        let err = f.service.login(wrong).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let right = LoginRequest {
            email: Some("a@x.com".to_string()),
            username: None,
            password: "p1".to_string(),
        };
        let (user, tokens) = f.service.login(right).await.unwrap();
        let stored = f.store.snapshot(user.id).unwrap();
        assert_eq!(stored.refresh_token, Some(tokens.refresh_token));
    }

    #[tokio::test]
    async fn login_without_email_is_bad_request() {
        let f = fixture();

        let err = f
            .service
            .login(LoginRequest {
                email: None,
                username: Some("ana".to_string()),
                password: "p1".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Email is required");
        assert_eq!(f.store.call_count(), 0);
    }

    #[tokio::test]
    async fn change_password_requires_old_password() {
        let f = fixture();
        let user = f.service.register(input(&f)).await.unwrap();

        let err = f
            .service
            .change_password(
                user.id,
                ChangePasswordRequest {
                    old_password: "nope".to_string(),
                    new_password: "p2".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid old password");

        f.service
            .change_password(
                user.id,
                ChangePasswordRequest {
                    old_password: "p1".to_string(),
                    new_password: "p2".to_string(),
                },
            )
            .await
            .unwrap();

        let login = LoginRequest {
            email: Some("a@x.com".to_string()),
            username: None,
            password: "p2".to_string(),
        };
        assert!(f.service.login(login).await.is_ok());
    }

    #[tokio::test]
    async fn update_details_rejects_taken_email() {
        let f = fixture();
        let ana = f.service.register(input(&f)).await.unwrap();

        let mut bob = input(&f);
        bob.username = "bob".to_string();
        bob.email = "b@x.com".to_string();
        f.service.register(bob).await.unwrap();

        let err = f
            .service
            .update_account_details(
                ana.id,
                UpdateAccountRequest {
                    fullname: Some("Ana".to_string()),
                    email: Some("b@x.com".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn update_cover_image_uploads_then_stores_url() {
        let f = fixture();
        let user = f.service.register(input(&f)).await.unwrap();

        let updated = f
            .service
            .update_profile_image(user.id, ProfileImage::CoverImage, Some(file(&f.dir, "cover.jpg")))
            .await
            .unwrap();
        assert_eq!(updated.cover_image, "https://media.test/cover.jpg");

        let err = f
            .service
            .update_profile_image(user.id, ProfileImage::Avatar, None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Avatar file is missing");
    }
}
