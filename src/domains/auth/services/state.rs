// Auth domain state
// 인증 도메인 상태
use std::sync::Arc;
use crate::domains::auth::services::{AccountService, JwtService, SessionTokenManager};
use crate::shared::clients::MediaStore;
use crate::shared::database::UserStore;

/// Auth domain state
/// 인증 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct AuthState {
    pub account_service: AccountService,
    pub jwt_service: JwtService,
    /// Access Token 검증 후 사용자 조회용
    pub user_store: Arc<dyn UserStore>,
}

impl AuthState {
    /// AuthState 생성 (저장소, 미디어 저장소, JWT 서비스 주입)
    pub fn new(
        user_store: Arc<dyn UserStore>,
        media_store: Arc<dyn MediaStore>,
        jwt_service: JwtService,
    ) -> Self {
        let token_manager = SessionTokenManager::new(user_store.clone(), jwt_service.clone());

        Self {
            account_service: AccountService::new(user_store.clone(), media_store, token_manager),
            jwt_service,
            user_store,
        }
    }
}
