use std::path::PathBuf;
use std::sync::Arc;
use crate::domains::auth::services::{AuthState, JwtService};
use crate::shared::clients::MediaStore;
use crate::shared::config::JwtConfig;
use crate::shared::database::UserStore;

/// Application state (combines all domain states)
/// 애플리케이션 상태 (모든 도메인 상태를 조합)
///
/// 협력자(저장소, 미디어 저장소)는 main 에서 한 번 생성되어 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    pub auth_state: AuthState,
    /// 업로드 파일 임시 저장 경로
    /// Local staging directory for multipart uploads
    pub upload_temp_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(
        jwt_config: &JwtConfig,
        upload_temp_dir: PathBuf,
        user_store: Arc<dyn UserStore>,
        media_store: Arc<dyn MediaStore>,
    ) -> Self {
        // 1. 공유 서비스 생성 (JWT)
        let jwt_service = JwtService::new(jwt_config);

        // 2. 도메인 State 생성
        let auth_state = AuthState::new(user_store, media_store, jwt_service);

        Self {
            auth_state,
            upload_temp_dir: Arc::new(upload_temp_dir),
        }
    }
}
