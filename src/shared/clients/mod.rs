// =====================================================
// 외부 미디어 저장소 인터페이스
// Media Store Interface
// =====================================================
// 로컬에 임시 저장된 파일을 업로드하고 영구 URL을 돌려받습니다.
//
// 구현체:
// - `CloudinaryClient`: Cloudinary Upload API (운영)
// - `MockMediaStore`: 테스트용
// =====================================================

pub mod cloudinary;
pub mod mock;

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

pub use cloudinary::CloudinaryClient;
pub use mock::MockMediaStore;

/// 업로드 결과
/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    pub url: String,
    pub public_id: String,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// 로컬 파일 업로드
    /// Upload a local file, returning its durable URL
    async fn upload(&self, path: &Path) -> Result<UploadedMedia>;
}
