use anyhow::{bail, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use super::{MediaStore, UploadedMedia};

/// Mock Media Store (테스트용)
///
/// 파일 이름으로 가짜 URL 을 만들어 돌려줍니다.
/// `fail_uploads(true)` 이후에는 모든 업로드가 실패합니다.
/// `fail_paths_containing("cover")` 는 파일 이름에 해당 문자열이 있는 업로드만 실패시킵니다.
#[derive(Default)]
pub struct MockMediaStore {
    uploads: AtomicUsize,
    failing: AtomicBool,
    failing_pattern: Mutex<Option<String>>,
}

impl MockMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_uploads(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn fail_paths_containing(&self, pattern: &str) {
        *self.failing_pattern.lock() = Some(pattern.to_string());
    }

    /// 업로드 시도 횟수 (실패 포함)
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaStore for MockMediaStore {
    async fn upload(&self, path: &Path) -> Result<UploadedMedia> {
        self.uploads.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            bail!("MockMediaStore: upload failed for {}", path.display());
        }
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload");

        let matches_pattern = self
            .failing_pattern
            .lock()
            .as_deref()
            .is_some_and(|pattern| name.contains(pattern));
        if matches_pattern {
            bail!("MockMediaStore: upload rejected for {}", path.display());
        }
        if !path.exists() {
            bail!("MockMediaStore: file not found {}", path.display());
        }

        Ok(UploadedMedia {
            url: format!("https://media.test/{}", name),
            public_id: name.to_string(),
        })
    }
}
