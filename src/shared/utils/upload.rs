// 업로드 파일 임시 저장
// Multipart upload staging: files are written to a local temp dir and removed
// again when the `LocalFile` handle is dropped.
use axum::extract::Multipart;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use crate::shared::errors::ApiError;

/// 로컬에 임시 저장된 업로드 파일
/// A staged upload on local disk; deleted on drop
#[derive(Debug)]
pub struct LocalFile {
    path: PathBuf,
    original_name: String,
}

impl LocalFile {
    pub fn new(path: PathBuf, original_name: impl Into<String>) -> Self {
        Self {
            path,
            original_name: original_name.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }
}

impl Drop for LocalFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove staged upload");
            }
        }
    }
}

/// 파싱된 multipart 폼 (텍스트 필드 + 파일)
/// Parsed multipart form
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, LocalFile>,
}

impl MultipartForm {
    /// 텍스트 필드 값 (없으면 빈 문자열)
    pub fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    pub fn take_file(&mut self, name: &str) -> Option<LocalFile> {
        self.files.remove(name)
    }
}

/// multipart 요청을 읽어 파일은 `dir` 에 저장
/// Read a multipart body, staging every non-empty file part under `dir`.
/// Only the first file per field name is kept.
pub async fn save_multipart(mut multipart: Multipart, dir: &Path) -> Result<MultipartForm, ApiError> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        let name = match field.name() {
            Some(n) => n.to_string(),
            None => continue,
        };
        let file_name = field.file_name().map(str::to_string);

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?;

        match file_name {
            Some(file_name) => {
                // 빈 파일 입력(선택 안 함)은 파일 없음으로 처리
                if file_name.is_empty() || data.is_empty() || form.files.contains_key(&name) {
                    continue;
                }
                let staged = stage_file(dir, &file_name, &data).await?;
                form.files.insert(name, staged);
            }
            None => {
                let value = String::from_utf8(data.to_vec())
                    .map_err(|_| ApiError::bad_request(format!("Field {} is not valid UTF-8", name)))?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}

async fn stage_file(dir: &Path, file_name: &str, data: &[u8]) -> Result<LocalFile, ApiError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| ApiError::internal("Failed to store uploaded file", e))?;

    // 경로 조작 방지: 파일 이름 부분만 사용
    let base_name = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    let path = dir.join(format!("{}-{}", Uuid::new_v4(), base_name));

    tokio::fs::write(&path, data)
        .await
        .map_err(|e| ApiError::internal("Failed to store uploaded file", e))?;

    Ok(LocalFile::new(path, base_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_file_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("avatar.png");
        std::fs::write(&path, b"png").unwrap();

        let file = LocalFile::new(path.clone(), "avatar.png");
        assert!(file.path().exists());
        drop(file);

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn stage_file_strips_directories_from_name() {
        let dir = tempfile::tempdir().unwrap();

        let file = stage_file(dir.path(), "../../etc/passwd", b"data").await.unwrap();

        assert_eq!(file.original_name(), "passwd");
        assert_eq!(file.path().parent(), Some(dir.path()));
        assert_eq!(std::fs::read(file.path()).unwrap(), b"data");
    }
}
