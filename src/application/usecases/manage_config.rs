//! 설정 점검, 편집 경로 조회, 워크스페이스 접속 정보 저장 유스케이스.

use std::path::PathBuf;

use anyhow::{Result, bail};
use tracing::debug;

use crate::application::ports::{ConfigRepository, WorkspaceKey};

pub struct ManageConfigUseCase<'a> {
    pub config_repo: &'a dyn ConfigRepository,
}

impl<'a> ManageConfigUseCase<'a> {
    /// 탐색/병합 결과와 접속 정보 출처를 JSON으로 반환한다. 토큰은 마스킹된다.
    pub fn inspect(&self) -> Result<String> {
        self.config_repo.inspect_pretty_json()
    }

    /// 편집 대상 설정 파일 경로를 반환한다.
    pub fn path(&self) -> Result<PathBuf> {
        self.config_repo.editable_config_path()
    }

    /// host/token 값을 편집 대상 파일에 기록하고 그 경로를 반환한다.
    pub fn set(&self, key: WorkspaceKey, value: &str) -> Result<PathBuf> {
        let value = value.trim();
        if value.is_empty() {
            bail!("{} must not be empty", key.field());
        }
        let path = self.config_repo.set_workspace_value(key, value)?;
        debug!(field = key.field(), path = %path.display(), "updated workspace config");
        Ok(path)
    }
}
