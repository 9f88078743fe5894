//! 사용자 설정(JSON) 로딩/병합 모듈.
//! 여러 경로의 설정을 우선순위대로 병합하고, 실행 진단용 정보를 함께 제공한다.

mod inspection;
mod loader;
mod resolve;

use std::path::PathBuf;

use anyhow::Result;

use crate::application::config::Config;
use crate::application::ports::WorkspaceKey;

pub use inspection::{ConfigInspection, EffectiveDefaults, WorkspaceInspection};
pub use loader::{CONFIG_ENV, config_paths};
pub use resolve::{Resolution, mask_token, normalize_host, resolve_settings};

/// 병합된 최종 설정을 로딩한다.
pub fn load() -> Result<Config> {
    Ok(loader::load_merged_config()?.config)
}

/// 설정 진단 결과를 사람이 읽기 쉬운 JSON으로 반환한다.
pub fn inspect_pretty_json() -> Result<String> {
    let inspection = ConfigInspection::from_loaded(loader::load_merged_config()?);
    Ok(serde_json::to_string_pretty(&inspection)?)
}

pub fn editable_path() -> Result<PathBuf> {
    loader::editable_config_path()
}

/// 편집 대상 파일에 `workspace.<key>`를 기록하고 그 경로를 반환한다.
pub fn set_workspace_value(key: WorkspaceKey, value: &str) -> Result<PathBuf> {
    let path = loader::editable_config_path()?;
    loader::write_workspace_value(&path, key, value)?;
    Ok(path)
}
