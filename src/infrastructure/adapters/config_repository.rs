//! 설정 저장소 포트 구현 어댑터.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::config::Config;
use crate::application::ports::{ConfigRepository, WorkspaceKey};
use crate::infrastructure::config;

/// JSON 기반 설정 저장소 어댑터.
pub struct JsonConfigRepository;

impl ConfigRepository for JsonConfigRepository {
    fn load(&self) -> Result<Config> {
        config::load()
    }

    fn inspect_pretty_json(&self) -> Result<String> {
        config::inspect_pretty_json()
    }

    fn editable_config_path(&self) -> Result<PathBuf> {
        config::editable_path()
    }

    fn set_workspace_value(&self, key: WorkspaceKey, value: &str) -> Result<PathBuf> {
        config::set_workspace_value(key, value)
    }
}
