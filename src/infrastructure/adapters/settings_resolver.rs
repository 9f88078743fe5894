//! 워크스페이스 접속 정보 해석 포트 구현.

use anyhow::Result;

use crate::application::config::{Config, WorkspaceSettings};
use crate::application::ports::SettingsResolver;
use crate::infrastructure::config::resolve_settings;

/// 설정(inline/env/cmd)과 환경변수로 host/token을 해석한다.
pub struct EnvSettingsResolver;

impl SettingsResolver for EnvSettingsResolver {
    fn resolve(&self, config: &Config) -> Result<WorkspaceSettings> {
        resolve_settings(config)
    }
}
