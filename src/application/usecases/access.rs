//! 설정 로딩 → 접속 정보 해석 → 게이트웨이 생성까지의 공통 준비 단계.

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::ports::{
    CatalogGateway, ConfigRepository, GatewayFactory, SettingsResolver, WorkspaceGateway,
};

/// 원격 호출이 필요한 유스케이스가 공유하는 의존성 묶음.
#[derive(Clone, Copy)]
pub struct WorkspaceAccess<'a> {
    pub config_repo: &'a dyn ConfigRepository,
    pub settings_resolver: &'a dyn SettingsResolver,
    pub gateway_factory: &'a dyn GatewayFactory,
}

impl<'a> WorkspaceAccess<'a> {
    pub fn workspace(&self) -> Result<Box<dyn WorkspaceGateway>> {
        let config = self
            .config_repo
            .load()
            .context("failed to load nbpilot config")?;
        let settings = self.settings_resolver.resolve(&config)?;
        debug!(host = %settings.host, "opening workspace gateway");
        self.gateway_factory.workspace(&settings)
    }

    pub fn catalog(&self) -> Result<Box<dyn CatalogGateway>> {
        let config = self
            .config_repo
            .load()
            .context("failed to load nbpilot config")?;
        let settings = self.settings_resolver.resolve(&config)?;
        debug!(host = %settings.host, "opening catalog gateway");
        self.gateway_factory.catalog(&settings)
    }
}
