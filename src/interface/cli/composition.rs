//! 애플리케이션 조립(composition root) 모듈.

use crate::application::usecases::access::WorkspaceAccess;
use crate::application::usecases::browse_catalog::BrowseCatalogUseCase;
use crate::application::usecases::browse_workspace::BrowseWorkspaceUseCase;
use crate::application::usecases::edit_cells::EditCellsUseCase;
use crate::application::usecases::import_notebook::ImportNotebookUseCase;
use crate::application::usecases::manage_config::ManageConfigUseCase;
use crate::application::usecases::test_connection::TestConnectionUseCase;
use crate::infrastructure::adapters::{
    DatabricksGatewayFactory, EnvSettingsResolver, JsonConfigRepository,
};

/// 실행 시점 의존성을 한 곳에서 조립하는 컨테이너.
pub struct AppComposition {
    config_repo: JsonConfigRepository,
    settings_resolver: EnvSettingsResolver,
    gateway_factory: DatabricksGatewayFactory,
}

impl Default for AppComposition {
    fn default() -> Self {
        Self::new()
    }
}

impl AppComposition {
    pub fn new() -> Self {
        Self {
            config_repo: JsonConfigRepository,
            settings_resolver: EnvSettingsResolver,
            gateway_factory: DatabricksGatewayFactory,
        }
    }

    fn access(&self) -> WorkspaceAccess<'_> {
        WorkspaceAccess {
            config_repo: &self.config_repo,
            settings_resolver: &self.settings_resolver,
            gateway_factory: &self.gateway_factory,
        }
    }

    pub fn browse_workspace_usecase(&self) -> BrowseWorkspaceUseCase<'_> {
        BrowseWorkspaceUseCase {
            access: self.access(),
        }
    }

    /// 검증 import 유스케이스를 생성한다.
    pub fn import_usecase(&self) -> ImportNotebookUseCase<'_> {
        ImportNotebookUseCase {
            access: self.access(),
        }
    }

    pub fn edit_cells_usecase(&self) -> EditCellsUseCase<'_> {
        EditCellsUseCase {
            access: self.access(),
        }
    }

    pub fn browse_catalog_usecase(&self) -> BrowseCatalogUseCase<'_> {
        BrowseCatalogUseCase {
            access: self.access(),
        }
    }

    pub fn test_connection_usecase(&self) -> TestConnectionUseCase<'_> {
        TestConnectionUseCase {
            access: self.access(),
        }
    }

    /// 설정 점검/편집 유스케이스를 생성한다.
    pub fn config_usecase(&self) -> ManageConfigUseCase<'_> {
        ManageConfigUseCase {
            config_repo: &self.config_repo,
        }
    }
}
