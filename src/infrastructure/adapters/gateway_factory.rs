//! Databricks 게이트웨이 팩토리 어댑터.

use anyhow::Result;

use crate::application::config::WorkspaceSettings;
use crate::application::ports::{CatalogGateway, GatewayFactory, WorkspaceGateway};
use crate::infrastructure::databricks::{ApiClient, CatalogClient, WorkspaceClient};

/// 접속 정보마다 REST 클라이언트를 새로 만든다.
pub struct DatabricksGatewayFactory;

impl GatewayFactory for DatabricksGatewayFactory {
    fn workspace(&self, settings: &WorkspaceSettings) -> Result<Box<dyn WorkspaceGateway>> {
        Ok(Box::new(WorkspaceClient::new(ApiClient::new(settings)?)))
    }

    fn catalog(&self, settings: &WorkspaceSettings) -> Result<Box<dyn CatalogGateway>> {
        Ok(Box::new(CatalogClient::new(ApiClient::new(settings)?)))
    }
}
