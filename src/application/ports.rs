//! 애플리케이션 계층이 의존하는 포트(추상 인터페이스) 모음.

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;

use crate::application::config::{Config, WorkspaceSettings};
use crate::domain::catalog::{CatalogInfo, SchemaInfo, TableInfo, TableSchema, TableSummary};
use crate::domain::notebook::NotebookLanguage;
use crate::domain::workspace::{ExportFormat, ObjectInfo, ObjectStatus};

/// `config set-*`로 편집 가능한 워크스페이스 설정 키.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceKey {
    Host,
    Token,
}

impl WorkspaceKey {
    pub fn field(self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Token => "token",
        }
    }
}

/// 설정 로딩/점검/편집을 담당하는 저장소 포트.
pub trait ConfigRepository: Send + Sync {
    fn load(&self) -> Result<Config>;
    fn inspect_pretty_json(&self) -> Result<String>;
    fn editable_config_path(&self) -> Result<PathBuf>;
    fn set_workspace_value(&self, key: WorkspaceKey, value: &str) -> Result<PathBuf>;
}

/// 설정(host/token/env/cmd)을 실제 접속 정보로 해석하는 포트.
pub trait SettingsResolver: Send + Sync {
    fn resolve(&self, config: &Config) -> Result<WorkspaceSettings>;
}

/// Workspace API 추상화 포트.
#[async_trait]
pub trait WorkspaceGateway: Send + Sync {
    async fn list(&self, path: &str) -> Result<Vec<ObjectInfo>>;
    async fn export(&self, path: &str, format: ExportFormat) -> Result<Vec<u8>>;
    async fn import(
        &self,
        path: &str,
        content: &[u8],
        language: NotebookLanguage,
        overwrite: bool,
    ) -> Result<()>;
    /// 경로가 없으면 오류 대신 `exists == false`를 반환한다.
    async fn status(&self, path: &str) -> Result<ObjectStatus>;
    async fn delete(&self, path: &str, recursive: bool) -> Result<()>;
    async fn mkdirs(&self, path: &str) -> Result<()>;
    async fn current_user(&self) -> Result<String>;
}

/// Unity Catalog 조회 포트(읽기 전용).
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    async fn list_catalogs(&self) -> Result<Vec<CatalogInfo>>;
    async fn list_schemas(&self, catalog: &str) -> Result<Vec<SchemaInfo>>;
    async fn list_tables(&self, catalog: &str, schema: &str) -> Result<Vec<TableInfo>>;
    async fn get_table(&self, full_name: &str) -> Result<TableSchema>;
    async fn search_tables(&self, catalog: &str, pattern: &str) -> Result<Vec<TableSummary>>;
}

/// 접속 정보에 맞는 게이트웨이를 생성하는 팩토리 포트.
pub trait GatewayFactory: Send + Sync {
    fn workspace(&self, settings: &WorkspaceSettings) -> Result<Box<dyn WorkspaceGateway>>;
    fn catalog(&self, settings: &WorkspaceSettings) -> Result<Box<dyn CatalogGateway>>;
}
