//! 유스케이스 테스트용 인메모리 포트 구현.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::application::config::{Config, WorkspaceSettings};
use crate::application::ports::{
    CatalogGateway, ConfigRepository, GatewayFactory, SettingsResolver, WorkspaceGateway,
    WorkspaceKey,
};
use crate::application::usecases::access::WorkspaceAccess;
use crate::domain::catalog::{CatalogInfo, SchemaInfo, TableInfo, TableSchema, TableSummary};
use crate::domain::notebook::NotebookLanguage;
use crate::domain::workspace::{
    ExportFormat, ObjectInfo, ObjectStatus, ObjectType, WorkspaceError,
};

#[derive(Default)]
struct State {
    notebooks: BTreeMap<String, (String, NotebookLanguage)>,
    imports: usize,
    fail_imports: bool,
    transform: Option<fn(&str) -> String>,
}

/// 저장 시 내용을 변형(손상)시킬 수 있는 가짜 워크스페이스.
#[derive(Clone, Default)]
pub struct FakeWorkspace {
    state: Arc<Mutex<State>>,
}

impl FakeWorkspace {
    pub fn with_notebook(self, path: &str, content: &str, language: NotebookLanguage) -> Self {
        self.state
            .lock()
            .unwrap()
            .notebooks
            .insert(path.to_string(), (content.to_string(), language));
        self
    }

    pub fn with_transform(self, transform: fn(&str) -> String) -> Self {
        self.state.lock().unwrap().transform = Some(transform);
        self
    }

    pub fn failing_imports(self) -> Self {
        self.state.lock().unwrap().fail_imports = true;
        self
    }

    pub fn import_count(&self) -> usize {
        self.state.lock().unwrap().imports
    }

    pub fn stored(&self, path: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .notebooks
            .get(path)
            .map(|(content, _)| content.clone())
    }
}

#[async_trait]
impl WorkspaceGateway for FakeWorkspace {
    async fn list(&self, path: &str) -> Result<Vec<ObjectInfo>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .notebooks
            .iter()
            .filter(|(p, _)| p.starts_with(path))
            .map(|(p, (_, language))| notebook_info(p, *language))
            .collect())
    }

    async fn export(&self, path: &str, _format: ExportFormat) -> Result<Vec<u8>> {
        let state = self.state.lock().unwrap();
        let (content, _) = state.notebooks.get(path).ok_or_else(|| WorkspaceError::NotFound {
            path: path.to_string(),
            message: "RESOURCE_DOES_NOT_EXIST".to_string(),
        })?;
        Ok(content.clone().into_bytes())
    }

    async fn import(
        &self,
        path: &str,
        content: &[u8],
        language: NotebookLanguage,
        overwrite: bool,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_imports {
            return Err(WorkspaceError::Remote {
                status: Some(500),
                error_code: Some("INTERNAL_ERROR".to_string()),
                message: "import failed".to_string(),
            }
            .into());
        }
        if !overwrite && state.notebooks.contains_key(path) {
            return Err(WorkspaceError::Remote {
                status: Some(400),
                error_code: Some("RESOURCE_ALREADY_EXISTS".to_string()),
                message: format!("{path} already exists"),
            }
            .into());
        }

        let text = String::from_utf8_lossy(content).to_string();
        let stored = match state.transform {
            Some(transform) => transform(&text),
            None => text,
        };
        state.imports += 1;
        state.notebooks.insert(path.to_string(), (stored, language));
        Ok(())
    }

    async fn status(&self, path: &str) -> Result<ObjectStatus> {
        let state = self.state.lock().unwrap();
        Ok(match state.notebooks.get(path) {
            Some((_, language)) => ObjectStatus::found(notebook_info(path, *language)),
            None => ObjectStatus::missing(),
        })
    }

    async fn delete(&self, path: &str, _recursive: bool) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.notebooks.remove(path).ok_or_else(|| WorkspaceError::NotFound {
            path: path.to_string(),
            message: "RESOURCE_DOES_NOT_EXIST".to_string(),
        })?;
        Ok(())
    }

    async fn mkdirs(&self, _path: &str) -> Result<()> {
        Ok(())
    }

    async fn current_user(&self) -> Result<String> {
        Ok("someone@example.com".to_string())
    }
}

fn notebook_info(path: &str, language: NotebookLanguage) -> ObjectInfo {
    ObjectInfo {
        path: path.to_string(),
        object_type: Some(ObjectType::Notebook),
        language: Some(language),
        object_id: Some(1),
        created_at: None,
        modified_at: None,
        size: None,
    }
}

/// 고정 응답을 돌려주는 가짜 카탈로그.
#[derive(Clone, Default)]
pub struct FakeCatalog {
    pub tables: Vec<TableSchema>,
}

#[async_trait]
impl CatalogGateway for FakeCatalog {
    async fn list_catalogs(&self) -> Result<Vec<CatalogInfo>> {
        let mut names: Vec<String> = self
            .tables
            .iter()
            .filter_map(|t| t.catalog.clone())
            .collect();
        names.dedup();
        Ok(names
            .into_iter()
            .map(|name| CatalogInfo {
                name,
                comment: None,
                owner: None,
                catalog_type: None,
            })
            .collect())
    }

    async fn list_schemas(&self, catalog: &str) -> Result<Vec<SchemaInfo>> {
        Ok(self
            .tables
            .iter()
            .filter(|t| t.catalog.as_deref() == Some(catalog))
            .filter_map(|t| t.schema.clone())
            .map(|name| SchemaInfo {
                full_name: Some(format!("{catalog}.{name}")),
                name,
                comment: None,
                owner: None,
            })
            .collect())
    }

    async fn list_tables(&self, catalog: &str, schema: &str) -> Result<Vec<TableInfo>> {
        Ok(self
            .tables
            .iter()
            .filter(|t| t.catalog.as_deref() == Some(catalog) && t.schema.as_deref() == Some(schema))
            .map(|t| TableInfo {
                name: t.name.clone(),
                full_name: Some(t.full_name.clone()),
                table_type: t.table_type.clone(),
                data_source_format: t.data_source_format.clone(),
                comment: t.comment.clone(),
            })
            .collect())
    }

    async fn get_table(&self, full_name: &str) -> Result<TableSchema> {
        self.tables
            .iter()
            .find(|t| t.full_name == full_name)
            .cloned()
            .ok_or_else(|| {
                WorkspaceError::NotFound {
                    path: full_name.to_string(),
                    message: "TABLE_DOES_NOT_EXIST".to_string(),
                }
                .into()
            })
    }

    async fn search_tables(&self, catalog: &str, pattern: &str) -> Result<Vec<TableSummary>> {
        Ok(self
            .tables
            .iter()
            .filter(|t| t.catalog.as_deref() == Some(catalog) && t.name.contains(pattern))
            .map(|t| TableSummary {
                name: t.name.clone(),
                schema: t.schema.clone().unwrap_or_default(),
                catalog: catalog.to_string(),
                full_name: t.full_name.clone(),
                table_type: t.table_type.clone(),
            })
            .collect())
    }
}

pub struct FakeConfigRepository;

impl ConfigRepository for FakeConfigRepository {
    fn load(&self) -> Result<Config> {
        Ok(Config::default())
    }

    fn inspect_pretty_json(&self) -> Result<String> {
        Ok("{}".to_string())
    }

    fn editable_config_path(&self) -> Result<PathBuf> {
        Ok(PathBuf::from(".nbpilot/config.json"))
    }

    fn set_workspace_value(&self, _key: WorkspaceKey, _value: &str) -> Result<PathBuf> {
        self.editable_config_path()
    }
}

pub struct FixedSettings;

impl SettingsResolver for FixedSettings {
    fn resolve(&self, _config: &Config) -> Result<WorkspaceSettings> {
        Ok(WorkspaceSettings {
            host: "https://example.cloud.databricks.com".to_string(),
            token: "dapi-test".to_string(),
            timeout: Duration::from_secs(5),
        })
    }
}

pub struct FakeFactory {
    pub workspace: FakeWorkspace,
    pub catalog: FakeCatalog,
}

impl GatewayFactory for FakeFactory {
    fn workspace(&self, _settings: &WorkspaceSettings) -> Result<Box<dyn WorkspaceGateway>> {
        Ok(Box::new(self.workspace.clone()))
    }

    fn catalog(&self, _settings: &WorkspaceSettings) -> Result<Box<dyn CatalogGateway>> {
        Ok(Box::new(self.catalog.clone()))
    }
}

/// 가짜 포트로 조립한 접근 묶음.
pub fn access(factory: &FakeFactory) -> WorkspaceAccess<'_> {
    WorkspaceAccess {
        config_repo: &FakeConfigRepository,
        settings_resolver: &FixedSettings,
        gateway_factory: factory,
    }
}
