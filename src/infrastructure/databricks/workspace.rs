//! Workspace API 2.0 구현. 노트북 내용은 base64로 주고받는다.

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::json;

use super::ApiClient;
use crate::application::ports::WorkspaceGateway;
use crate::domain::notebook::NotebookLanguage;
use crate::domain::workspace::{ExportFormat, ObjectInfo, ObjectStatus, ObjectType, WorkspaceError};

pub struct WorkspaceClient {
    api: ApiClient,
}

impl WorkspaceClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    objects: Vec<ObjectResponse>,
}

#[derive(Debug, Deserialize)]
struct ObjectResponse {
    path: String,
    object_type: Option<String>,
    language: Option<NotebookLanguage>,
    object_id: Option<i64>,
    created_at: Option<i64>,
    modified_at: Option<i64>,
    size: Option<i64>,
}

impl From<ObjectResponse> for ObjectInfo {
    fn from(raw: ObjectResponse) -> Self {
        Self {
            path: raw.path,
            object_type: raw.object_type.as_deref().map(ObjectType::from_api),
            language: raw.language,
            object_id: raw.object_id,
            created_at: raw.created_at,
            modified_at: raw.modified_at,
            size: raw.size,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExportResponse {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct Empty {}

#[derive(Debug, Deserialize)]
struct MeResponse {
    #[serde(rename = "userName")]
    user_name: String,
}

#[async_trait]
impl WorkspaceGateway for WorkspaceClient {
    async fn list(&self, path: &str) -> Result<Vec<ObjectInfo>> {
        let resp: ListResponse = self
            .api
            .get("/api/2.0/workspace/list", &[("path", path)], path)
            .await?;
        Ok(resp.objects.into_iter().map(ObjectInfo::from).collect())
    }

    async fn export(&self, path: &str, format: ExportFormat) -> Result<Vec<u8>> {
        let resp: ExportResponse = self
            .api
            .get(
                "/api/2.0/workspace/export",
                &[("path", path), ("format", format.api_name())],
                path,
            )
            .await?;
        STANDARD.decode(resp.content.trim()).map_err(|err| {
            WorkspaceError::Remote {
                status: None,
                error_code: None,
                message: format!("export of {path} returned invalid base64: {err}"),
            }
            .into()
        })
    }

    async fn import(
        &self,
        path: &str,
        content: &[u8],
        language: NotebookLanguage,
        overwrite: bool,
    ) -> Result<()> {
        let payload = json!({
            "path": path,
            "format": ExportFormat::Source.api_name(),
            "language": language.api_name(),
            "content": STANDARD.encode(content),
            "overwrite": overwrite,
        });
        let _: Empty = self
            .api
            .post("/api/2.0/workspace/import", &payload, path)
            .await?;
        Ok(())
    }

    async fn status(&self, path: &str) -> Result<ObjectStatus> {
        let resp = self
            .api
            .get::<ObjectResponse>("/api/2.0/workspace/get-status", &[("path", path)], path)
            .await;
        match resp {
            Ok(raw) => Ok(ObjectStatus::found(raw.into())),
            Err(err) => match err.downcast_ref::<WorkspaceError>() {
                Some(WorkspaceError::NotFound { .. }) => Ok(ObjectStatus::missing()),
                _ => Err(err),
            },
        }
    }

    async fn delete(&self, path: &str, recursive: bool) -> Result<()> {
        let payload = json!({ "path": path, "recursive": recursive });
        let _: Empty = self
            .api
            .post("/api/2.0/workspace/delete", &payload, path)
            .await?;
        Ok(())
    }

    async fn mkdirs(&self, path: &str) -> Result<()> {
        let _: Empty = self
            .api
            .post("/api/2.0/workspace/mkdirs", &json!({ "path": path }), path)
            .await?;
        Ok(())
    }

    async fn current_user(&self) -> Result<String> {
        let me: MeResponse = self
            .api
            .get("/api/2.0/preview/scim/v2/Me", &[], "current user")
            .await
            .context("databricks: failed to fetch current user")?;
        Ok(me.user_name)
    }
}
