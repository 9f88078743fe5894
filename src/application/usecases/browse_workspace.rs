//! 워크스페이스 조회/정리 유스케이스(list, status, export, delete, mkdir).

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::application::usecases::access::WorkspaceAccess;
use crate::domain::workspace::{ExportFormat, ObjectInfo, ObjectStatus};

pub struct BrowseWorkspaceUseCase<'a> {
    pub access: WorkspaceAccess<'a>,
}

impl<'a> BrowseWorkspaceUseCase<'a> {
    /// 디렉터리 바로 아래 객체 목록. 원격 응답 순서를 유지한다.
    pub async fn list(&self, path: &str) -> Result<Vec<ObjectInfo>> {
        let gateway = self.access.workspace()?;
        let objects = gateway
            .list(path)
            .await
            .with_context(|| format!("failed to list {path}"))?;
        debug!(path, count = objects.len(), "listed workspace objects");
        Ok(objects)
    }

    pub async fn status(&self, path: &str) -> Result<ObjectStatus> {
        let gateway = self.access.workspace()?;
        gateway.status(path).await
    }

    /// 내용 바이트를 그대로 반환한다. SOURCE 외 포맷은 해석하지 않는다.
    pub async fn export(&self, path: &str, format: ExportFormat) -> Result<Vec<u8>> {
        let gateway = self.access.workspace()?;
        let content = gateway.export(path, format).await?;
        if content.is_empty() {
            warn!(path, %format, "export returned empty content");
        }
        Ok(content)
    }

    pub async fn delete(&self, path: &str, recursive: bool) -> Result<()> {
        let gateway = self.access.workspace()?;
        gateway.delete(path, recursive).await?;
        debug!(path, recursive, "deleted workspace object");
        Ok(())
    }

    pub async fn mkdirs(&self, path: &str) -> Result<()> {
        let gateway = self.access.workspace()?;
        gateway.mkdirs(path).await
    }
}
