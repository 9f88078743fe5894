//! 노트북 import + 즉시 재-export 검증 유스케이스.
//!
//! 원격 저장소는 오류 없이 내용을 잘라먹거나 바꿀 수 있으므로,
//! 모든 import 뒤에 export 결과를 비교한다. 불일치 시 재시도하지 않는다.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, warn};

use crate::application::ports::WorkspaceGateway;
use crate::application::usecases::access::WorkspaceAccess;
use crate::domain::notebook::NotebookLanguage;
use crate::domain::source_format::with_header;
use crate::domain::verification::compare;
use crate::domain::workspace::ExportFormat;

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub path: String,
    pub content: String,
    pub language: NotebookLanguage,
    pub overwrite: bool,
}

/// 검증까지 끝난 import 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub status: &'static str,
    pub path: String,
    pub language: NotebookLanguage,
    pub verified: bool,
}

pub struct ImportNotebookUseCase<'a> {
    pub access: WorkspaceAccess<'a>,
}

impl<'a> ImportNotebookUseCase<'a> {
    pub async fn execute(&self, options: ImportOptions) -> Result<ImportReport> {
        let gateway = self.access.workspace()?;
        write_verified(
            gateway.as_ref(),
            &options.path,
            &options.content,
            options.language,
            options.overwrite,
        )
        .await
    }
}

/// import 후 SOURCE export 를 받아 보낸 내용과 비교한다.
/// 불일치면 `VerificationMismatch`(diff 포함)로 실패한다.
pub async fn write_verified(
    gateway: &dyn WorkspaceGateway,
    path: &str,
    content: &str,
    language: NotebookLanguage,
    overwrite: bool,
) -> Result<ImportReport> {
    debug!(path, %language, overwrite, bytes = content.len(), "importing notebook");
    gateway
        .import(path, content.as_bytes(), language, overwrite)
        .await
        .with_context(|| format!("failed to import notebook to {path}"))?;

    let exported = gateway
        .export(path, ExportFormat::Source)
        .await
        .with_context(|| format!("failed to re-export {path} for verification"))?;
    let actual = String::from_utf8_lossy(&exported);

    let expected = with_header(content, language);
    if let Err(mismatch) = compare(path, &expected, &actual) {
        warn!(path, "stored notebook content differs from the imported content");
        return Err(mismatch.into());
    }

    debug!(path, "import verified");
    Ok(ImportReport {
        status: "success",
        path: path.to_string(),
        language,
        verified: true,
    })
}
