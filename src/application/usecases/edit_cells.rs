//! 셀 단위 조회/편집 유스케이스.
//!
//! 입력은 로컬 텍스트(stdin/파일) 또는 원격 노트북 경로다.
//! 원격 노트북을 편집하면 검증된 import(덮어쓰기)로 되돌려 쓴다.

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::application::usecases::access::WorkspaceAccess;
use crate::application::usecases::import_notebook::{ImportReport, write_verified};
use crate::domain::notebook::{Cell, CellLanguage, Notebook, NotebookDocument, NotebookLanguage};
use crate::domain::source_format::{detect_language, parse};
use crate::domain::workspace::{ExportFormat, WorkspaceError};

/// 편집 대상 노트북의 출처.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotebookInput {
    /// 언어가 없으면 헤더로 추정하고, 추정도 안 되면 Python으로 본다.
    Text {
        text: String,
        language: Option<NotebookLanguage>,
    },
    Remote {
        path: String,
    },
}

/// 노트북을 바꾸는 셀 편집 명령.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellEdit {
    Update {
        index: usize,
        content: String,
        language: Option<CellLanguage>,
    },
    Insert {
        index: usize,
        content: String,
        language: Option<CellLanguage>,
    },
    Delete {
        index: usize,
    },
}

/// 편집 결과. 로컬 입력이면 SOURCE 텍스트, 원격이면 검증 보고서.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellsOutcome {
    Source(String),
    Written(ImportReport),
}

pub struct EditCellsUseCase<'a> {
    pub access: WorkspaceAccess<'a>,
}

impl<'a> EditCellsUseCase<'a> {
    /// 입력을 읽어 노트북으로 파싱한다.
    pub async fn load(&self, input: &NotebookInput) -> Result<Notebook> {
        match input {
            NotebookInput::Text { text, language } => {
                let language = language.or_else(|| detect_language(text)).unwrap_or_default();
                Ok(parse(text, language)?)
            }
            NotebookInput::Remote { path } => self.load_remote(path).await,
        }
    }

    pub async fn apply(&self, input: NotebookInput, edit: CellEdit) -> Result<CellsOutcome> {
        let mut notebook = self.load(&input).await?;
        apply_edit(&mut notebook, edit)?;
        match input {
            NotebookInput::Text { .. } => Ok(CellsOutcome::Source(notebook.to_source())),
            NotebookInput::Remote { path } => self.write_back(&path, &notebook).await,
        }
    }

    /// JSON 문서를 SOURCE로 바꾼다. `remote`가 있으면 그 경로에 검증 import 한다.
    pub async fn from_document(&self, json: &str, remote: Option<&str>) -> Result<CellsOutcome> {
        let document: NotebookDocument =
            serde_json::from_str(json).context("failed to parse notebook JSON document")?;
        let notebook = document.into_notebook()?;
        match remote {
            Some(path) => self.write_back(path, &notebook).await,
            None => Ok(CellsOutcome::Source(notebook.to_source())),
        }
    }

    /// 셀 미리보기 라인 수(설정값 또는 기본값).
    pub fn preview_lines(&self) -> Result<usize> {
        Ok(self.access.config_repo.load()?.preview_lines())
    }

    async fn load_remote(&self, path: &str) -> Result<Notebook> {
        let gateway = self.access.workspace()?;
        let status = gateway.status(path).await?;
        if !status.exists {
            return Err(WorkspaceError::NotFound {
                path: path.to_string(),
                message: "path does not exist".to_string(),
            }
            .into());
        }
        if !status.is_notebook() {
            bail!("{path} is not a notebook");
        }
        let Some(language) = status.info.as_ref().and_then(|info| info.language) else {
            bail!("workspace did not report a language for {path}");
        };

        let bytes = gateway.export(path, ExportFormat::Source).await?;
        let text = String::from_utf8_lossy(&bytes);
        debug!(path, %language, bytes = bytes.len(), "loaded remote notebook");
        parse(&text, language).with_context(|| format!("failed to parse {path}"))
    }

    async fn write_back(&self, path: &str, notebook: &Notebook) -> Result<CellsOutcome> {
        let gateway = self.access.workspace()?;
        let report = write_verified(
            gateway.as_ref(),
            path,
            &notebook.to_source(),
            notebook.language,
            true,
        )
        .await?;
        Ok(CellsOutcome::Written(report))
    }
}

/// 편집 명령을 노트북에 적용한다. 새 셀의 기본 언어는 노트북 언어다.
pub fn apply_edit(notebook: &mut Notebook, edit: CellEdit) -> Result<()> {
    match edit {
        CellEdit::Update {
            index,
            content,
            language,
        } => {
            let source = content.lines().map(ToString::to_string).collect();
            notebook.update(index, source, language)?;
        }
        CellEdit::Insert {
            index,
            content,
            language,
        } => {
            let language = language.unwrap_or_else(|| notebook.language.into());
            notebook.insert(index, Cell::from_text(language, &content))?;
        }
        CellEdit::Delete { index } => {
            notebook.delete(index)?;
        }
    }
    Ok(())
}
