//! 워크스페이스 객체 값 객체와 원격 API 오류 분류.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::domain::error::NotebookError;
use crate::domain::notebook::NotebookLanguage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectType {
    Notebook,
    Directory,
    Library,
    File,
    Repo,
    Dashboard,
    Other(String),
}

impl ObjectType {
    pub fn from_api(raw: &str) -> Self {
        match raw {
            "NOTEBOOK" => Self::Notebook,
            "DIRECTORY" => Self::Directory,
            "LIBRARY" => Self::Library,
            "FILE" => Self::File,
            "REPO" => Self::Repo,
            "DASHBOARD" => Self::Dashboard,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn api_name(&self) -> &str {
        match self {
            Self::Notebook => "NOTEBOOK",
            Self::Directory => "DIRECTORY",
            Self::Library => "LIBRARY",
            Self::File => "FILE",
            Self::Repo => "REPO",
            Self::Dashboard => "DASHBOARD",
            Self::Other(raw) => raw,
        }
    }
}

impl Serialize for ObjectType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.api_name())
    }
}

/// 워크스페이스 객체 메타데이터.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectInfo {
    pub path: String,
    #[serde(rename = "type")]
    pub object_type: Option<ObjectType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<NotebookLanguage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}

/// status 조회 결과. 경로가 없으면 `exists == false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectStatus {
    pub exists: bool,
    #[serde(flatten)]
    pub info: Option<ObjectInfo>,
}

impl ObjectStatus {
    pub fn missing() -> Self {
        Self {
            exists: false,
            info: None,
        }
    }

    pub fn found(info: ObjectInfo) -> Self {
        Self {
            exists: true,
            info: Some(info),
        }
    }

    pub fn is_notebook(&self) -> bool {
        matches!(
            self.info.as_ref().and_then(|i| i.object_type.as_ref()),
            Some(ObjectType::Notebook)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Source,
    Jupyter,
    Html,
    Dbc,
    RMarkdown,
}

impl ExportFormat {
    pub fn api_name(self) -> &'static str {
        match self {
            Self::Source => "SOURCE",
            Self::Jupyter => "JUPYTER",
            Self::Html => "HTML",
            Self::Dbc => "DBC",
            Self::RMarkdown => "R_MARKDOWN",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

impl FromStr for ExportFormat {
    type Err = NotebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "SOURCE" => Ok(Self::Source),
            "JUPYTER" => Ok(Self::Jupyter),
            "HTML" => Ok(Self::Html),
            "DBC" => Ok(Self::Dbc),
            "R_MARKDOWN" => Ok(Self::RMarkdown),
            _ => Err(NotebookError::UnknownExportFormat(s.to_string())),
        }
    }
}

/// 원격 워크스페이스 호출 실패. 재해석하지 않고 그대로 전달한다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    #[error("not found: {path}: {message}")]
    NotFound { path: String, message: String },

    #[error("remote error{}: {message}", status_label(.status, .error_code))]
    Remote {
        status: Option<u16>,
        error_code: Option<String>,
        message: String,
    },
}

impl WorkspaceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NotFoundError",
            Self::Remote { .. } => "RemoteError",
        }
    }
}

fn status_label(status: &Option<u16>, error_code: &Option<String>) -> String {
    match (status, error_code) {
        (Some(status), Some(code)) => format!(" ({status} {code})"),
        (Some(status), None) => format!(" ({status})"),
        (None, Some(code)) => format!(" ({code})"),
        (None, None) => String::new(),
    }
}
