//! 노트북 모델/코덱 오류 분류.

use thiserror::Error;

/// SOURCE 파싱, 셀 주소 지정, 언어 해석 과정에서 발생하는 오류.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotebookError {
    /// SOURCE 텍스트 형식 오류(헤더 누락 등).
    #[error("format error: {0}")]
    Format(String),

    /// 셀 인덱스 범위 초과.
    #[error("index error: cell index {index} out of range [0, {upper})")]
    Index { index: usize, upper: usize },

    #[error("unknown language '{0}' (expected one of: {1})")]
    UnknownLanguage(String, &'static str),

    #[error("unknown export format '{0}' (expected one of: SOURCE, JUPYTER, HTML, DBC, R_MARKDOWN)")]
    UnknownExportFormat(String),
}

impl NotebookError {
    /// CLI 출력용 오류 종류 이름.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Format(_) => "FormatError",
            Self::Index { .. } => "IndexError",
            Self::UnknownLanguage(..) | Self::UnknownExportFormat(_) => "ArgumentError",
        }
    }
}
