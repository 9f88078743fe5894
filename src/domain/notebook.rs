//! 노트북/셀 도메인 모델과 셀 단위 편집 규칙.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::NotebookError;

/// 노트북 기본 언어(워크스페이스 import 시 지정 가능한 언어).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotebookLanguage {
    #[default]
    #[serde(alias = "python")]
    Python,
    #[serde(alias = "sql")]
    Sql,
    #[serde(alias = "scala")]
    Scala,
    #[serde(alias = "r")]
    R,
}

impl NotebookLanguage {
    pub const ALL: [NotebookLanguage; 4] = [Self::Python, Self::Sql, Self::Scala, Self::R];

    /// Workspace API 규격의 언어 코드.
    pub fn api_name(self) -> &'static str {
        match self {
            Self::Python => "PYTHON",
            Self::Sql => "SQL",
            Self::Scala => "SCALA",
            Self::R => "R",
        }
    }

    /// SOURCE 포맷에서 쓰는 라인 주석 접두어.
    pub fn comment_prefix(self) -> &'static str {
        match self {
            Self::Python | Self::R => "#",
            Self::Sql => "--",
            Self::Scala => "//",
        }
    }
}

impl fmt::Display for NotebookLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

impl FromStr for NotebookLanguage {
    type Err = NotebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Self::Python),
            "sql" => Ok(Self::Sql),
            "scala" => Ok(Self::Scala),
            "r" => Ok(Self::R),
            _ => Err(NotebookError::UnknownLanguage(
                s.to_string(),
                "PYTHON, SQL, SCALA, R",
            )),
        }
    }
}

/// 셀 언어. 노트북 기본 언어와 다르면 MAGIC 접두어로 직렬화된다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellLanguage {
    Python,
    Sql,
    Scala,
    R,
    #[serde(alias = "md")]
    Markdown,
}

impl CellLanguage {
    /// `%<tag>` 매직 지시어에 쓰이는 태그.
    pub fn magic_tag(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Sql => "sql",
            Self::Scala => "scala",
            Self::R => "r",
            Self::Markdown => "md",
        }
    }

    /// 매직 태그를 셀 언어로 해석한다. 언어가 아닌 매직(%pip, %run 등)은 None.
    pub fn from_magic_tag(tag: &str) -> Option<Self> {
        match tag {
            "python" => Some(Self::Python),
            "sql" => Some(Self::Sql),
            "scala" => Some(Self::Scala),
            "r" => Some(Self::R),
            "md" => Some(Self::Markdown),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Sql => "sql",
            Self::Scala => "scala",
            Self::R => "r",
            Self::Markdown => "markdown",
        }
    }
}

impl From<NotebookLanguage> for CellLanguage {
    fn from(value: NotebookLanguage) -> Self {
        match value {
            NotebookLanguage::Python => Self::Python,
            NotebookLanguage::Sql => Self::Sql,
            NotebookLanguage::Scala => Self::Scala,
            NotebookLanguage::R => Self::R,
        }
    }
}

impl fmt::Display for CellLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CellLanguage {
    type Err = NotebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().trim_start_matches('%').to_ascii_lowercase();
        match lowered.as_str() {
            "markdown" => Ok(Self::Markdown),
            "py" => Ok(Self::Python),
            other => Self::from_magic_tag(other).ok_or_else(|| {
                NotebookError::UnknownLanguage(s.to_string(), "python, sql, scala, r, md")
            }),
        }
    }
}

/// 노트북의 단일 셀. 인덱스는 위치로만 결정되며 저장하지 않는다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub language: CellLanguage,
    pub source: Vec<String>,
}

impl Cell {
    pub fn new(language: CellLanguage, source: Vec<String>) -> Self {
        Self { language, source }
    }

    /// 여러 줄 텍스트를 셀 라인으로 나눈다. 마지막 개행은 라인을 만들지 않는다.
    pub fn from_text(language: CellLanguage, text: &str) -> Self {
        Self::new(language, text.lines().map(ToString::to_string).collect())
    }

    pub fn text(&self) -> String {
        self.source.join("\n")
    }

    /// 언어가 아닌 매직 명령(%pip, %run, %sh ...)으로 시작하는 셀이면 그 이름.
    pub fn magic_command(&self, notebook_language: NotebookLanguage) -> Option<&str> {
        let prefix = notebook_language.comment_prefix();
        let first = self.source.iter().find(|line| !line.trim().is_empty())?;
        let rest = first.strip_prefix(prefix)?.strip_prefix(" MAGIC ")?;
        let command = rest.trim_start().strip_prefix('%')?;
        command.split_whitespace().next()
    }
}

/// 파싱된 노트북. 기본 언어와 순서가 있는 셀 목록을 가진다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notebook {
    pub language: NotebookLanguage,
    pub cells: Vec<Cell>,
}

impl Notebook {
    pub fn new(language: NotebookLanguage, cells: Vec<Cell>) -> Self {
        Self { language, cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Cell, NotebookError> {
        self.check_index(index)?;
        Ok(&self.cells[index])
    }

    /// 지정 셀의 본문을 교체한다. 언어가 주어지면 언어도 바꾼다.
    pub fn update(
        &mut self,
        index: usize,
        source: Vec<String>,
        language: Option<CellLanguage>,
    ) -> Result<(), NotebookError> {
        self.check_index(index)?;
        let cell = &mut self.cells[index];
        cell.source = source;
        if let Some(language) = language {
            cell.language = language;
        }
        Ok(())
    }

    /// `index == len`은 끝에 추가한다. 이후 셀 인덱스는 1씩 밀린다.
    pub fn insert(&mut self, index: usize, cell: Cell) -> Result<(), NotebookError> {
        if index > self.cells.len() {
            return Err(NotebookError::Index {
                index,
                upper: self.cells.len() + 1,
            });
        }
        self.cells.insert(index, cell);
        Ok(())
    }

    pub fn delete(&mut self, index: usize) -> Result<Cell, NotebookError> {
        self.check_index(index)?;
        Ok(self.cells.remove(index))
    }

    fn check_index(&self, index: usize) -> Result<(), NotebookError> {
        if index >= self.cells.len() {
            return Err(NotebookError::Index {
                index,
                upper: self.cells.len(),
            });
        }
        Ok(())
    }
}

pub const DOCUMENT_FORMAT: &str = "databricks-source";

/// 노트북 JSON 표현(to-json / from-json).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotebookDocument {
    #[serde(default = "default_document_format")]
    pub format: String,
    pub language: NotebookLanguage,
    pub cells: Vec<CellDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellDocument {
    #[serde(default)]
    pub index: Option<usize>,
    pub language: CellLanguage,
    pub source: String,
    /// 라인 수. `source`가 빈 문자열일 때 빈 셀(0)과 빈 라인 하나(1)를 구분한다.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<usize>,
}

impl CellDocument {
    pub fn from_cell(index: usize, cell: &Cell) -> Self {
        Self {
            index: Some(index),
            language: cell.language,
            source: cell.text(),
            lines: Some(cell.source.len()),
        }
    }

    fn into_cell(self) -> Cell {
        let source = if !self.source.is_empty() {
            self.source.split('\n').map(ToString::to_string).collect()
        } else if self.lines.unwrap_or(0) > 0 {
            vec![String::new()]
        } else {
            Vec::new()
        };
        Cell::new(self.language, source)
    }
}

fn default_document_format() -> String {
    DOCUMENT_FORMAT.to_string()
}

impl From<&Notebook> for NotebookDocument {
    fn from(notebook: &Notebook) -> Self {
        Self {
            format: DOCUMENT_FORMAT.to_string(),
            language: notebook.language,
            cells: notebook
                .cells
                .iter()
                .enumerate()
                .map(|(index, cell)| CellDocument::from_cell(index, cell))
                .collect(),
        }
    }
}

impl NotebookDocument {
    /// 문서 순서를 그대로 셀 순서로 사용한다(index 필드는 참고값).
    pub fn into_notebook(self) -> Result<Notebook, NotebookError> {
        if self.format != DOCUMENT_FORMAT {
            return Err(NotebookError::Format(format!(
                "unsupported document format '{}', expected '{DOCUMENT_FORMAT}'",
                self.format
            )));
        }

        let cells = self.cells.into_iter().map(CellDocument::into_cell).collect();

        Ok(Notebook::new(self.language, cells))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Notebook {
        Notebook::new(
            NotebookLanguage::Python,
            vec![
                Cell::from_text(CellLanguage::Python, "a = 1"),
                Cell::from_text(CellLanguage::Sql, "SELECT 1"),
                Cell::from_text(CellLanguage::Markdown, "# Title"),
            ],
        )
    }

    #[test]
    fn get_out_of_range_names_valid_range() {
        let nb = sample();
        let err = nb.get(3).unwrap_err();
        assert_eq!(err, NotebookError::Index { index: 3, upper: 3 });
        assert_eq!(
            err.to_string(),
            "index error: cell index 3 out of range [0, 3)"
        );
        assert_eq!(err.kind(), "IndexError");
    }

    #[test]
    fn update_and_delete_are_bounds_checked() {
        let mut nb = sample();
        assert!(nb.update(5, vec!["x".into()], None).is_err());
        assert!(nb.delete(3).is_err());
        assert_eq!(nb.len(), 3);
    }

    #[test]
    fn update_keeps_other_cells_in_place() {
        let mut nb = sample();
        nb.update(1, vec!["SELECT 2".into()], None).unwrap();
        assert_eq!(nb.cells[1].language, CellLanguage::Sql);
        assert_eq!(nb.cells[1].source, vec!["SELECT 2"]);
        assert_eq!(nb.cells[0].source, vec!["a = 1"]);
        assert_eq!(nb.cells[2].source, vec!["# Title"]);

        nb.update(1, vec!["b = 2".into()], Some(CellLanguage::Python))
            .unwrap();
        assert_eq!(nb.cells[1].language, CellLanguage::Python);
    }

    #[test]
    fn insert_at_len_appends() {
        let mut nb = sample();
        nb.insert(3, Cell::from_text(CellLanguage::Python, "tail()"))
            .unwrap();
        assert_eq!(nb.len(), 4);
        assert_eq!(nb.cells[3].source, vec!["tail()"]);

        let err = nb
            .insert(9, Cell::from_text(CellLanguage::Python, "x"))
            .unwrap_err();
        assert_eq!(err, NotebookError::Index { index: 9, upper: 5 });
    }

    #[test]
    fn insert_and_delete_shift_following_cells() {
        let mut nb = sample();
        nb.insert(0, Cell::from_text(CellLanguage::Python, "import os"))
            .unwrap();
        assert_eq!(nb.cells[1].source, vec!["a = 1"]);

        let removed = nb.delete(0).unwrap();
        assert_eq!(removed.source, vec!["import os"]);
        assert_eq!(nb.cells[0].source, vec!["a = 1"]);
    }

    #[test]
    fn language_names_parse_case_insensitively() {
        assert_eq!(
            "PYTHON".parse::<NotebookLanguage>().unwrap(),
            NotebookLanguage::Python
        );
        assert_eq!("md".parse::<CellLanguage>().unwrap(), CellLanguage::Markdown);
        assert_eq!("%sql".parse::<CellLanguage>().unwrap(), CellLanguage::Sql);
        assert!("cobol".parse::<NotebookLanguage>().is_err());
        assert!("pip".parse::<CellLanguage>().is_err());
    }

    #[test]
    fn magic_command_is_detected_for_display() {
        let cell = Cell::new(
            CellLanguage::Python,
            vec!["# MAGIC %pip install pandas".into()],
        );
        assert_eq!(cell.magic_command(NotebookLanguage::Python), Some("pip"));
        assert_eq!(
            Cell::from_text(CellLanguage::Python, "x = 1").magic_command(NotebookLanguage::Python),
            None
        );
    }

    #[test]
    fn document_conversion_keeps_order_and_lines() {
        let nb = sample();
        let json = serde_json::to_string(&NotebookDocument::from(&nb)).unwrap();
        assert!(json.contains("\"language\":\"PYTHON\""));
        assert!(json.contains("\"language\":\"markdown\""));

        let doc: NotebookDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(doc.into_notebook().unwrap(), nb);
    }

    #[test]
    fn document_keeps_empty_cell_apart_from_blank_line_cell() {
        let nb = Notebook::new(
            NotebookLanguage::Python,
            vec![
                Cell::new(CellLanguage::Python, vec![]),
                Cell::new(CellLanguage::Python, vec![String::new()]),
                Cell::new(CellLanguage::Python, vec!["x = 1".into(), String::new()]),
            ],
        );
        let json = serde_json::to_string(&NotebookDocument::from(&nb)).unwrap();
        assert!(json.contains("\"source\":\"\",\"lines\":0"));
        assert!(json.contains("\"source\":\"\",\"lines\":1"));

        let doc: NotebookDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(doc.into_notebook().unwrap(), nb);

        // 손으로 쓴 문서는 lines 없이 빈 source를 빈 셀로 읽는다.
        let doc: NotebookDocument = serde_json::from_str(
            r#"{"language":"PYTHON","cells":[{"language":"sql","source":""}]}"#,
        )
        .unwrap();
        assert!(doc.into_notebook().unwrap().cells[0].source.is_empty());
    }

    #[test]
    fn document_with_foreign_format_is_rejected() {
        let doc: NotebookDocument = serde_json::from_str(
            r#"{"format":"jupyter","language":"python","cells":[]}"#,
        )
        .unwrap();
        assert!(matches!(doc.into_notebook(), Err(NotebookError::Format(_))));
    }
}
