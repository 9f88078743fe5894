//! Databricks SOURCE 포맷 코덱.
//!
//! 형식: 헤더 라인, 첫 셀 라인들, 이후 셀마다 `빈 줄 / 구분자 / 빈 줄 / 셀 라인들`.
//! 기본 언어와 다른 셀은 모든 라인에 `<주석> MAGIC` 접두어가 붙고,
//! 첫 라인은 `%<tag>` 지시어로 언어를 밝힌다.

use std::borrow::Cow;

use crate::domain::error::NotebookError;
use crate::domain::notebook::{Cell, CellLanguage, Notebook, NotebookLanguage};

const HEADER_TEXT: &str = "Databricks notebook source";
const DELIMITER_TEXT: &str = "COMMAND ----------";
const MAGIC_TEXT: &str = "MAGIC";

/// 기본 언어별 고정 마커 집합.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub header: String,
    pub delimiter: String,
    pub magic: String,
}

impl Markers {
    pub fn for_language(language: NotebookLanguage) -> Self {
        let prefix = language.comment_prefix();
        Self {
            header: format!("{prefix} {HEADER_TEXT}"),
            delimiter: format!("{prefix} {DELIMITER_TEXT}"),
            magic: format!("{prefix} {MAGIC_TEXT}"),
        }
    }

    /// 마커 뒤 공백 한 칸만 제거한다. 마커만 있는 라인은 빈 라인이다.
    fn strip_magic<'a>(&self, line: &'a str) -> Option<&'a str> {
        let rest = line.strip_prefix(self.magic.as_str())?;
        if rest.is_empty() {
            return Some("");
        }
        rest.strip_prefix(' ')
    }

    fn is_delimiter(&self, line: &str) -> bool {
        line == self.delimiter
    }
}

/// 헤더의 주석 접두어로 기본 언어를 추정한다. `#`는 Python으로 본다.
pub fn detect_language(text: &str) -> Option<NotebookLanguage> {
    let first = strip_bom(text).lines().next()?.trim_end();
    [
        NotebookLanguage::Python,
        NotebookLanguage::Sql,
        NotebookLanguage::Scala,
    ]
    .into_iter()
    .find(|lang| first == Markers::for_language(*lang).header)
}

/// 헤더가 없는 텍스트는 원격 저장 시 헤더가 붙으므로, 기대값에도 헤더를 붙인다.
pub fn with_header(text: &str, language: NotebookLanguage) -> Cow<'_, str> {
    let header = Markers::for_language(language).header;
    let body = strip_bom(text);
    match body.lines().next() {
        Some(first) if first.trim_end() == header => Cow::Borrowed(body),
        _ => Cow::Owned(format!("{header}\n{body}")),
    }
}

/// SOURCE 텍스트를 셀 목록으로 파싱한다.
pub fn parse(text: &str, language: NotebookLanguage) -> Result<Notebook, NotebookError> {
    let markers = Markers::for_language(language);
    let mut lines = strip_bom(text).lines();

    match lines.next() {
        Some(first) if first.trim_end() == markers.header => {}
        Some(first) => {
            return Err(NotebookError::Format(format!(
                "missing header marker '{}' (found '{}')",
                markers.header,
                truncate(first, 60)
            )));
        }
        None => {
            return Err(NotebookError::Format(format!(
                "empty input, expected header marker '{}'",
                markers.header
            )));
        }
    }

    let mut chunks: Vec<Vec<&str>> = vec![Vec::new()];
    for line in lines {
        if markers.is_delimiter(line) {
            chunks.push(Vec::new());
        } else if let Some(current) = chunks.last_mut() {
            current.push(line);
        }
    }

    // 마지막 구분자 뒤에 아무 라인도 없으면 셀이 아니다.
    if chunks.last().is_some_and(Vec::is_empty) {
        chunks.pop();
        if let Some(tail) = chunks.last_mut()
            && tail.last().is_some_and(|l| l.trim().is_empty())
        {
            tail.pop();
        }
    }

    let last = chunks.len().saturating_sub(1);
    let cells = chunks
        .into_iter()
        .enumerate()
        .map(|(i, mut chunk)| {
            if i < last && chunk.last().is_some_and(|l| l.trim().is_empty()) {
                chunk.pop();
            }
            if i > 0 && chunk.first().is_some_and(|l| l.trim().is_empty()) {
                chunk.remove(0);
            }
            decode_cell(&chunk, language, &markers)
        })
        .collect();

    Ok(Notebook::new(language, cells))
}

/// 셀 목록을 SOURCE 텍스트로 직렬화한다.
pub fn serialize(cells: &[Cell], language: NotebookLanguage) -> String {
    let markers = Markers::for_language(language);
    let default = CellLanguage::from(language);

    let mut out: Vec<String> = vec![markers.header.clone()];
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push(String::new());
            out.push(markers.delimiter.clone());
            out.push(String::new());
        }

        if cell.language == default {
            out.extend(cell.source.iter().cloned());
            continue;
        }

        out.push(format!("{} %{}", markers.magic, cell.language.magic_tag()));
        for line in &cell.source {
            if line.is_empty() {
                out.push(markers.magic.clone());
            } else {
                out.push(format!("{} {}", markers.magic, line));
            }
        }
    }

    let mut text = out.join("\n");
    text.push('\n');
    text
}

impl Notebook {
    /// 노트북 기본 언어로 SOURCE 텍스트를 생성한다.
    pub fn to_source(&self) -> String {
        serialize(&self.cells, self.language)
    }
}

fn decode_cell(chunk: &[&str], language: NotebookLanguage, markers: &Markers) -> Cell {
    let default = CellLanguage::from(language);

    let Some(start) = chunk.iter().position(|line| !line.trim().is_empty()) else {
        return Cell::new(default, to_owned(chunk));
    };

    let Some((cell_language, inline)) = markers
        .strip_magic(chunk[start])
        .and_then(parse_directive)
    else {
        return Cell::new(default, to_owned(chunk));
    };

    let mut source = Vec::with_capacity(chunk.len() - start);
    if let Some(inline) = inline {
        source.push(inline.to_string());
    }
    for line in &chunk[start + 1..] {
        let stripped = markers.strip_magic(line).unwrap_or(line);
        source.push(stripped.to_string());
    }

    Cell::new(cell_language, source)
}

/// `%sql` 또는 `%md 제목` 형태의 지시어를 해석한다.
fn parse_directive(body: &str) -> Option<(CellLanguage, Option<&str>)> {
    let directive = body.trim_start().strip_prefix('%')?;
    let (tag, rest) = match directive.split_once(char::is_whitespace) {
        Some((tag, rest)) => (tag, Some(rest.trim_start()).filter(|r| !r.is_empty())),
        None => (directive.trim_end(), None),
    };
    let language = CellLanguage::from_magic_tag(tag)?;
    Some((language, rest))
}

fn to_owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

fn truncate(line: &str, max_chars: usize) -> String {
    if line.chars().count() <= max_chars {
        return line.to_string();
    }
    let mut out: String = line.chars().take(max_chars).collect();
    out.push_str("...");
    out
}
