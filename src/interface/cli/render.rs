//! 셀 목록/단일 셀 콘솔 출력 렌더링.

use crate::domain::notebook::{Cell, Notebook};

/// 셀 목록 출력. `summary`면 본문 대신 라인 수만 보여준다.
pub fn render_cells(notebook: &Notebook, preview_lines: usize, summary: bool) -> String {
    let mut out = format!(
        "Notebook: {} ({} cells)\n",
        notebook.language,
        notebook.len()
    );
    for (index, cell) in notebook.cells.iter().enumerate() {
        out.push('\n');
        out.push_str(&cell_header(notebook, index, cell));
        if summary {
            out.push_str(&format!(" ({} lines)\n", cell.source.len()));
            continue;
        }
        out.push('\n');
        push_lines(&mut out, cell, preview_lines);
    }
    out
}

/// 단일 셀 전체 출력.
pub fn render_cell(notebook: &Notebook, index: usize, cell: &Cell) -> String {
    let mut out = cell_header(notebook, index, cell);
    out.push('\n');
    push_lines(&mut out, cell, usize::MAX);
    out
}

fn cell_header(notebook: &Notebook, index: usize, cell: &Cell) -> String {
    let label = match cell.magic_command(notebook.language) {
        Some(command) => format!("%{command}"),
        None => cell.language.name().to_string(),
    };
    format!("--- Cell {index} [{label}] ---")
}

fn push_lines(out: &mut String, cell: &Cell, limit: usize) {
    for line in cell.source.iter().take(limit) {
        out.push_str(line);
        out.push('\n');
    }
    if cell.source.len() > limit {
        out.push_str(&format!("... ({} more lines)\n", cell.source.len() - limit));
    }
}
