//! 파싱된 CLI 액션을 유스케이스 호출과 stdout 출력으로 연결한다.
//!
//! stdout에는 기계가 읽을 결과(JSON/SOURCE)만 쓰고, 진단은 stderr로 보낸다.

use std::fs;
use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;

use super::command::{
    CatalogAction, CellsAction, CellsSource, CliAction, ConfigAction, TextSource,
};
use super::composition::AppComposition;
use super::render::{render_cell, render_cells};
use crate::application::usecases::edit_cells::{CellEdit, CellsOutcome, NotebookInput};
use crate::application::usecases::import_notebook::ImportOptions;
use crate::domain::error::NotebookError;
use crate::domain::notebook::{CellDocument, NotebookDocument};
use crate::domain::source_format::detect_language;
use crate::domain::verification::VerificationMismatch;
use crate::domain::workspace::WorkspaceError;

pub async fn run_action(app: &AppComposition, action: CliAction) -> Result<()> {
    match action {
        CliAction::List { path } => {
            print_json(&app.browse_workspace_usecase().list(&path).await?)
        }
        CliAction::Status { path } => {
            print_json(&app.browse_workspace_usecase().status(&path).await?)
        }
        CliAction::Export {
            path,
            format,
            output,
        } => {
            let content = app.browse_workspace_usecase().export(&path, format).await?;
            match output {
                Some(file) => {
                    fs::write(&file, &content)
                        .with_context(|| format!("failed to write {}", file.display()))?;
                    print_json(&json!({
                        "status": "success",
                        "path": path,
                        "format": format.api_name(),
                        "output": file.display().to_string(),
                        "bytes": content.len(),
                    }))
                }
                None => {
                    let mut stdout = io::stdout().lock();
                    stdout.write_all(&content)?;
                    stdout.flush()?;
                    Ok(())
                }
            }
        }
        CliAction::Import {
            path,
            content,
            language,
            overwrite,
        } => {
            let content = read_text(&content)?;
            let language = language
                .or_else(|| detect_language(&content))
                .unwrap_or_default();
            let report = app
                .import_usecase()
                .execute(ImportOptions {
                    path,
                    content,
                    language,
                    overwrite,
                })
                .await?;
            print_json(&report)
        }
        CliAction::Delete { path, recursive } => {
            app.browse_workspace_usecase().delete(&path, recursive).await?;
            print_json(&json!({ "status": "success", "path": path, "deleted": true }))
        }
        CliAction::Mkdir { path } => {
            app.browse_workspace_usecase().mkdirs(&path).await?;
            print_json(&json!({ "status": "success", "path": path }))
        }
        CliAction::Cells { source, action } => run_cells(app, source, action).await,
        CliAction::CellsFromJson { document, remote } => {
            let document = read_text(&document)?;
            let outcome = app
                .edit_cells_usecase()
                .from_document(&document, remote.as_deref())
                .await?;
            print_outcome(outcome)
        }
        CliAction::Catalog(action) => run_catalog(app, action).await,
        CliAction::Config(action) => run_config(app, action).await,
    }
}

async fn run_cells(app: &AppComposition, source: CellsSource, action: CellsAction) -> Result<()> {
    let usecase = app.edit_cells_usecase();
    let input = match source {
        CellsSource::Local { text, language } => NotebookInput::Text {
            text: read_text(&text)?,
            language,
        },
        CellsSource::Remote(path) => NotebookInput::Remote { path },
    };

    let edit = match action {
        CellsAction::Update {
            index,
            content,
            language,
        } => CellEdit::Update {
            index,
            content: read_text(&content)?,
            language,
        },
        CellsAction::Insert {
            index,
            content,
            language,
        } => CellEdit::Insert {
            index,
            content: read_text(&content)?,
            language,
        },
        CellsAction::Delete { index } => CellEdit::Delete { index },
        view => {
            let notebook = usecase.load(&input).await?;
            return match view {
                CellsAction::Parse { json: true, .. } | CellsAction::ToJson => {
                    print_json(&NotebookDocument::from(&notebook))
                }
                CellsAction::Parse {
                    json: false,
                    summary,
                } => {
                    print!(
                        "{}",
                        render_cells(&notebook, usecase.preview_lines()?, summary)
                    );
                    Ok(())
                }
                CellsAction::Get { index, json, raw } => {
                    let cell = notebook.get(index)?;
                    if json {
                        print_json(&CellDocument::from_cell(index, cell))
                    } else if raw {
                        println!("{}", cell.text());
                        Ok(())
                    } else {
                        print!("{}", render_cell(&notebook, index, cell));
                        Ok(())
                    }
                }
                _ => {
                    println!("{}", notebook.len());
                    Ok(())
                }
            };
        }
    };

    let outcome = usecase.apply(input, edit).await?;
    print_outcome(outcome)
}

async fn run_catalog(app: &AppComposition, action: CatalogAction) -> Result<()> {
    let usecase = app.browse_catalog_usecase();
    match action {
        CatalogAction::Catalogs => print_json(&usecase.catalogs().await?),
        CatalogAction::Schemas { catalog } => print_json(&usecase.schemas(&catalog).await?),
        CatalogAction::Tables { catalog, schema } => {
            print_json(&usecase.tables(&catalog, &schema).await?)
        }
        CatalogAction::Describe { full_name } => print_json(&usecase.table(&full_name).await?),
        CatalogAction::Ddl { full_name } => {
            println!("{}", usecase.ddl(&full_name).await?);
            Ok(())
        }
        CatalogAction::Search { catalog, pattern } => {
            print_json(&usecase.search(&catalog, &pattern).await?)
        }
    }
}

async fn run_config(app: &AppComposition, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Inspect => {
            println!("{}", app.config_usecase().inspect()?);
            Ok(())
        }
        ConfigAction::Set(key, value) => {
            let path = app.config_usecase().set(key, &value)?;
            print_json(&json!({
                "status": "success",
                "field": key.field(),
                "path": path.display().to_string(),
            }))
        }
        ConfigAction::Test => print_json(&app.test_connection_usecase().execute().await?),
        ConfigAction::Path => {
            println!("{}", app.config_usecase().path()?.display());
            Ok(())
        }
    }
}

fn print_outcome(outcome: CellsOutcome) -> Result<()> {
    match outcome {
        CellsOutcome::Source(source) => {
            print!("{source}");
            Ok(())
        }
        CellsOutcome::Written(report) => print_json(&report),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_text(source: &TextSource) -> Result<String> {
    match source {
        TextSource::Inline(text) => Ok(text.clone()),
        TextSource::File(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        TextSource::Stdin => io::read_to_string(io::stdin()).context("failed to read stdin"),
    }
}

/// 오류 체인에서 도메인 오류 종류를 찾는다.
pub fn error_kind(err: &anyhow::Error) -> Option<&'static str> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<NotebookError>() {
            Some(e.kind())
        } else if let Some(e) = cause.downcast_ref::<WorkspaceError>() {
            Some(e.kind())
        } else if cause.is::<VerificationMismatch>() {
            Some("VerificationMismatch")
        } else {
            None
        }
    })
}

/// 검증 불일치면 JSON 보고서(stdout)와 diff(stderr)를 출력하고 true를 반환한다.
pub fn report_mismatch(err: &anyhow::Error) -> bool {
    let Some(mismatch) = err.downcast_ref::<VerificationMismatch>() else {
        return false;
    };
    let report = json!({
        "status": "error",
        "error": "VerificationMismatch",
        "path": mismatch.path,
        "verified": false,
    });
    match serde_json::to_string_pretty(&report) {
        Ok(rendered) => println!("{rendered}"),
        Err(_) => println!("{report}"),
    }
    eprint!("{}", mismatch.diff);
    true
}
