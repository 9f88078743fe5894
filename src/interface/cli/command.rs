//! CLI 명령 파싱 모듈.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::application::ports::WorkspaceKey;
use crate::domain::notebook::{CellLanguage, NotebookLanguage};
use crate::domain::workspace::ExportFormat;

#[derive(Debug, Parser)]
#[command(name = "nbpilot", version)]
#[command(about = "Databricks notebook and Unity Catalog helper with verified imports")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List objects under a workspace directory
    List { path: String },
    /// Show object metadata (exists=false when the path is missing)
    Status { path: String },
    /// Export a notebook
    Export {
        path: String,
        /// SOURCE, JUPYTER, HTML, DBC or R_MARKDOWN
        #[arg(long, default_value = "SOURCE")]
        format: ExportFormat,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import SOURCE content and verify it by re-exporting
    Import {
        path: String,
        /// Read content from a file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Notebook language (inferred from the header when omitted)
        #[arg(short, long)]
        language: Option<NotebookLanguage>,
        #[arg(long)]
        overwrite: bool,
    },
    /// Delete a workspace object
    Delete {
        path: String,
        #[arg(short, long)]
        recursive: bool,
    },
    /// Create a directory (and its parents)
    Mkdir { path: String },
    /// Inspect or edit notebook cells
    Cells {
        #[command(flatten)]
        input: CellsInputArgs,
        #[command(subcommand)]
        command: CellsCommands,
    },
    /// Browse Unity Catalog
    #[command(subcommand)]
    Catalog(CatalogCommands),
    /// Show effective merged config, or edit it
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Debug, Args)]
struct CellsInputArgs {
    /// Read the notebook from a local file (default: stdin)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,
    /// Read the notebook from a workspace path; edits are written back
    /// (from-json: write destination)
    #[arg(long, global = true)]
    remote: Option<String>,
    /// Default language of local input (inferred from the header when omitted)
    #[arg(short, long, global = true)]
    language: Option<NotebookLanguage>,
}

#[derive(Debug, Subcommand)]
enum CellsCommands {
    /// List cells with a short preview
    Parse {
        #[arg(long)]
        json: bool,
        #[arg(long)]
        summary: bool,
    },
    /// Print one cell
    Get {
        index: usize,
        #[arg(long, conflicts_with = "raw")]
        json: bool,
        #[arg(long)]
        raw: bool,
    },
    /// Print the number of cells
    Count,
    /// Convert the notebook to a JSON document
    ToJson,
    /// Convert a JSON document (from --file or stdin) back to SOURCE
    FromJson,
    /// Replace a cell's content
    Update {
        index: usize,
        #[command(flatten)]
        content: ContentArgs,
    },
    /// Insert a cell (index == count appends)
    Insert {
        index: usize,
        #[command(flatten)]
        content: ContentArgs,
    },
    /// Delete a cell
    Delete { index: usize },
}

#[derive(Debug, Args)]
struct ContentArgs {
    #[arg(long, conflicts_with = "content_file")]
    content: Option<String>,
    #[arg(long)]
    content_file: Option<PathBuf>,
    /// python, sql, scala, r or md
    #[arg(long)]
    cell_language: Option<CellLanguage>,
}

#[derive(Debug, Subcommand)]
enum CatalogCommands {
    /// List catalogs
    List,
    /// List schemas in a catalog
    Schemas { catalog: String },
    /// List tables in a schema
    Tables { catalog: String, schema: String },
    /// Show a table schema (catalog.schema.table)
    Describe { full_name: String },
    /// Generate CREATE TABLE DDL
    Ddl { full_name: String },
    /// Find tables whose name contains a pattern
    Search { catalog: String, pattern: String },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Save the workspace host
    SetHost { host: String },
    /// Save the access token
    SetToken { token: String },
    /// Resolve credentials and call the workspace
    Test,
    /// Print the editable config path
    Path,
}

/// 텍스트 입력 출처.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    Stdin,
    File(PathBuf),
    Inline(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellsSource {
    Local {
        text: TextSource,
        language: Option<NotebookLanguage>,
    },
    Remote(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellsAction {
    Parse { json: bool, summary: bool },
    Get { index: usize, json: bool, raw: bool },
    Count,
    ToJson,
    Update {
        index: usize,
        content: TextSource,
        language: Option<CellLanguage>,
    },
    Insert {
        index: usize,
        content: TextSource,
        language: Option<CellLanguage>,
    },
    Delete { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogAction {
    Catalogs,
    Schemas { catalog: String },
    Tables { catalog: String, schema: String },
    Describe { full_name: String },
    Ddl { full_name: String },
    Search { catalog: String, pattern: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    Inspect,
    Set(WorkspaceKey, String),
    Test,
    Path,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    List {
        path: String,
    },
    Status {
        path: String,
    },
    Export {
        path: String,
        format: ExportFormat,
        output: Option<PathBuf>,
    },
    Import {
        path: String,
        content: TextSource,
        language: Option<NotebookLanguage>,
        overwrite: bool,
    },
    Delete {
        path: String,
        recursive: bool,
    },
    Mkdir {
        path: String,
    },
    Cells {
        source: CellsSource,
        action: CellsAction,
    },
    /// 문서를 SOURCE로 바꿔 출력하거나 `remote`에 검증 import 한다.
    CellsFromJson {
        document: TextSource,
        remote: Option<String>,
    },
    Catalog(CatalogAction),
    Config(ConfigAction),
}

impl Cli {
    pub fn parse_action() -> Result<CliAction, String> {
        Cli::parse().into_action()
    }

    fn into_action(self) -> Result<CliAction, String> {
        Ok(match self.command {
            Commands::List { path } => CliAction::List { path },
            Commands::Status { path } => CliAction::Status { path },
            Commands::Export {
                path,
                format,
                output,
            } => CliAction::Export {
                path,
                format,
                output,
            },
            Commands::Import {
                path,
                file,
                language,
                overwrite,
            } => CliAction::Import {
                path,
                content: file.map_or(TextSource::Stdin, TextSource::File),
                language,
                overwrite,
            },
            Commands::Delete { path, recursive } => CliAction::Delete { path, recursive },
            Commands::Mkdir { path } => CliAction::Mkdir { path },
            Commands::Cells { input, command } => cells_action(input, command)?,
            Commands::Catalog(command) => CliAction::Catalog(match command {
                CatalogCommands::List => CatalogAction::Catalogs,
                CatalogCommands::Schemas { catalog } => CatalogAction::Schemas { catalog },
                CatalogCommands::Tables { catalog, schema } => {
                    CatalogAction::Tables { catalog, schema }
                }
                CatalogCommands::Describe { full_name } => CatalogAction::Describe { full_name },
                CatalogCommands::Ddl { full_name } => CatalogAction::Ddl { full_name },
                CatalogCommands::Search { catalog, pattern } => {
                    CatalogAction::Search { catalog, pattern }
                }
            }),
            Commands::Config { command } => CliAction::Config(match command {
                None => ConfigAction::Inspect,
                Some(ConfigCommands::SetHost { host }) => ConfigAction::Set(WorkspaceKey::Host, host),
                Some(ConfigCommands::SetToken { token }) => {
                    ConfigAction::Set(WorkspaceKey::Token, token)
                }
                Some(ConfigCommands::Test) => ConfigAction::Test,
                Some(ConfigCommands::Path) => ConfigAction::Path,
            }),
        })
    }
}

fn cells_action(input: CellsInputArgs, command: CellsCommands) -> Result<CliAction, String> {
    let action = match command {
        // from-json: --file/stdin은 JSON 문서, --remote는 쓰기 대상이다.
        CellsCommands::FromJson => {
            return Ok(CliAction::CellsFromJson {
                document: input.file.map_or(TextSource::Stdin, TextSource::File),
                remote: input.remote,
            });
        }
        CellsCommands::Parse { json, summary } => CellsAction::Parse { json, summary },
        CellsCommands::Get { index, json, raw } => CellsAction::Get { index, json, raw },
        CellsCommands::Count => CellsAction::Count,
        CellsCommands::ToJson => CellsAction::ToJson,
        CellsCommands::Update { index, content } => CellsAction::Update {
            index,
            language: content.cell_language,
            content: content_source(content.content, content.content_file)?,
        },
        CellsCommands::Insert { index, content } => CellsAction::Insert {
            index,
            language: content.cell_language,
            content: content_source(content.content, content.content_file)?,
        },
        CellsCommands::Delete { index } => CellsAction::Delete { index },
    };

    let source = match (input.file, input.remote) {
        (Some(_), Some(_)) => return Err("--file and --remote cannot be used together".to_string()),
        (None, Some(path)) => CellsSource::Remote(path),
        (file, None) => CellsSource::Local {
            text: file.map_or(TextSource::Stdin, TextSource::File),
            language: input.language,
        },
    };

    Ok(CliAction::Cells { source, action })
}

fn content_source(inline: Option<String>, file: Option<PathBuf>) -> Result<TextSource, String> {
    match (inline, file) {
        (Some(text), None) => Ok(TextSource::Inline(text)),
        (None, Some(path)) => Ok(TextSource::File(path)),
        (None, None) => Err("either --content or --content-file is required".to_string()),
        (Some(_), Some(_)) => Err("--content and --content-file are mutually exclusive".to_string()),
    }
}
