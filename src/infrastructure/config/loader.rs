//! 설정 파일 탐색/병합 로더.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::application::config::Config;
use crate::application::ports::WorkspaceKey;

pub const CONFIG_ENV: &str = "NBPILOT_CONFIG";
const LOCAL_CONFIG: &str = ".nbpilot/config.json";

#[derive(Debug, Clone)]
pub(crate) struct LoadedConfig {
    pub config: Config,
    pub searched_paths: Vec<PathBuf>,
    pub loaded_paths: Vec<PathBuf>,
}

pub(crate) fn load_merged_config() -> Result<LoadedConfig> {
    load_from_paths(config_paths())
}

/// 주어진 경로를 순서대로(낮은 우선순위 → 높은 우선순위) 병합한다.
/// 없는 파일은 건너뛴다.
pub(crate) fn load_from_paths(paths: Vec<PathBuf>) -> Result<LoadedConfig> {
    let mut merged = Config::default();
    let mut loaded_paths = Vec::new();

    for path in &paths {
        if !path.exists() {
            continue;
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let parsed: Config = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse JSON in {}", path.display()))?;
        merged.merge_from(parsed);
        loaded_paths.push(path.to_path_buf());
    }

    Ok(LoadedConfig {
        config: merged,
        searched_paths: paths,
        loaded_paths,
    })
}

/// 시스템 + 사용자 + 프로젝트 + 명시 경로 순으로 병합 경로를 구성한다.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/nbpilot/config.json")];

    if let Some(base) = dirs::config_dir() {
        paths.push(base.join("nbpilot").join("config.json"));
    }

    paths.push(PathBuf::from(LOCAL_CONFIG));

    if let Ok(path) = env::var(CONFIG_ENV) {
        paths.push(Path::new(&path).to_path_buf());
    }

    dedup_paths(paths)
}

/// 편집 대상 설정 파일 경로.
/// 로딩된 파일 중 최고 우선순위 경로, 없으면 `.nbpilot/config.json`을 만든다.
pub(crate) fn editable_config_path() -> Result<PathBuf> {
    let loaded = load_merged_config()?;
    if let Some(last) = loaded.loaded_paths.last() {
        return Ok(last.clone());
    }

    let fallback = PathBuf::from(LOCAL_CONFIG);
    create_empty_config(&fallback)?;
    Ok(fallback)
}

/// 설정 파일의 `workspace.<key>` 값만 바꾸고 나머지 필드는 보존한다.
pub(crate) fn write_workspace_value(path: &Path, key: WorkspaceKey, value: &str) -> Result<()> {
    let mut root = if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        serde_json::from_str::<Value>(&raw)
            .with_context(|| format!("failed to parse JSON in {}", path.display()))?
    } else {
        Value::Object(Map::new())
    };

    let Some(object) = root.as_object_mut() else {
        anyhow::bail!("config at {} is not a JSON object", path.display());
    };
    let workspace = object
        .entry("workspace")
        .or_insert_with(|| Value::Object(Map::new()));
    let Some(workspace) = workspace.as_object_mut() else {
        anyhow::bail!("`workspace` in {} is not a JSON object", path.display());
    };
    workspace.insert(key.field().to_string(), Value::String(value.to_string()));

    let rendered = serde_json::to_string_pretty(&root)?;
    fs::write(path, format!("{rendered}\n"))
        .with_context(|| format!("failed to write config at {}", path.display()))
}

fn create_empty_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(path, "{}\n")
        .with_context(|| format!("failed to create default config at {}", path.display()))
}

fn dedup_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for p in paths {
        if !out.contains(&p) {
            out.push(p);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_files_override_earlier_ones() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("user.json");
        let project = dir.path().join("project.json");
        let missing = dir.path().join("missing.json");
        fs::write(
            &user,
            r#"{"workspace":{"host":"https://user.cloud.databricks.com","token_env":"MY_TOKEN"}}"#,
        )
        .unwrap();
        fs::write(
            &project,
            r#"{"workspace":{"host":"https://project.cloud.databricks.com"},"defaults":{"preview_lines":3}}"#,
        )
        .unwrap();

        let loaded =
            load_from_paths(vec![user.clone(), missing.clone(), project.clone()]).unwrap();

        assert_eq!(loaded.searched_paths, vec![user.clone(), missing, project.clone()]);
        assert_eq!(loaded.loaded_paths, vec![user, project]);
        assert_eq!(
            loaded.config.workspace.host.as_deref(),
            Some("https://project.cloud.databricks.com")
        );
        assert_eq!(loaded.config.workspace.token_env_name(), "MY_TOKEN");
        assert_eq!(loaded.config.preview_lines(), 3);
    }

    #[test]
    fn invalid_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_from_paths(vec![path.clone()]).unwrap_err();
        assert!(format!("{err:#}").contains(&path.display().to_string()));
    }

    #[test]
    fn writing_a_value_keeps_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"workspace":{"token_env":"MY_TOKEN"},"defaults":{"preview_lines":4}}"#,
        )
        .unwrap();

        write_workspace_value(&path, WorkspaceKey::Host, "https://adb-1.azuredatabricks.net")
            .unwrap();

        let loaded = load_from_paths(vec![path]).unwrap().config;
        assert_eq!(
            loaded.workspace.host.as_deref(),
            Some("https://adb-1.azuredatabricks.net")
        );
        assert_eq!(loaded.workspace.token_env.as_deref(), Some("MY_TOKEN"));
        assert_eq!(loaded.preview_lines(), 4);
    }

    #[test]
    fn writing_creates_a_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.json");

        write_workspace_value(&path, WorkspaceKey::Token, "dapi123").unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["workspace"]["token"], "dapi123");
    }

    #[test]
    fn duplicate_paths_are_searched_once() {
        let paths = dedup_paths(vec![
            PathBuf::from("a.json"),
            PathBuf::from("b.json"),
            PathBuf::from("a.json"),
        ]);
        assert_eq!(paths, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
    }
}
