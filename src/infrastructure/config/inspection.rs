//! 적용 설정 진단(inspection) 뷰 모델.

use serde::Serialize;

use super::loader::LoadedConfig;
use super::resolve::{mask_token, normalize_host, resolve_host, resolve_token};
use crate::application::config::{Config, DefaultsConfig};

#[derive(Debug, Clone, Serialize)]
pub struct ConfigInspection {
    pub searched_paths: Vec<String>,
    pub loaded_paths: Vec<String>,
    pub defaults: DefaultsConfig,
    pub effective_defaults: EffectiveDefaults,
    pub workspace: WorkspaceInspection,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveDefaults {
    pub request_timeout_ms: u128,
    pub preview_lines: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceInspection {
    pub host: Option<String>,
    pub host_source: Option<String>,
    pub host_valid: bool,
    pub token_source: Option<String>,
    pub token_resolved: bool,
    pub token_masked: Option<String>,
}

impl ConfigInspection {
    pub(crate) fn from_loaded(loaded: LoadedConfig) -> Self {
        Self {
            searched_paths: loaded
                .searched_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            loaded_paths: loaded
                .loaded_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            defaults: loaded.config.defaults.clone(),
            effective_defaults: EffectiveDefaults {
                request_timeout_ms: loaded.config.request_timeout().as_millis(),
                preview_lines: loaded.config.preview_lines(),
            },
            workspace: workspace_inspection(&loaded.config),
        }
    }
}

fn workspace_inspection(config: &Config) -> WorkspaceInspection {
    let host = resolve_host(&config.workspace);
    let normalized = host.value.as_deref().map(normalize_host);
    let token = resolve_token(&config.workspace);

    WorkspaceInspection {
        host_valid: matches!(normalized, Some(Ok(_))),
        host: match normalized {
            Some(Ok(host)) => Some(host),
            _ => host.value,
        },
        host_source: host.source,
        token_source: token.source,
        token_resolved: token.value.is_some(),
        token_masked: token.value.as_deref().map(mask_token),
    }
}
