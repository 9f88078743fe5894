//! 설정 값(host/token/env/cmd)을 실제 런타임 값으로 해석하는 유틸리티.
//!
//! - 환경변수/프로세스 실행은 인프라 계층에서만 수행한다.

use std::env;
use std::process::Command;

use anyhow::{Context, Result, bail};
use url::Url;

use crate::application::config::{Config, WorkspaceConfig, WorkspaceSettings};

/// 값과 그 출처 라벨(inline, env:NAME, cmd:...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub value: Option<String>,
    pub source: Option<String>,
}

pub fn resolve_host(cfg: &WorkspaceConfig) -> Resolution {
    resolve_host_with(cfg, |name| env::var(name).ok())
}

pub fn resolve_token(cfg: &WorkspaceConfig) -> Resolution {
    resolve_token_with(cfg, |name| env::var(name).ok())
}

/// 병합 설정을 접속 정보로 해석한다. host/token 중 하나라도 없으면 실패한다.
pub fn resolve_settings(config: &Config) -> Result<WorkspaceSettings> {
    let host = resolve_host(&config.workspace);
    let Some(raw_host) = host.value else {
        bail!(
            "databricks host is not configured (set {} or run `nbpilot config set-host <url>`)",
            config.workspace.host_env_name()
        );
    };
    let host = normalize_host(&raw_host)?;

    let token = resolve_token(&config.workspace);
    let Some(token) = token.value else {
        let hint = token
            .source
            .map(|s| format!(" [{s}]"))
            .unwrap_or_default();
        bail!(
            "databricks token is not configured{hint} (set {} or run `nbpilot config set-token <token>`)",
            config.workspace.token_env_name()
        );
    };

    Ok(WorkspaceSettings {
        host,
        token,
        timeout: config.request_timeout(),
    })
}

/// 스킴이 없으면 `https://`를 붙이고 끝의 `/`를 제거한다.
pub fn normalize_host(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    let host = with_scheme.trim_end_matches('/').to_string();

    let parsed = Url::parse(&host).with_context(|| format!("invalid databricks host: {raw}"))?;
    if parsed.host_str().is_none() {
        bail!("invalid databricks host: {raw}");
    }
    Ok(host)
}

/// 토큰 앞뒤 4자만 남긴다. 짧은 토큰은 전부 가린다.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

fn resolve_host_with(cfg: &WorkspaceConfig, lookup: impl Fn(&str) -> Option<String>) -> Resolution {
    if let Some(host) = non_empty(cfg.host.as_deref()) {
        return Resolution {
            value: Some(host.to_string()),
            source: Some("inline".to_string()),
        };
    }

    let env_name = cfg.host_env_name();
    match lookup(env_name).map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Resolution {
            value: Some(v),
            source: Some(format!("env:{env_name}")),
        },
        _ => Resolution {
            value: None,
            source: Some(format!("env:{env_name} (missing)")),
        },
    }
}

fn resolve_token_with(
    cfg: &WorkspaceConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Resolution {
    if let Some(token) = non_empty(cfg.token.as_deref()) {
        return Resolution {
            value: Some(token.to_string()),
            source: Some("inline".to_string()),
        };
    }

    let env_name = cfg.token_env_name();
    if let Some(v) = lookup(env_name).map(|v| v.trim().to_string())
        && !v.is_empty()
    {
        return Resolution {
            value: Some(v),
            source: Some(format!("env:{env_name}")),
        };
    }
    let env_hint = format!("env:{env_name} (missing)");

    let Some(cmd) = cfg
        .token_command
        .as_ref()
        .filter(|v| v.iter().any(|s| !s.trim().is_empty()))
    else {
        return Resolution {
            value: None,
            source: Some(env_hint),
        };
    };

    let label = format!("cmd:{}", cmd.join(" "));
    match run_token_command(cmd) {
        Ok(token) if !token.trim().is_empty() => Resolution {
            value: Some(token.trim().to_string()),
            source: Some(label),
        },
        Ok(_) => Resolution {
            value: None,
            source: Some(format!("{label} (empty)")),
        },
        Err(err) => {
            tracing::warn!(error = %err, "token command failed");
            Resolution {
                value: None,
                source: Some(format!("{label} (failed)")),
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn run_token_command(cmd: &[String]) -> Result<String> {
    let program = cmd
        .first()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .context("token_command is empty")?;

    let output = Command::new(&program)
        .args(&cmd[1..])
        .output()
        .with_context(|| format!("failed to run token command: {program}"))?;

    if !output.status.success() {
        bail!("token command failed: {program} ({})", output.status);
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn inline_values_win_over_env() {
        let cfg = WorkspaceConfig {
            host: Some("https://inline.cloud.databricks.com".into()),
            token: Some("dapi-inline".into()),
            ..WorkspaceConfig::default()
        };
        let env = env_of(&[("DATABRICKS_HOST", "https://env"), ("DATABRICKS_TOKEN", "dapi-env")]);

        assert_eq!(resolve_host_with(&cfg, &env).source.as_deref(), Some("inline"));
        let token = resolve_token_with(&cfg, &env);
        assert_eq!(token.value.as_deref(), Some("dapi-inline"));
    }

    #[test]
    fn custom_env_names_are_used() {
        let cfg = WorkspaceConfig {
            token_env: Some("TEAM_TOKEN".into()),
            ..WorkspaceConfig::default()
        };
        let env = env_of(&[("TEAM_TOKEN", " dapi-team \n"), ("DATABRICKS_TOKEN", "dapi-default")]);

        let token = resolve_token_with(&cfg, &env);
        assert_eq!(token.value.as_deref(), Some("dapi-team"));
        assert_eq!(token.source.as_deref(), Some("env:TEAM_TOKEN"));
    }

    #[test]
    fn missing_values_report_where_they_were_looked_up() {
        let cfg = WorkspaceConfig::default();
        let env = env_of(&[]);

        let host = resolve_host_with(&cfg, &env);
        assert_eq!(host.value, None);
        assert_eq!(host.source.as_deref(), Some("env:DATABRICKS_HOST (missing)"));
        assert_eq!(
            resolve_token_with(&cfg, &env).source.as_deref(),
            Some("env:DATABRICKS_TOKEN (missing)")
        );
    }

    #[cfg(unix)]
    #[test]
    fn token_command_is_the_last_fallback() {
        let cfg = WorkspaceConfig {
            token_command: Some(vec!["echo".into(), "dapi-from-cmd".into()]),
            ..WorkspaceConfig::default()
        };
        let token = resolve_token_with(&cfg, env_of(&[]));
        assert_eq!(token.value.as_deref(), Some("dapi-from-cmd"));
        assert_eq!(token.source.as_deref(), Some("cmd:echo dapi-from-cmd"));
    }

    #[test]
    fn host_gets_scheme_and_loses_trailing_slash() {
        assert_eq!(
            normalize_host("adb-123.azuredatabricks.net/").unwrap(),
            "https://adb-123.azuredatabricks.net"
        );
        assert_eq!(
            normalize_host("http://localhost:8080//").unwrap(),
            "http://localhost:8080"
        );
        assert!(normalize_host("https://").is_err());
    }

    #[test]
    fn tokens_are_masked() {
        assert_eq!(mask_token("dapi0123456789abcdef"), "dapi...cdef");
        assert_eq!(mask_token("short-token"), "****");
    }
}
