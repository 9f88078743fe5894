//! 애플리케이션이 사용하는 설정 스키마(순수 데이터).
//!
//! 주의: 파일/환경변수/프로세스 접근은 `infrastructure`에서만 수행한다.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST_ENV: &str = "DATABRICKS_HOST";
pub const DEFAULT_TOKEN_ENV: &str = "DATABRICKS_TOKEN";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_PREVIEW_LINES: usize = 10;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// 워크스페이스 접속 정보
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    /// 전역 기본값
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct WorkspaceConfig {
    /// 워크스페이스 URL (예: https://adb-123.azuredatabricks.net)
    pub host: Option<String>,
    /// host를 읽을 환경변수 이름(기본 DATABRICKS_HOST)
    pub host_env: Option<String>,
    /// 고정 토큰(민감정보: 권장하지 않음)
    pub token: Option<String>,
    /// 토큰을 읽을 환경변수 이름(기본 DATABRICKS_TOKEN)
    pub token_env: Option<String>,
    /// 토큰을 stdout으로 출력하는 커맨드(예: ["op","read","op://dev/databricks/token"])
    pub token_command: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DefaultsConfig {
    /// API 요청 타임아웃(ms)
    pub request_timeout_ms: Option<u64>,
    /// 셀 목록 출력 시 셀당 미리보기 라인 수
    pub preview_lines: Option<usize>,
}

/// 해석이 끝난 접속 정보. 클라이언트 생성 시 그대로 넘긴다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceSettings {
    pub host: String,
    pub token: String,
    pub timeout: Duration,
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(
            self.defaults
                .request_timeout_ms
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
        )
    }

    pub fn preview_lines(&self) -> usize {
        self.defaults.preview_lines.unwrap_or(DEFAULT_PREVIEW_LINES)
    }

    /// 후순위(나중 파일) 값으로 덮어쓰는 병합 규칙.
    pub fn merge_from(&mut self, other: Config) {
        self.workspace.merge_from(other.workspace);
        self.defaults.merge_from(other.defaults);
    }
}

impl WorkspaceConfig {
    pub fn host_env_name(&self) -> &str {
        self.host_env
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_HOST_ENV)
    }

    pub fn token_env_name(&self) -> &str {
        self.token_env
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_TOKEN_ENV)
    }

    pub fn merge_from(&mut self, other: WorkspaceConfig) {
        if other.host.is_some() {
            self.host = other.host;
        }
        if other.host_env.is_some() {
            self.host_env = other.host_env;
        }
        if other.token.is_some() {
            self.token = other.token;
        }
        if other.token_env.is_some() {
            self.token_env = other.token_env;
        }
        if other.token_command.is_some() {
            self.token_command = other.token_command;
        }
    }
}

impl DefaultsConfig {
    pub fn merge_from(&mut self, other: DefaultsConfig) {
        if other.request_timeout_ms.is_some() {
            self.request_timeout_ms = other.request_timeout_ms;
        }
        if other.preview_lines.is_some() {
            self.preview_lines = other.preview_lines;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_values_override_earlier_ones() {
        let mut base: Config = serde_json::from_str(
            r#"{"workspace":{"host":"https://a.cloud.databricks.com","token_env":"A_TOKEN"},
                "defaults":{"preview_lines":5}}"#,
        )
        .unwrap();
        let next: Config =
            serde_json::from_str(r#"{"workspace":{"host":"https://b.cloud.databricks.com"}}"#)
                .unwrap();

        base.merge_from(next);
        assert_eq!(
            base.workspace.host.as_deref(),
            Some("https://b.cloud.databricks.com")
        );
        assert_eq!(base.workspace.token_env_name(), "A_TOKEN");
        assert_eq!(base.preview_lines(), 5);
        assert_eq!(base.request_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn env_names_fall_back_to_databricks_defaults() {
        let cfg = WorkspaceConfig {
            token_env: Some("  ".into()),
            ..WorkspaceConfig::default()
        };
        assert_eq!(cfg.host_env_name(), "DATABRICKS_HOST");
        assert_eq!(cfg.token_env_name(), "DATABRICKS_TOKEN");
    }
}
