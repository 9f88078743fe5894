//! Databricks REST API 연동 계층.
//! 공통 HTTP 클라이언트와 오류 분류를 두고, Workspace/Unity Catalog 구현이 이를 공유한다.

pub mod catalog;
pub mod workspace;

use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::config::WorkspaceSettings;
use crate::domain::workspace::WorkspaceError;

pub use catalog::CatalogClient;
pub use workspace::WorkspaceClient;

const USER_AGENT: &str = concat!("nbpilot/", env!("CARGO_PKG_VERSION"));
const NOT_FOUND_CODES: [&str; 4] = [
    "RESOURCE_DOES_NOT_EXIST",
    "CATALOG_DOES_NOT_EXIST",
    "SCHEMA_DOES_NOT_EXIST",
    "TABLE_DOES_NOT_EXIST",
];

/// 호스트/토큰이 고정된 API 클라이언트. 클론은 커넥션 풀을 공유한다.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    host: String,
    token: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error_code: Option<String>,
    message: Option<String>,
}

impl ApiClient {
    pub fn new(settings: &WorkspaceSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout)
            .build()
            .context("databricks: failed to build HTTP client")?;
        Ok(Self {
            client,
            host: settings.host.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
        })
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{endpoint}", self.host))
            .bearer_auth(&self.token)
    }

    /// `subject`는 404 시 NotFound에 담길 경로/이름이다.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        subject: &str,
    ) -> Result<T> {
        let req = self.request(Method::GET, endpoint).query(query);
        let body = self.send(req, endpoint, subject).await?;
        decode(&body, endpoint)
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        payload: &serde_json::Value,
        subject: &str,
    ) -> Result<T> {
        let req = self.request(Method::POST, endpoint).json(payload);
        let body = self.send(req, endpoint, subject).await?;
        decode(&body, endpoint)
    }

    /// `next_page_token`이 없어질 때까지 목록을 이어 받는다.
    pub(crate) async fn get_all<R, T>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        subject: &str,
        split: impl Fn(R) -> (Vec<T>, Option<String>),
    ) -> Result<Vec<T>>
    where
        R: DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page: R = {
                let mut params = query.to_vec();
                if let Some(token) = page_token.as_deref() {
                    params.push(("page_token", token));
                }
                self.get(endpoint, &params, subject).await?
            };
            let (mut batch, next) = split(page);
            items.append(&mut batch);

            match next.filter(|t| !t.is_empty()) {
                Some(next) => page_token = Some(next),
                None => return Ok(items),
            }
        }
    }

    async fn send(&self, req: RequestBuilder, endpoint: &str, subject: &str) -> Result<String> {
        debug!(endpoint, subject, "databricks request");
        let resp = req
            .send()
            .await
            .map_err(|err| transport_error(None, endpoint, "send request to", err))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|err| transport_error(Some(status), endpoint, "read response of", err))?;
        debug!(endpoint, %status, bytes = body.len(), "databricks response");

        if !status.is_success() {
            return Err(classify(status, &body, subject).into());
        }
        Ok(body)
    }
}

/// 전송 단계 실패(연결, 타임아웃, 본문 수신)도 Remote로 분류한다.
fn transport_error(
    status: Option<StatusCode>,
    endpoint: &str,
    action: &str,
    err: impl std::fmt::Display,
) -> WorkspaceError {
    WorkspaceError::Remote {
        status: status.map(|s| s.as_u16()),
        error_code: None,
        message: format!("failed to {action} {endpoint}: {err}"),
    }
}

fn decode<T: DeserializeOwned>(body: &str, endpoint: &str) -> Result<T> {
    // 빈 성공 응답(`{}` 생략)도 허용한다.
    let body = if body.trim().is_empty() { "{}" } else { body };
    serde_json::from_str(body).map_err(|err| {
        WorkspaceError::Remote {
            status: None,
            error_code: None,
            message: format!("invalid JSON from {endpoint}: {err}"),
        }
        .into()
    })
}

/// 비정상 응답을 NotFound/Remote로 나눈다.
pub(crate) fn classify(status: StatusCode, body: &str, subject: &str) -> WorkspaceError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    let not_found = status == StatusCode::NOT_FOUND
        || parsed
            .error_code
            .as_deref()
            .is_some_and(|code| NOT_FOUND_CODES.contains(&code));
    if not_found {
        return WorkspaceError::NotFound {
            path: subject.to_string(),
            message,
        };
    }

    WorkspaceError::Remote {
        status: Some(status.as_u16()),
        error_code: parsed.error_code,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_resource_maps_to_not_found() {
        let err = classify(
            StatusCode::BAD_REQUEST,
            r#"{"error_code":"RESOURCE_DOES_NOT_EXIST","message":"Path (/x) doesn't exist."}"#,
            "/x",
        );
        assert_eq!(
            err,
            WorkspaceError::NotFound {
                path: "/x".into(),
                message: "Path (/x) doesn't exist.".into()
            }
        );
        assert_eq!(classify(StatusCode::NOT_FOUND, "", "/y").kind(), "NotFoundError");
    }

    #[test]
    fn other_failures_keep_status_and_code() {
        let err = classify(
            StatusCode::FORBIDDEN,
            r#"{"error_code":"PERMISSION_DENIED","message":"no access"}"#,
            "/x",
        );
        assert_eq!(
            err,
            WorkspaceError::Remote {
                status: Some(403),
                error_code: Some("PERMISSION_DENIED".into()),
                message: "no access".into()
            }
        );
    }

    #[test]
    fn non_json_error_body_becomes_the_message() {
        let err = classify(StatusCode::BAD_GATEWAY, "upstream timeout\n", "/x");
        assert_eq!(err.to_string(), "remote error (502): upstream timeout");
    }

    #[test]
    fn truncated_response_body_is_a_remote_error() {
        let err = transport_error(
            Some(StatusCode::OK),
            "/api/2.0/workspace/export",
            "read response of",
            "connection reset",
        );
        assert_eq!(err.kind(), "RemoteError");
        assert_eq!(
            err,
            WorkspaceError::Remote {
                status: Some(200),
                error_code: None,
                message: "failed to read response of /api/2.0/workspace/export: connection reset"
                    .into()
            }
        );
        let err = transport_error(None, "/api/2.0/workspace/list", "send request to", "timed out");
        assert_eq!(err.kind(), "RemoteError");
    }

    #[test]
    fn empty_success_body_decodes_as_empty_object() {
        let value: serde_json::Value = decode("", "/api/2.0/workspace/delete").unwrap();
        assert_eq!(value, serde_json::json!({}));
        let err = decode::<serde_json::Value>("<html>", "/api").unwrap_err();
        assert!(err.downcast_ref::<WorkspaceError>().is_some());
    }
}
