//! 접속 정보가 유효한지 현재 사용자 조회로 확인하는 유스케이스.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::usecases::access::WorkspaceAccess;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionReport {
    pub status: &'static str,
    pub user: String,
}

pub struct TestConnectionUseCase<'a> {
    pub access: WorkspaceAccess<'a>,
}

impl<'a> TestConnectionUseCase<'a> {
    pub async fn execute(&self) -> Result<ConnectionReport> {
        let gateway = self.access.workspace()?;
        let user = gateway
            .current_user()
            .await
            .context("connection test failed")?;
        Ok(ConnectionReport {
            status: "connected",
            user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::usecases::testing::{FakeCatalog, FakeFactory, FakeWorkspace, access};

    #[tokio::test]
    async fn reports_current_user() {
        let factory = FakeFactory {
            workspace: FakeWorkspace::default(),
            catalog: FakeCatalog::default(),
        };
        let report = TestConnectionUseCase { access: access(&factory) }
            .execute()
            .await
            .unwrap();
        assert_eq!(report.user, "someone@example.com");
    }
}
