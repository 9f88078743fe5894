//! Unity Catalog 조회 유스케이스(읽기 전용).

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::usecases::access::WorkspaceAccess;
use crate::domain::catalog::{
    CatalogInfo, SchemaInfo, TableInfo, TableName, TableSchema, TableSummary, generate_ddl,
};

pub struct BrowseCatalogUseCase<'a> {
    pub access: WorkspaceAccess<'a>,
}

impl<'a> BrowseCatalogUseCase<'a> {
    pub async fn catalogs(&self) -> Result<Vec<CatalogInfo>> {
        self.access.catalog()?.list_catalogs().await
    }

    pub async fn schemas(&self, catalog: &str) -> Result<Vec<SchemaInfo>> {
        self.access
            .catalog()?
            .list_schemas(catalog)
            .await
            .with_context(|| format!("failed to list schemas in {catalog}"))
    }

    pub async fn tables(&self, catalog: &str, schema: &str) -> Result<Vec<TableInfo>> {
        self.access
            .catalog()?
            .list_tables(catalog, schema)
            .await
            .with_context(|| format!("failed to list tables in {catalog}.{schema}"))
    }

    /// `catalog.schema.table` 이름으로 컬럼 순서가 보존된 스키마를 가져온다.
    pub async fn table(&self, full_name: &str) -> Result<TableSchema> {
        TableName::parse(full_name)?;
        let schema = self.access.catalog()?.get_table(full_name).await?;
        debug!(full_name, columns = schema.columns.len(), "fetched table schema");
        Ok(schema)
    }

    pub async fn ddl(&self, full_name: &str) -> Result<String> {
        let schema = self.table(full_name).await?;
        Ok(generate_ddl(&schema))
    }

    /// 카탈로그 안에서 이름에 `pattern`이 들어간 테이블을 찾는다.
    pub async fn search(&self, catalog: &str, pattern: &str) -> Result<Vec<TableSummary>> {
        self.access.catalog()?.search_tables(catalog, pattern).await
    }
}
