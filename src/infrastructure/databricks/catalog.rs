//! Unity Catalog API 2.1 구현(읽기 전용).

use anyhow::Result;
use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;

use super::ApiClient;
use crate::application::ports::CatalogGateway;
use crate::domain::catalog::{
    CatalogInfo, ColumnInfo, SchemaInfo, TableInfo, TableSchema, TableSummary,
};

const BASE: &str = "/api/2.1/unity-catalog";
/// 경로 세그먼트 인코딩. 이름 구분자(`.`)와 `_`, `-`는 그대로 둔다.
const NAME_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'.').remove(b'_').remove(b'-');

pub struct CatalogClient {
    api: ApiClient,
}

impl CatalogClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn table_endpoint(full_name: &str) -> String {
        format!(
            "{BASE}/tables/{}",
            utf8_percent_encode(full_name, NAME_SEGMENT)
        )
    }
}

#[derive(Debug, Deserialize)]
struct CatalogsPage {
    #[serde(default)]
    catalogs: Vec<CatalogResponse>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    name: String,
    comment: Option<String>,
    owner: Option<String>,
    catalog_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SchemasPage {
    #[serde(default)]
    schemas: Vec<SchemaResponse>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SchemaResponse {
    name: String,
    full_name: Option<String>,
    comment: Option<String>,
    owner: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TablesPage {
    #[serde(default)]
    tables: Vec<TableResponse>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TableResponse {
    name: String,
    full_name: Option<String>,
    catalog_name: Option<String>,
    schema_name: Option<String>,
    table_type: Option<String>,
    data_source_format: Option<String>,
    comment: Option<String>,
    owner: Option<String>,
    #[serde(default)]
    columns: Vec<ColumnResponse>,
}

#[derive(Debug, Deserialize)]
struct ColumnResponse {
    name: String,
    type_text: Option<String>,
    type_name: Option<String>,
    nullable: Option<bool>,
    comment: Option<String>,
    position: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SummariesPage {
    #[serde(default)]
    tables: Vec<SummaryResponse>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    full_name: String,
    table_type: Option<String>,
}

impl TableResponse {
    fn into_schema(self, requested: &str) -> TableSchema {
        TableSchema {
            full_name: self.full_name.unwrap_or_else(|| requested.to_string()),
            name: self.name,
            catalog: self.catalog_name,
            schema: self.schema_name,
            table_type: self.table_type,
            data_source_format: self.data_source_format,
            comment: self.comment,
            owner: self.owner,
            columns: self.columns.into_iter().map(ColumnInfo::from).collect(),
        }
    }
}

impl From<ColumnResponse> for ColumnInfo {
    fn from(raw: ColumnResponse) -> Self {
        Self {
            name: raw.name,
            type_text: raw
                .type_text
                .or_else(|| raw.type_name.as_ref().map(|t| t.to_ascii_lowercase()))
                .unwrap_or_default(),
            type_name: raw.type_name,
            // 응답에 없으면 nullable로 본다.
            nullable: raw.nullable.unwrap_or(true),
            comment: raw.comment,
            position: raw.position,
        }
    }
}

impl SummaryResponse {
    fn into_summary(self, catalog: &str) -> TableSummary {
        let mut parts = self.full_name.splitn(3, '.');
        let _ = parts.next();
        let schema = parts.next().unwrap_or_default().to_string();
        let name = parts.next().unwrap_or_default().to_string();
        TableSummary {
            name,
            schema,
            catalog: catalog.to_string(),
            full_name: self.full_name,
            table_type: self.table_type,
        }
    }
}

#[async_trait]
impl CatalogGateway for CatalogClient {
    async fn list_catalogs(&self) -> Result<Vec<CatalogInfo>> {
        self.api
            .get_all(&format!("{BASE}/catalogs"), &[], "catalogs", |page: CatalogsPage| {
                let items = page
                    .catalogs
                    .into_iter()
                    .map(|c| CatalogInfo {
                        name: c.name,
                        comment: c.comment,
                        owner: c.owner,
                        catalog_type: c.catalog_type,
                    })
                    .collect();
                (items, page.next_page_token)
            })
            .await
    }

    async fn list_schemas(&self, catalog: &str) -> Result<Vec<SchemaInfo>> {
        self.api
            .get_all(
                &format!("{BASE}/schemas"),
                &[("catalog_name", catalog)],
                catalog,
                |page: SchemasPage| {
                    let items = page
                        .schemas
                        .into_iter()
                        .map(|s| SchemaInfo {
                            name: s.name,
                            full_name: s.full_name,
                            comment: s.comment,
                            owner: s.owner,
                        })
                        .collect();
                    (items, page.next_page_token)
                },
            )
            .await
    }

    async fn list_tables(&self, catalog: &str, schema: &str) -> Result<Vec<TableInfo>> {
        let subject = format!("{catalog}.{schema}");
        self.api
            .get_all(
                &format!("{BASE}/tables"),
                &[("catalog_name", catalog), ("schema_name", schema)],
                &subject,
                |page: TablesPage| {
                    let items = page
                        .tables
                        .into_iter()
                        .map(|t| TableInfo {
                            name: t.name,
                            full_name: t.full_name,
                            table_type: t.table_type,
                            data_source_format: t.data_source_format,
                            comment: t.comment,
                        })
                        .collect();
                    (items, page.next_page_token)
                },
            )
            .await
    }

    async fn get_table(&self, full_name: &str) -> Result<TableSchema> {
        let table: TableResponse = self
            .api
            .get(&Self::table_endpoint(full_name), &[], full_name)
            .await?;
        Ok(table.into_schema(full_name))
    }

    async fn search_tables(&self, catalog: &str, pattern: &str) -> Result<Vec<TableSummary>> {
        let like = format!("%{pattern}%");
        self.api
            .get_all(
                &format!("{BASE}/table-summaries"),
                &[("catalog_name", catalog), ("table_name_pattern", like.as_str())],
                catalog,
                |page: SummariesPage| {
                    let items = page
                        .tables
                        .into_iter()
                        .map(|s| s.into_summary(catalog))
                        .collect();
                    (items, page.next_page_token)
                },
            )
            .await
    }
}
