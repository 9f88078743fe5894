//! Unity Catalog 조회 결과 뷰 모델과 DDL 생성 규칙.

use anyhow::{Result, bail};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogInfo {
    pub name: String,
    pub comment: Option<String>,
    pub owner: Option<String>,
    pub catalog_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaInfo {
    pub name: String,
    pub full_name: Option<String>,
    pub comment: Option<String>,
    pub owner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableInfo {
    pub name: String,
    pub full_name: Option<String>,
    pub table_type: Option<String>,
    pub data_source_format: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub type_text: String,
    pub type_name: Option<String>,
    pub nullable: bool,
    pub comment: Option<String>,
    pub position: Option<u32>,
}

/// 코드 생성용 테이블 스키마(컬럼 순서 보존).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    pub name: String,
    pub full_name: String,
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub table_type: Option<String>,
    pub data_source_format: Option<String>,
    pub comment: Option<String>,
    pub owner: Option<String>,
    pub columns: Vec<ColumnInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub name: String,
    pub schema: String,
    pub catalog: String,
    pub full_name: String,
    pub table_type: Option<String>,
}

/// `catalog.schema.table` 형태의 전체 이름.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName<'a> {
    pub catalog: &'a str,
    pub schema: &'a str,
    pub table: &'a str,
}

impl<'a> TableName<'a> {
    /// 세 부분 이상으로 나뉘어야 한다. 나머지 점은 테이블 이름에 남긴다.
    pub fn parse(full_name: &'a str) -> Result<Self> {
        let mut parts = full_name.splitn(3, '.');
        let (Some(catalog), Some(schema), Some(table)) = (parts.next(), parts.next(), parts.next())
        else {
            bail!("invalid table name '{full_name}', expected catalog.schema.table");
        };
        if catalog.is_empty() || schema.is_empty() || table.is_empty() {
            bail!("invalid table name '{full_name}', expected catalog.schema.table");
        }
        Ok(Self {
            catalog,
            schema,
            table,
        })
    }
}

/// 테이블 스키마로 CREATE TABLE 문을 만든다.
pub fn generate_ddl(table: &TableSchema) -> String {
    let columns: Vec<String> = table
        .columns
        .iter()
        .map(|col| {
            let mut def = format!("  {} {}", col.name, col.type_text);
            if !col.nullable {
                def.push_str(" NOT NULL");
            }
            if let Some(comment) = col.comment.as_deref().filter(|c| !c.is_empty()) {
                def.push_str(&format!(" COMMENT '{}'", escape_literal(comment)));
            }
            def
        })
        .collect();

    let mut ddl = format!("CREATE TABLE {} (\n", table.full_name);
    ddl.push_str(&columns.join(",\n"));
    ddl.push_str("\n)");

    if let Some(comment) = table.comment.as_deref().filter(|c| !c.is_empty()) {
        ddl.push_str(&format!("\nCOMMENT '{}'", escape_literal(comment)));
    }
    ddl
}

fn escape_literal(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('\'', "\\'")
}
