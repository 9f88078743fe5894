//! Infrastructure layer
//! 외부 시스템(API/파일시스템/프로세스)과 직접 통신하는 구현체 집합.

pub mod adapters;
pub mod config;
pub mod databricks;
