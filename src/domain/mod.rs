//! Domain layer
//! 노트북 셀 모델, SOURCE 코덱, 검증 규칙을 외부 I/O 없이 표현한다.

pub mod catalog;
pub mod error;
pub mod notebook;
pub mod source_format;
pub mod verification;
pub mod workspace;
