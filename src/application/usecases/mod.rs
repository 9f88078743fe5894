//! 애플리케이션 유스케이스 모음.

pub mod access;
pub mod browse_catalog;
pub mod browse_workspace;
pub mod edit_cells;
pub mod import_notebook;
pub mod manage_config;
pub mod test_connection;

#[cfg(test)]
mod testing;
