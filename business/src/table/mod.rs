//! Server-paginated, sortable table.
//!
//! A page configures a `TableConfig` (endpoint, ordered `Columns`, default
//! `SortSpec`) and drives a `ServerTable` with sort/page events.

mod column;
mod query;
mod sort;
mod state;

use thiserror::Error;
use ustr::Ustr;

pub use column::{ColumnSpec, Columns, Formatter, Row, default_display};
pub use query::{PageSource, TablePage, TableQuery};
pub use sort::{SortOrder, SortSpec};
pub use state::{PendingFetch, ServerTable, TableStatus};

use crate::config::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("column `{0}` is declared twice")]
    DuplicateColumn(Ustr),
    #[error("column `{0}` is not sortable")]
    NotSortable(Ustr),
    #[error("no column named `{0}`")]
    UnknownColumn(Ustr),
}

#[derive(Debug, Clone)]
pub struct TableConfig {
    pub endpoint: String,
    pub columns: Columns,
    pub default_sort: SortSpec,
    pub page_size: u32,
}

impl TableConfig {
    /// Fails when `default_sort` does not name a sortable column.
    pub fn new(
        endpoint: impl Into<String>,
        columns: Columns,
        default_sort: SortSpec,
    ) -> Result<Self, TableError> {
        columns.ensure_sortable(default_sort.key.as_str())?;
        Ok(Self {
            endpoint: endpoint.into(),
            columns,
            default_sort,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sort_must_be_sortable() {
        let columns = Columns::new([
            ColumnSpec::new("name", "Name"),
            ColumnSpec::new("createdAt", "Created At").sortable(),
        ])
        .unwrap();

        assert!(TableConfig::new("/users", columns.clone(), SortSpec::desc("createdAt")).is_ok());
        assert_eq!(
            TableConfig::new("/users", columns, SortSpec::asc("name")).unwrap_err(),
            TableError::NotSortable(Ustr::from("name"))
        );
    }

    #[test]
    fn page_size_has_a_floor() {
        let columns = Columns::new([ColumnSpec::new("id", "Id").sortable()]).unwrap();
        let config = TableConfig::new("/users", columns, SortSpec::asc("id"))
            .unwrap()
            .with_page_size(0);
        assert_eq!(config.page_size, 1);
    }
}
