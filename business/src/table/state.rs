//! Fetch/sort/paginate state machine of a server-driven table.
//!
//! ```text
//! Idle ──load──> Fetching ──ok──> Displaying ──sort/page──> Fetching
//!                    └──err──> Error ──retry/sort/page──> Fetching
//! ```
//!
//! Every event that needs data returns a `PendingFetch` tagged with a fresh
//! `TaskId`. Results are applied through `apply`, which drops responses of
//! superseded fetches so a slow old page never overwrites a newer one.

use log::{debug, info, warn};
use reduced_states::TaskId;

use crate::api::ApiResult;
use crate::table::{
    Columns, PageSource, Row, SortSpec, TableConfig, TableError, TablePage, TableQuery,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum TableStatus {
    #[default]
    Idle,
    Fetching,
    Displaying,
    Error(String),
}

/// A fetch the caller should run and hand back to `ServerTable::apply`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub id: TaskId,
    pub endpoint: String,
    pub query: TableQuery,
}

#[derive(Debug)]
pub struct ServerTable {
    config: TableConfig,
    sort: SortSpec,
    page: u32,
    filter: Option<String>,
    status: TableStatus,
    rows: Vec<Row>,
    total: u64,
    latest: TaskId,
}

impl ServerTable {
    pub fn new(config: TableConfig) -> Self {
        Self {
            sort: config.default_sort,
            page: 1,
            filter: None,
            status: TableStatus::Idle,
            rows: Vec::new(),
            total: 0,
            latest: TaskId::of::<ServerTable>(),
            config,
        }
    }

    pub fn status(&self) -> &TableStatus {
        &self.status
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn columns(&self) -> &Columns {
        &self.config.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Pages known from the last response; at least one.
    pub fn page_count(&self) -> u32 {
        let limit = u64::from(self.config.page_size.max(1));
        let pages = self.total.div_ceil(limit).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Cell texts of the displayed rows, formatted per column.
    pub fn rendered_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| self.config.columns.render_row(row))
            .collect()
    }

    /// First fetch, or a plain refresh of the current view.
    pub fn load(&mut self) -> PendingFetch {
        self.begin_fetch()
    }

    pub fn retry(&mut self) -> PendingFetch {
        info!("Retrying table fetch from {}", self.config.endpoint);
        self.begin_fetch()
    }

    /// Header click on `key`. Resets to the first page.
    pub fn sort_by(&mut self, key: &str) -> Result<PendingFetch, TableError> {
        let spec = self.config.columns.ensure_sortable(key)?;
        self.sort = self.sort.toggled(spec.key);
        self.page = 1;
        debug!("Sorting by {} {}", self.sort.key, self.sort.order.as_str());
        Ok(self.begin_fetch())
    }

    /// Moves to `page`, clamped to the known page range.
    pub fn go_to_page(&mut self, page: u32) -> PendingFetch {
        self.page = page.clamp(1, self.page_count());
        self.begin_fetch()
    }

    pub fn next_page(&mut self) -> PendingFetch {
        self.go_to_page(self.page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> PendingFetch {
        self.go_to_page(self.page.saturating_sub(1))
    }

    /// Free-text filter; an empty string clears it. Resets to the first page.
    pub fn set_filter(&mut self, filter: impl Into<String>) -> PendingFetch {
        let filter = filter.into();
        self.filter = (!filter.trim().is_empty()).then_some(filter);
        self.page = 1;
        self.begin_fetch()
    }

    fn begin_fetch(&mut self) -> PendingFetch {
        self.latest = self.latest.next();
        self.status = TableStatus::Fetching;
        PendingFetch {
            id: self.latest,
            endpoint: self.config.endpoint.clone(),
            query: TableQuery {
                page: self.page,
                limit: self.config.page_size,
                filter: self.filter.clone(),
                sort: self.sort,
            },
        }
    }

    /// Applies the outcome of a fetch. Returns `false` when the fetch was
    /// superseded and its result dropped.
    pub fn apply(&mut self, id: TaskId, result: ApiResult<TablePage>) -> bool {
        if id != self.latest {
            debug!(
                "Dropping stale table response (generation {} < {})",
                id.generation(),
                self.latest.generation()
            );
            return false;
        }

        match result {
            Ok(TablePage { data, total }) => {
                self.rows = data;
                self.total = total;
                self.status = TableStatus::Displaying;
            }
            Err(err) => {
                warn!("Table fetch failed: {err}");
                self.status = TableStatus::Error(err.to_string());
            }
        }
        true
    }

    /// Runs `pending` against `source` and applies the result.
    pub async fn fetch_with<S: PageSource>(&mut self, source: &S, pending: PendingFetch) -> bool {
        let result = source.fetch_page(&pending.endpoint, &pending.query).await;
        self.apply(pending.id, result)
    }
}
