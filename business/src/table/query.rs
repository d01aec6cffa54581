//! Wire side of the server-paginated table.
//!
//! `GET {endpoint}?page=&limit=&filter=&sort={"key":"asc|desc"}` answers
//! `{ "data": [row, ...], "total": n }`.

use std::future::Future;

use log::debug;
use serde::Deserialize;

use crate::api::{ApiResult, get_json};
use crate::http::Client;
use crate::table::{Row, SortSpec};
use crate::users::UsersApi;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    /// 1-based.
    pub page: u32,
    pub limit: u32,
    pub filter: Option<String>,
    pub sort: SortSpec,
}

impl TableQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(filter) = self.filter.as_deref().filter(|f| !f.is_empty()) {
            pairs.push(("filter", filter.to_string()));
        }
        pairs.push(("sort", self.sort.to_query_value()));
        pairs
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TablePage {
    pub data: Vec<Row>,
    pub total: u64,
}

/// Anything that can serve one page of rows for a `TableQuery`.
pub trait PageSource: Send + Sync {
    fn fetch_page(
        &self,
        endpoint: &str,
        query: &TableQuery,
    ) -> impl Future<Output = ApiResult<TablePage>> + Send;
}

impl PageSource for UsersApi {
    async fn fetch_page(&self, endpoint: &str, query: &TableQuery) -> ApiResult<TablePage> {
        let request = Client::get(endpoint)
            .bearer_auth(self.config().access_token())
            .query(query.query_pairs());

        let page: TablePage = get_json(request).await?;
        debug!(
            "Fetched {} rows (total {}) from {endpoint}",
            page.data.len(),
            page.total
        );
        Ok(page)
    }
}
