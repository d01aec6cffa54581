//! Users count endpoint.
//!
//! `GET {api}/v1/users/count?startDate=&endDate=&verified=` answers
//! `{ "count": n }`. Every parameter is optional: a missing date leaves that
//! side of the range open and a missing `verified` counts everyone.

use std::future::Future;

use chrono::{DateTime, Utc};
use log::debug;
use serde::Deserialize;

use crate::BusinessConfig;
use crate::api::{ApiResult, get_json};
use crate::dates::to_query_timestamp;
use crate::http::Client;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub verified: Option<bool>,
}

impl CountQuery {
    /// Every user, no filters.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start_date: Some(start),
            end_date: Some(end),
            verified: None,
        }
    }

    pub fn verified(verified: bool) -> Self {
        Self {
            verified: Some(verified),
            ..Self::default()
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(start) = self.start_date {
            pairs.push(("startDate", to_query_timestamp(start)));
        }
        if let Some(end) = self.end_date {
            pairs.push(("endDate", to_query_timestamp(end)));
        }
        if let Some(verified) = self.verified {
            pairs.push(("verified", verified.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Anything that can answer a `CountQuery`.
pub trait CountSource: Send + Sync {
    fn count(&self, query: CountQuery) -> impl Future<Output = ApiResult<u64>> + Send;
}

/// `CountSource` backed by the users API.
#[derive(Debug, Clone)]
pub struct UsersApi {
    config: BusinessConfig,
}

impl UsersApi {
    pub fn new(config: BusinessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BusinessConfig {
        &self.config
    }
}

impl CountSource for UsersApi {
    async fn count(&self, query: CountQuery) -> ApiResult<u64> {
        let request = Client::get(self.config.users_count_url())
            .bearer_auth(self.config.access_token())
            .query(query.query_pairs());

        let response: CountResponse = get_json(request).await?;
        debug!("users count for {query:?}: {}", response.count);
        Ok(response.count)
    }
}
