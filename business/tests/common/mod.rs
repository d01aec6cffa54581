//! Shared mock-server setup for the business integration tests.

use chrono::{DateTime, TimeZone, Utc};
use reduced_business::BusinessConfig;
use reduced_business::dates::{current_month_window, one_month_before, to_query_timestamp};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-admin-token";
pub const COUNT_PATH: &str = "/api/v1/users/count";
pub const USERS_PATH: &str = "/api/v1/users";

/// Fixed "now" so date-ranged queries can be matched exactly.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 14, 9, 30, 0).unwrap()
}

pub struct TestContext {
    pub mock_server: MockServer,
    pub config: BusinessConfig,
}

impl TestContext {
    pub async fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let mock_server = MockServer::start().await;
        let config = BusinessConfig::new(mock_server.uri()).with_access_token(TEST_TOKEN);
        Self {
            mock_server,
            config,
        }
    }

    /// `GET /count` with no filters.
    pub async fn mock_total(&self, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(COUNT_PATH))
            .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
            .and(query_param_is_missing("startDate"))
            .and(query_param_is_missing("verified"))
            .respond_with(response)
            .mount(&self.mock_server)
            .await;
    }

    /// `GET /count` for the month before `now()`.
    pub async fn mock_last_month(&self, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(COUNT_PATH))
            .and(query_param(
                "startDate",
                to_query_timestamp(one_month_before(now())).as_str(),
            ))
            .and(query_param("endDate", to_query_timestamp(now()).as_str()))
            .respond_with(response)
            .mount(&self.mock_server)
            .await;
    }

    /// `GET /count` for the calendar month of `now()`.
    pub async fn mock_this_month(&self, response: ResponseTemplate) {
        let window = current_month_window(now());
        Mock::given(method("GET"))
            .and(path(COUNT_PATH))
            .and(query_param("startDate", to_query_timestamp(window.start).as_str()))
            .and(query_param("endDate", to_query_timestamp(window.end).as_str()))
            .respond_with(response)
            .mount(&self.mock_server)
            .await;
    }

    /// `GET /count?verified=true`
    pub async fn mock_verified(&self, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(COUNT_PATH))
            .and(query_param("verified", "true"))
            .respond_with(response)
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_healthy_counts(&self, total: u64, last_month: u64, this_month: u64, verified: u64) {
        self.mock_total(count(total)).await;
        self.mock_last_month(count(last_month)).await;
        self.mock_this_month(count(this_month)).await;
        self.mock_verified(count(verified)).await;
    }
}

pub fn count(count: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "count": count }))
}

pub fn users_page() -> serde_json::Value {
    json!({
        "data": [
            {
                "name": "Ada Lovelace",
                "email": "ada@example.com",
                "verified": false,
                "createdAt": "2024-01-01T00:00:00Z"
            },
            {
                "name": "Grace Hopper",
                "email": "grace@example.com",
                "verified": true,
                "createdAt": "2023-12-09T15:45:00.000Z"
            }
        ],
        "total": 12
    })
}
