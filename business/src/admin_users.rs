//! Admin dashboard users page: three statistics cards over a users table.
//!
//! Mounting spawns the statistics fetch graph and builds an idle table; the
//! host renders from `stats` and drives `table` with user events. Dropping
//! the page cancels statistics still in flight.

use log::info;
use reduced_states::{StateReader, TaskHandle};
use serde_json::Value;

use crate::BusinessConfig;
use crate::dates::format_date;
use crate::stats::{PublishPolicy, StatsAggregator, StatsSnapshot};
use crate::table::{ColumnSpec, Columns, ServerTable, SortSpec, TableConfig, TableError};
use crate::users::UsersApi;

pub const PAGE_TITLE: &str = "Reduced.to | Admin Dashboard - Users";
pub const PAGE_DESCRIPTION: &str = "Reduced.to | Admin Dashboard - Users and statistics";

const COLUMN_CLASS: &str = "w-1/4";

/// Truthiness as the web client judges it: `null`, `false`, `0`, `NaN` and
/// `""` read as false, anything else as true.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn format_verified(value: &Value) -> String {
    is_truthy(value).to_string()
}

fn format_created_at(value: &Value) -> String {
    match value {
        Value::String(raw) => format_date(raw),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn users_columns() -> Result<Columns, TableError> {
    Columns::new([
        ColumnSpec::new("name", "Name")
            .class_names(COLUMN_CLASS)
            .sortable(),
        ColumnSpec::new("email", "Email")
            .class_names(COLUMN_CLASS)
            .sortable(),
        ColumnSpec::new("verified", "Verified")
            .class_names(COLUMN_CLASS)
            .format(format_verified),
        ColumnSpec::new("createdAt", "Created At")
            .class_names(COLUMN_CLASS)
            .sortable()
            .format(format_created_at),
    ])
}

/// Newest users first.
pub fn default_sort() -> SortSpec {
    SortSpec::desc("createdAt")
}

pub fn users_table_config(config: &BusinessConfig) -> Result<TableConfig, TableError> {
    Ok(
        TableConfig::new(config.users_url(), users_columns()?, default_sort())?
            .with_page_size(config.page_size),
    )
}

pub struct AdminUsersPage {
    pub stats: StateReader<StatsSnapshot>,
    pub table: ServerTable,
    pub api: UsersApi,
    stats_task: TaskHandle,
}

impl AdminUsersPage {
    /// Must be called inside a tokio runtime.
    pub fn mount(config: BusinessConfig, policy: PublishPolicy) -> Result<Self, TableError> {
        info!("Mounting admin users page against {}", config.api_url());
        let table = ServerTable::new(users_table_config(&config)?);
        let api = UsersApi::new(config);

        let (aggregator, stats) = StatsAggregator::mount(api.clone());
        let stats_task = aggregator.with_policy(policy).spawn();

        Ok(Self {
            stats,
            table,
            api,
            stats_task,
        })
    }

    /// Loads the first table page.
    pub async fn load_table(&mut self) -> bool {
        let pending = self.table.load();
        self.table.fetch_with(&self.api, pending).await
    }

    pub fn stats_task(&self) -> &TaskHandle {
        &self.stats_task
    }
}

impl Drop for AdminUsersPage {
    fn drop(&mut self) {
        self.stats_task.cancel();
    }
}
