pub mod admin_users;
pub mod api;
mod config;
pub mod dates;
pub mod http;
pub mod stats;
pub mod table;
pub mod users;

pub use admin_users::AdminUsersPage;
pub use api::{ApiError, ApiResult};
pub use config::{BusinessConfig, DEFAULT_PAGE_SIZE};
pub use stats::{MetricView, PublishPolicy, StatsAggregator, StatsError, StatsSnapshot};
pub use table::{ColumnSpec, Columns, ServerTable, SortOrder, SortSpec, TableConfig, TableError};
pub use users::{CountQuery, CountSource, UsersApi};
