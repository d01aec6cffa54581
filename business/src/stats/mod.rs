//! Users statistics cards: registered, new this month, verified.

mod aggregator;
mod compute;
mod metric;

pub use aggregator::{StatsAggregator, StatsError};
pub use compute::{MetricOutcome, NewUsers, RegisteredUsers, VerifiedUsers, format_percent};
pub use metric::{MetricView, PublishPolicy, StatsSnapshot};
