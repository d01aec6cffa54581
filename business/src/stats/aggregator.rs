//! Fetch graph behind the three users statistics.
//!
//! ```text
//! registered (total ∥ last month) ─┐
//!                                  ├─> verified (needs total) ─> publish
//! new users (this month)          ─┘
//! ```
//!
//! Every card ends in its own terminal state, so a failing request marks
//! only its own card as failed.

use std::future::Future;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use log::{debug, error, info};
use reduced_states::{
    CancellationToken, StateReader, StateUpdater, TaskHandle, TaskId, cancellable, state_channel,
};
use thiserror::Error;

use crate::api::ApiError;
use crate::dates::{current_month_window, one_month_before};
use crate::stats::compute::{MetricOutcome, NewUsers, RegisteredUsers, VerifiedUsers};
use crate::stats::metric::Slot;
use crate::stats::{MetricView, PublishPolicy, StatsSnapshot};
use crate::users::{CountQuery, CountSource};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("{0} is unavailable")]
    MissingDependency(&'static str),
    #[error("statistics were cancelled")]
    Cancelled,
}

/// Local copy of the snapshot plus the policy deciding when it is published.
struct Board<'a> {
    snapshot: Mutex<StatsSnapshot>,
    updater: &'a StateUpdater<StatsSnapshot>,
    policy: PublishPolicy,
    cancel: &'a CancellationToken,
}

impl<'a> Board<'a> {
    fn new(
        updater: &'a StateUpdater<StatsSnapshot>,
        policy: PublishPolicy,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            snapshot: Mutex::new(StatsSnapshot::default()),
            updater,
            policy,
            cancel,
        }
    }

    fn record(&self, slot: Slot, view: MetricView) {
        let snapshot = {
            let mut guard = match self.snapshot.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            *guard.slot_mut(slot) = view;
            guard.clone()
        };
        if self.policy == PublishPolicy::Independent {
            self.publish(snapshot);
        }
    }

    fn finish(self) -> StatsSnapshot {
        let Self {
            snapshot,
            updater,
            policy,
            cancel,
        } = self;
        let snapshot = match snapshot.into_inner() {
            Ok(snapshot) => snapshot,
            Err(poisoned) => poisoned.into_inner(),
        };
        if policy == PublishPolicy::Batched {
            publish(updater, cancel, snapshot.clone());
        }
        snapshot
    }

    fn publish(&self, snapshot: StatsSnapshot) {
        publish(self.updater, self.cancel, snapshot);
    }
}

fn publish(
    updater: &StateUpdater<StatsSnapshot>,
    cancel: &CancellationToken,
    snapshot: StatsSnapshot,
) {
    if cancel.is_cancelled() {
        debug!("Statistics cancelled, not publishing");
        return;
    }
    // A dropped reader means the page is gone; late results are discarded.
    if let Err(err) = updater.set(snapshot) {
        debug!("Users statistics not published: {err}");
    }
}

pub struct StatsAggregator<C> {
    source: C,
    updater: StateUpdater<StatsSnapshot>,
    policy: PublishPolicy,
    cancel: CancellationToken,
}

impl<C: CountSource> StatsAggregator<C> {
    pub fn new(source: C, updater: StateUpdater<StatsSnapshot>) -> Self {
        Self {
            source,
            updater,
            policy: PublishPolicy::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Aggregator plus the reader a page renders from, starting all-loading.
    pub fn mount(source: C) -> (Self, StateReader<StatsSnapshot>) {
        let (updater, reader) = state_channel(StatsSnapshot::default());
        (Self::new(source, updater), reader)
    }

    pub fn with_policy(mut self, policy: PublishPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn run(&self) -> StatsSnapshot {
        self.run_at(Utc::now()).await
    }

    /// Runs the fetch graph once as of `now` and returns the final snapshot.
    pub async fn run_at(&self, now: DateTime<Utc>) -> StatsSnapshot {
        info!("Loading users statistics as of {now}");
        let board = Board::new(&self.updater, self.policy, &self.cancel);

        let (registered, _new_users) = tokio::join!(
            self.settle(Slot::Registered, &board, self.registered_users(now)),
            self.settle(Slot::NewUsers, &board, self.new_users(now)),
        );

        let total = registered.map(|registered| registered.total);
        self.settle(Slot::Verified, &board, self.verified_users(total))
            .await
            .ok();

        let snapshot = board.finish();
        info!(
            "Users statistics settled, {} of 3 cards ready",
            snapshot
                .views()
                .iter()
                .filter(|view| view.value().is_some())
                .count()
        );
        snapshot
    }

    async fn settle<T, F>(&self, slot: Slot, board: &Board<'_>, fut: F) -> Result<T, StatsError>
    where
        T: MetricOutcome,
        F: Future<Output = Result<T, StatsError>>,
    {
        let result = cancellable(slot.name(), &self.cancel, fut)
            .await
            .unwrap_or_else(|_| Err(StatsError::Cancelled));

        let view = match &result {
            Ok(outcome) => outcome.view(),
            Err(StatsError::Cancelled) => MetricView::failed(StatsError::Cancelled),
            Err(err) => {
                error!("Failed to load {}: {err}", slot.name());
                MetricView::failed(err)
            }
        };
        board.record(slot, view);
        result
    }

    async fn registered_users(&self, now: DateTime<Utc>) -> Result<RegisteredUsers, StatsError> {
        let (total, last_month) = tokio::join!(
            self.source.count(CountQuery::all()),
            self.source
                .count(CountQuery::between(one_month_before(now), now)),
        );
        Ok(RegisteredUsers {
            total: total?,
            last_month: last_month?,
        })
    }

    async fn new_users(&self, now: DateTime<Utc>) -> Result<NewUsers, StatsError> {
        let window = current_month_window(now);
        let count = self
            .source
            .count(CountQuery::between(window.start, window.end))
            .await?;
        Ok(NewUsers { count, window })
    }

    async fn verified_users(
        &self,
        total: Result<u64, StatsError>,
    ) -> Result<VerifiedUsers, StatsError> {
        let total = match total {
            Ok(total) => total,
            Err(StatsError::Cancelled) => return Err(StatsError::Cancelled),
            Err(_) => return Err(StatsError::MissingDependency(Slot::Registered.name())),
        };
        let verified = self.source.count(CountQuery::verified(true)).await?;
        Ok(VerifiedUsers { total, verified })
    }
}

impl<C> StatsAggregator<C>
where
    C: CountSource + 'static,
{
    /// Runs the aggregator on the tokio runtime.
    ///
    /// Cancel the returned handle when the page goes away: in-flight requests
    /// are dropped and nothing more is published.
    pub fn spawn(self) -> TaskHandle {
        let handle = TaskHandle::new(TaskId::of::<StatsSnapshot>(), self.cancellation_token());
        tokio::spawn(async move {
            self.run().await;
        });
        handle
    }
}
