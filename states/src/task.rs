//! Task identity and cooperative cancellation.
//!
//! - `TaskId`: identifies a spawned task by the type that owns it and a
//!   generation counter, so late results of superseded tasks can be spotted.
//! - `TaskHandle`: wraps a task with its `CancellationToken`.
//! - `cancellable`: races a future against a token.

use std::any::TypeId;
use std::future::Future;

use log::debug;
use tokio_util::sync::CancellationToken;

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId {
    type_id: TypeId,
    generation: u64,
}

impl TaskId {
    pub fn new(type_id: TypeId, generation: u64) -> Self {
        Self {
            type_id,
            generation,
        }
    }

    /// First generation of tasks owned by `T`.
    pub fn of<T: 'static>() -> Self {
        Self::new(TypeId::of::<T>(), 0)
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Higher generation values belong to more recently spawned tasks.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The id the next task of the same owner should use.
    pub fn next(&self) -> Self {
        Self::new(self.type_id, self.generation + 1)
    }

    /// True when `other` was issued by the same owner after `self`.
    pub fn is_superseded_by(&self, other: &TaskId) -> bool {
        self.type_id == other.type_id && self.generation < other.generation
    }
}

/// Handle to a spawned task with cooperative cancellation.
///
/// Cancelling does not abort the task; the task observes the token (see
/// [`cancellable`]) and stops at its next await point.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancel_token: CancellationToken,
}

impl TaskHandle {
    pub fn new(id: TaskId, cancel_token: CancellationToken) -> Self {
        Self { id, cancel_token }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

/// Runs `fut` unless `token` fires first.
///
/// When the token wins, `fut` is dropped, which drops any request it had in
/// flight.
pub async fn cancellable<F, T>(
    name: &'static str,
    token: &CancellationToken,
    fut: F,
) -> Result<T, Error>
where
    F: Future<Output = T>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!("{name} cancelled before completion");
            Err(Error::cancelled(name))
        }
        output = fut => Ok(output),
    }
}
