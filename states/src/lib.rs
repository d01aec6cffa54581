mod error;
mod state;
mod task;

pub use error::Error;
pub use state::{State, StateReader, StateUpdater, state_channel};
pub use task::{TaskHandle, TaskId, cancellable};
pub use tokio_util::sync::CancellationToken;
