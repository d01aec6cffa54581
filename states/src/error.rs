use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("State reader for {ty} was dropped, update discarded")]
    ReaderDropped { ty: &'static str },
    #[error("State updater for {ty} was dropped before publishing")]
    UpdaterDropped { ty: &'static str },
    #[error("Task {name} was cancelled")]
    Cancelled { name: &'static str },
}

impl Error {
    pub fn reader_dropped(ty: &'static str) -> Self {
        Self::ReaderDropped { ty }
    }

    pub fn updater_dropped(ty: &'static str) -> Self {
        Self::UpdaterDropped { ty }
    }

    pub fn cancelled(name: &'static str) -> Self {
        Self::Cancelled { name }
    }
}
