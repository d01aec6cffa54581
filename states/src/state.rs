//! Typed single-writer state cells.
//!
//! A `StateUpdater` publishes whole values of a `State` type and a
//! `StateReader` observes them. Every publish is one message on a `flume`
//! channel, so a reader either sees the previous value or the new one,
//! never a half-written mix of fields.

use flume::{Receiver, Sender, TryRecvError};
use log::debug;

use crate::Error;

pub trait State: Clone + Send + 'static {
    const TYPE: &'static str = "state";
}

/// Creates a connected updater/reader pair seeded with `initial`.
///
/// The reader starts out holding `initial`, so consumers have something to
/// render before the first publish arrives.
pub fn state_channel<T: State>(initial: T) -> (StateUpdater<T>, StateReader<T>) {
    let (send, recv) = flume::unbounded();
    (
        StateUpdater { send },
        StateReader {
            recv,
            current: initial,
        },
    )
}

#[derive(Debug)]
pub struct StateUpdater<T: State> {
    send: Sender<T>,
}

impl<T: State> Clone for StateUpdater<T> {
    fn clone(&self) -> Self {
        Self {
            send: self.send.clone(),
        }
    }
}

impl<T> StateUpdater<T>
where
    T: State,
{
    /// Publishes a new value.
    ///
    /// Fails with `Error::ReaderDropped` when nobody observes the state any
    /// more (the page owning the reader was torn down).
    pub fn set(&self, state: T) -> Result<(), Error> {
        self.send.send(state).map_err(|_| {
            debug!("Reader of {} is gone, dropping update", T::TYPE);
            Error::reader_dropped(T::TYPE)
        })
    }

    pub fn is_disconnected(&self) -> bool {
        self.send.is_disconnected()
    }
}

#[derive(Debug)]
pub struct StateReader<T: State> {
    recv: Receiver<T>,
    current: T,
}

impl<T> StateReader<T>
where
    T: State,
{
    /// Latest value, after applying every publish that has arrived so far.
    pub fn read(&mut self) -> &T {
        while let Ok(state) = self.recv.try_recv() {
            self.current = state;
        }
        &self.current
    }

    /// Applies the next pending publish, if any, and returns it.
    ///
    /// Unlike `read`, this lets an observer step through every published
    /// value in order.
    pub fn next_update(&mut self) -> Option<&T> {
        match self.recv.try_recv() {
            Ok(state) => {
                self.current = state;
                Some(&self.current)
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Waits for the next publish.
    pub async fn changed(&mut self) -> Result<&T, Error> {
        let state = self
            .recv
            .recv_async()
            .await
            .map_err(|_| Error::updater_dropped(T::TYPE))?;
        self.current = state;
        Ok(&self.current)
    }

    /// Current value without draining pending publishes.
    pub fn peek(&self) -> &T {
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Counter {
        value: i32,
        label: String,
    }

    impl State for Counter {
        const TYPE: &'static str = "counter";
    }

    #[test]
    fn reader_starts_with_initial_value() {
        let (_updater, mut reader) = state_channel(Counter {
            value: 1,
            label: "one".to_string(),
        });
        assert_eq!(reader.read().value, 1);
    }

    #[test]
    fn read_returns_latest_publish() {
        let (updater, mut reader) = state_channel(Counter::default());
        updater
            .set(Counter {
                value: 1,
                label: "a".to_string(),
            })
            .unwrap();
        updater
            .set(Counter {
                value: 2,
                label: "b".to_string(),
            })
            .unwrap();

        let state = reader.read();
        assert_eq!(state.value, 2);
        assert_eq!(state.label, "b");
    }

    #[test]
    fn next_update_steps_through_publishes() {
        let (updater, mut reader) = state_channel(Counter::default());
        for value in 1..=3 {
            updater
                .set(Counter {
                    value,
                    label: String::new(),
                })
                .unwrap();
        }

        let seen: Vec<i32> = std::iter::from_fn(|| reader.next_update().map(|c| c.value)).collect();
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(reader.peek().value, 3);
    }

    #[test]
    fn set_after_reader_dropped_is_an_error() {
        let (updater, reader) = state_channel(Counter::default());
        drop(reader);

        assert!(updater.is_disconnected());
        assert_eq!(
            updater.set(Counter::default()),
            Err(Error::reader_dropped("counter"))
        );
    }

    #[tokio::test]
    async fn changed_waits_for_publish() {
        let (updater, mut reader) = state_channel(Counter::default());
        let handle = tokio::spawn(async move {
            updater
                .set(Counter {
                    value: 7,
                    label: "late".to_string(),
                })
                .unwrap();
        });

        let state = reader.changed().await.unwrap().clone();
        handle.await.unwrap();
        assert_eq!(state.value, 7);
    }

    #[tokio::test]
    async fn changed_errors_once_updater_is_gone() {
        let (updater, mut reader) = state_channel(Counter::default());
        drop(updater);

        assert_eq!(
            reader.changed().await.unwrap_err(),
            Error::updater_dropped("counter")
        );
    }
}
