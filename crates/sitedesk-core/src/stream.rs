// ── Reactive store subscriptions ──
//
// Subscription handle over a store's state channel: snapshot access plus
// change notification via `changed()` or a `Stream`.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::StoreState;

/// A subscription to one store's state.
pub struct StateStream<T: Send + Sync + 'static> {
    current: StoreState<T>,
    receiver: watch::Receiver<StoreState<T>>,
}

impl<T: Send + Sync + 'static> StateStream<T> {
    pub(crate) fn new(mut receiver: watch::Receiver<StoreState<T>>) -> Self {
        let current = receiver.borrow_and_update().clone();
        Self { current, receiver }
    }

    /// The state captured at creation or at the last `changed()`.
    pub fn current(&self) -> &StoreState<T> {
        &self.current
    }

    /// The latest state (may have changed since creation).
    pub fn latest(&self) -> StoreState<T> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change. `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<StoreState<T>> {
        self.receiver.changed().await.ok()?;
        let state = self.receiver.borrow_and_update().clone();
        self.current = state.clone();
        Some(state)
    }

    pub fn into_stream(self) -> StateWatchStream<T> {
        StateWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter yielding each new state.
pub struct StateWatchStream<T: Send + Sync + 'static> {
    inner: WatchStream<StoreState<T>>,
}

impl<T: Send + Sync + 'static> Stream for StateWatchStream<T> {
    type Item = StoreState<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
