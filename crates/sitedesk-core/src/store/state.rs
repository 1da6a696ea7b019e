// ── Observable store state ──
//
// One `watch` channel per store carries the composed items, the loading
// flag and the error slot. Loading is derived from a count of in-flight
// operations, so overlapping calls never clear each other's flag.

use std::sync::Arc;

use tokio::sync::watch;

/// Point-in-time view of a store.
#[derive(Debug)]
pub struct StoreState<T> {
    pub items: Arc<Vec<Arc<T>>>,
    pub loading: bool,
    /// Message from the most recent failed operation.
    pub error: Option<String>,
    in_flight: usize,
}

impl<T> Clone for StoreState<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            loading: self.loading,
            error: self.error.clone(),
            in_flight: self.in_flight,
        }
    }
}

impl<T> Default for StoreState<T> {
    fn default() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            loading: false,
            error: None,
            in_flight: 0,
        }
    }
}

pub(crate) struct StateCell<T> {
    state: watch::Sender<StoreState<T>>,
}

impl<T: Send + Sync + 'static> StateCell<T> {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self { state }
    }

    pub(crate) fn snapshot(&self) -> StoreState<T> {
        self.state.borrow().clone()
    }

    pub(crate) fn items(&self) -> Arc<Vec<Arc<T>>> {
        Arc::clone(&self.state.borrow().items)
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<StoreState<T>> {
        self.state.subscribe()
    }

    /// Mark an operation in flight and clear the error slot.
    ///
    /// The returned guard ends the operation when dropped, on every path.
    pub(crate) fn begin(&self) -> LoadingGuard<'_, T> {
        self.state.send_modify(|s| {
            s.in_flight += 1;
            s.loading = true;
            s.error = None;
        });
        LoadingGuard { cell: self }
    }

    pub(crate) fn set_items(&self, items: Vec<T>) {
        let items = Arc::new(items.into_iter().map(Arc::new).collect());
        self.state.send_modify(|s| s.items = items);
    }

    pub(crate) fn set_error(&self, message: String) {
        self.state.send_modify(|s| s.error = Some(message));
    }
}

pub(crate) struct LoadingGuard<'a, T> {
    cell: &'a StateCell<T>,
}

impl<T> Drop for LoadingGuard<'_, T> {
    fn drop(&mut self) {
        self.cell.state.send_modify(|s| {
            s.in_flight = s.in_flight.saturating_sub(1);
            s.loading = s.in_flight > 0;
        });
    }
}
