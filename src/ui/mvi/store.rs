use std::marker::PhantomData;

use tokio::sync::watch;

use super::reducer::Reducer;

/// Current state of one view model, observable through `watch` receivers.
pub struct StateStore<R: Reducer> {
    state: watch::Sender<R::State>,
    _reducer: PhantomData<fn() -> R>,
}

impl<R: Reducer> StateStore<R> {
    pub fn new() -> Self {
        Self::with_state(R::State::default())
    }

    pub fn with_state(initial: R::State) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            state,
            _reducer: PhantomData,
        }
    }

    /// Reduce `intent` into the current state. Watchers are only woken when
    /// the state actually changed.
    pub fn dispatch(&self, intent: R::Intent) {
        self.state.send_if_modified(|state| {
            let next = R::reduce(state.clone(), intent);
            if next == *state {
                return false;
            }
            *state = next;
            true
        });
    }

    pub fn snapshot(&self) -> R::State {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<R::State> {
        self.state.subscribe()
    }
}

impl<R: Reducer> Default for StateStore<R> {
    fn default() -> Self {
        Self::new()
    }
}
