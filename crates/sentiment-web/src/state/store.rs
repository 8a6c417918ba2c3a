use crate::models::{SurfaceEvent, SurfaceSnapshot, SurfaceState};
use crate::state::EventBus;
use parking_lot::Mutex;
use std::sync::Arc;

/// Owner of [`SurfaceState`].
///
/// Every successful mutation publishes a `StateChanged` snapshot on the event
/// bus while the lock is still held, so observers see snapshots in mutation
/// order. Callers must never await inside an update closure.
pub struct StateStore {
    state: Mutex<SurfaceState>,
    events: Arc<EventBus>,
}

impl StateStore {
    pub fn new(events: Arc<EventBus>) -> Self {
        Self {
            state: Mutex::new(SurfaceState::default()),
            events,
        }
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Current state, with derived fields
    pub fn snapshot(&self) -> SurfaceSnapshot {
        SurfaceSnapshot::from(&*self.state.lock())
    }

    /// Read without mutating or notifying
    pub fn read<R>(&self, f: impl FnOnce(&SurfaceState) -> R) -> R {
        f(&self.state.lock())
    }

    /// Mutate and notify
    pub fn update<R>(&self, f: impl FnOnce(&mut SurfaceState) -> R) -> R {
        let mut state = self.state.lock();
        let out = f(&mut state);
        self.events
            .publish(SurfaceEvent::StateChanged(SurfaceSnapshot::from(&*state)));
        out
    }

    /// Mutate and notify only when `f` succeeds. `f` must leave the state
    /// untouched when it returns `Err`.
    pub fn try_update<T, E>(
        &self,
        f: impl FnOnce(&mut SurfaceState) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut state = self.state.lock();
        let out = f(&mut state)?;
        self.events
            .publish(SurfaceEvent::StateChanged(SurfaceSnapshot::from(&*state)));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> StateStore {
        StateStore::new(Arc::new(EventBus::default()))
    }

    #[tokio::test]
    async fn test_update_publishes_snapshot() {
        let store = store();
        let mut rx = store.events().subscribe();

        store.update(|s| s.input_text = "hello".to_string());

        match rx.recv().await.unwrap() {
            SurfaceEvent::StateChanged(snapshot) => assert_eq!(snapshot.input_text, "hello"),
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(store.read(|s| s.input_text.clone()), "hello");
    }

    #[tokio::test]
    async fn test_failed_try_update_is_silent() {
        let store = store();
        let mut rx = store.events().subscribe();

        let result: Result<(), &str> = store.try_update(|_| Err("nope"));
        assert_eq!(result, Err("nope"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_read_does_not_notify() {
        let store = store();
        let mut rx = store.events().subscribe();

        assert!(!store.read(|s| s.busy));
        assert!(rx.try_recv().is_err());
    }
}
