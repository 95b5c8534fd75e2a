//! View state: `Idle -> Loading -> Ready`
//!
//! Both the catalog view and the recommendation resolver drive the same
//! [`Loader`]. Every load is issued a [`Ticket`] carrying the generation at
//! the time it started; a completion is only published if no newer load (or
//! reset) has been issued since, so a slow stale response can never replace a
//! fresher one.

use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

pub mod catalog;
pub mod recommendations;

pub use catalog::CatalogView;
pub use recommendations::RecommendationResolver;

/// There is no error state: data sources always eventually yield a snapshot.
pub enum LoadState<T> {
    Idle,
    Loading,
    Ready(Arc<T>),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool { matches!(self, Self::Loading) }
    pub fn is_idle(&self) -> bool { matches!(self, Self::Idle) }

    pub fn ready(&self) -> Option<&Arc<T>> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> Clone for LoadState<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Idle => Self::Idle,
            Self::Loading => Self::Loading,
            Self::Ready(value) => Self::Ready(Arc::clone(value)),
        }
    }
}

impl<T> fmt::Debug for LoadState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Loading => write!(f, "Loading"),
            Self::Ready(_) => write!(f, "Ready"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

/// What subscribers observe.
pub struct Tracked<T> {
    generation: u64,
    key: Option<String>,
    state: LoadState<T>,
}

impl<T> Tracked<T> {
    pub fn generation(&self) -> u64 { self.generation }
    pub fn key(&self) -> Option<&str> { self.key.as_deref() }
    pub fn state(&self) -> &LoadState<T> { &self.state }
}

pub struct Loader<T> {
    slot: watch::Sender<Tracked<T>>,
}

impl<T> Loader<T> {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(Tracked { generation: 0, key: None, state: LoadState::Idle });
        Self { slot }
    }

    /// Starts a load for `key`, superseding any load still in flight.
    pub fn begin(&self, key: Option<String>) -> Ticket {
        let mut ticket = Ticket(0);
        self.slot.send_modify(|t| {
            t.generation += 1;
            t.key = key;
            t.state = LoadState::Loading;
            ticket = Ticket(t.generation);
        });
        ticket
    }

    /// Publishes `value` if `ticket` is still current. Returns whether it was.
    pub fn complete(&self, ticket: Ticket, value: T) -> bool {
        self.slot.send_if_modified(|t| {
            if t.generation != ticket.0 {
                return false;
            }
            t.state = LoadState::Ready(Arc::new(value));
            true
        })
    }

    /// Back to `Idle`; loads still in flight will be discarded.
    pub fn reset(&self) {
        self.slot.send_modify(|t| {
            t.generation += 1;
            t.key = None;
            t.state = LoadState::Idle;
        });
    }

    pub fn state(&self) -> LoadState<T> { self.slot.borrow().state.clone() }
    pub fn key(&self) -> Option<String> { self.slot.borrow().key.clone() }
    pub fn subscribe(&self) -> watch::Receiver<Tracked<T>> { self.slot.subscribe() }
}

impl<T> Default for Loader<T> {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let loader: Loader<u32> = Loader::new();
        assert!(loader.state().is_idle());
        let t = loader.begin(None);
        assert!(loader.state().is_loading());
        assert!(loader.complete(t, 7));
        assert_eq!(loader.state().ready().map(|v| **v), Some(7));
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let loader: Loader<&str> = Loader::new();
        let first = loader.begin(Some("a".into()));
        let second = loader.begin(Some("b".into()));
        assert!(loader.complete(second, "fresh"));
        assert!(!loader.complete(first, "stale"));
        assert_eq!(loader.state().ready().map(|v| **v), Some("fresh"));
        assert_eq!(loader.key().as_deref(), Some("b"));
    }

    #[test]
    fn test_reset_invalidates_in_flight_load() {
        let loader: Loader<u32> = Loader::new();
        let t = loader.begin(None);
        loader.reset();
        assert!(!loader.complete(t, 1));
        assert!(loader.state().is_idle());
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let loader: Loader<u32> = Loader::new();
        let mut rx = loader.subscribe();
        let t = loader.begin(None);
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().state().is_loading());
        loader.complete(t, 3);
        rx.changed().await.unwrap();
        let seen = rx.borrow_and_update();
        assert!(seen.state().ready().is_some());
        assert_eq!(seen.generation(), 1);
    }
}
