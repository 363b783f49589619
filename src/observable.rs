use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

/// 默认每个观察者的队列长度
pub const DEFAULT_WATCH_CAPACITY: usize = 16;

/// Sends `value`, evicting the oldest queued entry when the queue is full.
///
/// `rx` must be a clone of the receiver paired with `tx`.
pub(crate) fn push_latest<T>(tx: &Sender<T>, rx: &Receiver<T>, value: T) -> bool {
    match tx.try_send(value) {
        Ok(()) => true,
        Err(TrySendError::Full(value)) => {
            let _ = rx.try_recv();
            tx.try_send(value).is_ok()
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Replay-latest value cell.
///
/// Every watcher first receives the current value, then each distinct update.
/// Setting a value equal to the current one notifies nobody.
pub struct Observable<T> {
    inner: Arc<ObservableInner<T>>,
}

struct ObservableInner<T> {
    state: Mutex<ObservableState<T>>,
    capacity: usize,
}

struct ObservableState<T> {
    value: T,
    watchers: Vec<WatcherSlot<T>>,
    next_id: u64,
}

impl<T: Clone + PartialEq> ObservableState<T> {
    fn replace(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value.clone();
        for watcher in &self.watchers {
            push_latest(&watcher.tx, &watcher.rx, value.clone());
        }
        true
    }
}

struct WatcherSlot<T> {
    id: u64,
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + Send> Observable<T> {
    pub fn new(initial: T) -> Self {
        Self::with_capacity(initial, DEFAULT_WATCH_CAPACITY)
    }

    pub fn with_capacity(initial: T, capacity: usize) -> Self {
        Self {
            inner: Arc::new(ObservableInner {
                state: Mutex::new(ObservableState {
                    value: initial,
                    watchers: Vec::new(),
                    next_id: 0,
                }),
                capacity: capacity.max(1),
            }),
        }
    }

    pub fn get(&self) -> T {
        lock(&self.inner.state).value.clone()
    }

    /// Returns whether the value changed.
    pub fn set(&self, value: T) -> bool {
        let mut state = lock(&self.inner.state);
        state.replace(value)
    }

    pub fn update<F: FnOnce(&T) -> T>(&self, f: F) -> bool {
        let mut state = lock(&self.inner.state);
        let next = f(&state.value);
        state.replace(next)
    }

    pub fn subscribe(&self) -> Watch<T> {
        let (tx, rx) = bounded(self.inner.capacity);
        let mut state = lock(&self.inner.state);
        let id = state.next_id;
        state.next_id += 1;
        push_latest(&tx, &rx, state.value.clone());
        state.watchers.push(WatcherSlot {
            id,
            tx,
            rx: rx.clone(),
        });

        Watch {
            id,
            rx,
            owner: Arc::downgrade(&self.inner),
        }
    }

    pub fn watcher_count(&self) -> usize {
        lock(&self.inner.state).watchers.len()
    }
}

/// Receiving end of an [`Observable`]; unregisters itself on drop.
pub struct Watch<T> {
    id: u64,
    rx: Receiver<T>,
    owner: Weak<ObservableInner<T>>,
}

impl<T> Watch<T> {
    pub fn receiver(&self) -> &Receiver<T> {
        &self.rx
    }

    pub fn try_recv(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<T> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Drains the queue and keeps only the newest value.
    pub fn latest(&self) -> Option<T> {
        self.rx.try_iter().last()
    }
}

impl<T> Drop for Watch<T> {
    fn drop(&mut self) {
        if let Some(owner) = self.owner.upgrade() {
            lock(&owner.state).watchers.retain(|w| w.id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_replays_current_value() {
        let observable = Observable::new(3);
        let watch = observable.subscribe();
        assert_eq!(watch.try_recv(), Some(3));
        assert_eq!(watch.try_recv(), None);
    }

    #[test]
    fn test_equal_values_are_conflated() {
        let observable = Observable::new(1);
        let watch = observable.subscribe();
        assert!(observable.set(2));
        assert!(!observable.set(2));
        assert!(observable.update(|v| v + 1));

        let seen: Vec<i32> = watch.receiver().try_iter().collect();
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(observable.get(), 3);
    }

    #[test]
    fn test_full_queue_keeps_newest() {
        let observable = Observable::with_capacity(0, 2);
        let watch = observable.subscribe();
        for v in 1..=5 {
            observable.set(v);
        }
        let seen: Vec<i32> = watch.receiver().try_iter().collect();
        assert_eq!(seen, vec![4, 5]);
    }

    #[test]
    fn test_dropped_watch_is_removed() {
        let observable = Observable::new("a".to_string());
        let first = observable.subscribe();
        let second = observable.subscribe();
        assert_eq!(observable.watcher_count(), 2);
        drop(first);
        assert_eq!(observable.watcher_count(), 1);
        observable.set("b".to_string());
        assert_eq!(second.latest(), Some("b".to_string()));
    }
}
