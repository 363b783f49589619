//! Synchronous sensor platform double for unit tests.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::platform::{ListenerId, SensorCallback, SensorPlatform};
use crate::observable::lock;
use crate::types::{SensorDelay, SensorEvent, SensorKind};

pub struct ManualPlatform {
    listeners: Mutex<Vec<(ListenerId, SensorKind, SensorCallback)>>,
    unavailable: Vec<SensorKind>,
    next_id: AtomicU64,
    attempts: AtomicUsize,
    registrations: AtomicUsize,
    unregistrations: AtomicUsize,
    clock_ns: AtomicU64,
}

impl ManualPlatform {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            unavailable: Vec::new(),
            next_id: AtomicU64::new(1),
            attempts: AtomicUsize::new(0),
            registrations: AtomicUsize::new(0),
            unregistrations: AtomicUsize::new(0),
            clock_ns: AtomicU64::new(0),
        }
    }

    pub fn without(mut self, kind: SensorKind) -> Self {
        self.unavailable.push(kind);
        self
    }

    /// Delivers one event to every listener of `kind`, on the calling thread.
    pub fn emit(&self, kind: SensorKind, values: &[f32]) {
        self.emit_foreign(kind, kind, values);
    }

    /// Delivers an event of `event_kind` to the listeners registered for `listener_kind`.
    pub fn emit_foreign(&self, listener_kind: SensorKind, event_kind: SensorKind, values: &[f32]) {
        let timestamp_ns = self.clock_ns.fetch_add(20_000_000, Ordering::SeqCst) as i64;
        let event = SensorEvent::new(event_kind, values.to_vec(), timestamp_ns);
        let callbacks: Vec<SensorCallback> = lock(&self.listeners)
            .iter()
            .filter(|(_, k, _)| *k == listener_kind)
            .map(|(_, _, cb)| cb.clone())
            .collect();
        for callback in callbacks {
            callback(&event);
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }

    pub fn unregistrations(&self) -> usize {
        self.unregistrations.load(Ordering::SeqCst)
    }

    pub fn active_listeners(&self) -> usize {
        lock(&self.listeners).len()
    }
}

impl SensorPlatform for ManualPlatform {
    fn register_listener(
        &self,
        kind: SensorKind,
        _delay: SensorDelay,
        callback: SensorCallback,
    ) -> Option<ListenerId> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.contains(&kind) {
            return None;
        }
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::SeqCst));
        lock(&self.listeners).push((id, kind, callback));
        self.registrations.fetch_add(1, Ordering::SeqCst);
        Some(id)
    }

    fn unregister_listener(&self, id: ListenerId) {
        let mut listeners = lock(&self.listeners);
        let before = listeners.len();
        listeners.retain(|(existing, _, _)| *existing != id);
        if listeners.len() != before {
            self.unregistrations.fetch_add(1, Ordering::SeqCst);
        }
    }
}
