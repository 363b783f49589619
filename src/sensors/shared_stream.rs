use crossbeam_channel::{after, bounded, Receiver, Sender};
use log::{debug, info, trace, warn};
use std::sync::{Arc, Mutex, Weak};
use std::thread;
use std::time::Duration;

use super::platform::{ListenerId, SensorCallback, SensorPlatform};
use crate::observable::{lock, push_latest};
use crate::types::{SensorDelay, SensorEvent, SensorKind};

/// Turns one platform event into a sample; `None` drops the event.
pub type Decoder<T> = Arc<dyn Fn(&SensorEvent) -> Option<T> + Send + Sync>;

/// Hot, multicast, replay-latest stream over one sensor.
///
/// One platform listener is registered while at least one [`Subscription`]
/// exists. When the last subscription is dropped the listener stays
/// registered for the grace period; a new subscriber arriving in that window
/// reuses it and immediately receives the cached latest sample.
pub struct SharedSensorStream<T> {
    inner: Arc<StreamInner<T>>,
}

impl<T> Clone for SharedSensorStream<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct StreamInner<T> {
    kind: SensorKind,
    delay: SensorDelay,
    grace: Duration,
    capacity: usize,
    platform: Arc<dyn SensorPlatform>,
    decoder: Decoder<T>,
    // 锁顺序：lifecycle -> state。平台回调只会获取 state
    lifecycle: Mutex<Lifecycle>,
    state: Mutex<StreamState<T>>,
}

#[derive(Default)]
struct Lifecycle {
    /// A registration attempt is in effect (even if the sensor turned out missing)
    active: bool,
    listener: Option<ListenerId>,
}

struct StreamState<T> {
    subscribers: Vec<SubscriberSlot<T>>,
    next_id: u64,
    latest: Option<T>,
    release_epoch: u64,
}

struct SubscriberSlot<T> {
    id: u64,
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T: Clone + Send + 'static> SharedSensorStream<T> {
    pub fn new(
        platform: Arc<dyn SensorPlatform>,
        kind: SensorKind,
        delay: SensorDelay,
        grace: Duration,
        capacity: usize,
        decoder: Decoder<T>,
    ) -> Self {
        Self {
            inner: Arc::new(StreamInner {
                kind,
                delay,
                grace,
                capacity: capacity.max(1),
                platform,
                decoder,
                lifecycle: Mutex::new(Lifecycle::default()),
                state: Mutex::new(StreamState {
                    subscribers: Vec::new(),
                    next_id: 0,
                    latest: None,
                    release_epoch: 0,
                }),
            }),
        }
    }

    pub fn subscribe(&self) -> Subscription<T> {
        let mut lifecycle = lock(&self.inner.lifecycle);
        if !lifecycle.active {
            self.inner.start(&mut lifecycle);
        }

        let (tx, rx) = bounded(self.inner.capacity);
        let mut state = lock(&self.inner.state);
        // 取消尚未执行的延迟释放
        state.release_epoch += 1;
        if let Some(latest) = state.latest.clone() {
            push_latest(&tx, &rx, latest);
        }
        let id = state.next_id;
        state.next_id += 1;
        state.subscribers.push(SubscriberSlot {
            id,
            tx,
            rx: rx.clone(),
        });
        debug!(
            "{} stream: subscriber {} added ({} active)",
            self.inner.kind,
            id,
            state.subscribers.len()
        );

        Subscription {
            id,
            rx,
            owner: Arc::clone(&self.inner),
        }
    }

    /// Last successfully decoded sample, if any arrived yet.
    pub fn latest(&self) -> Option<T> {
        lock(&self.inner.state).latest.clone()
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner.state).subscribers.len()
    }

    /// Whether a platform listener is currently registered.
    pub fn is_listening(&self) -> bool {
        lock(&self.inner.lifecycle).listener.is_some()
    }

    pub fn kind(&self) -> SensorKind {
        self.inner.kind
    }
}

impl<T: Clone + Send + 'static> StreamInner<T> {
    fn start(self: &Arc<Self>, lifecycle: &mut Lifecycle) {
        lifecycle.active = true;

        let weak: Weak<StreamInner<T>> = Arc::downgrade(self);
        let callback: SensorCallback = Arc::new(move |event: &SensorEvent| {
            if let Some(inner) = weak.upgrade() {
                inner.publish(event);
            }
        });

        match self
            .platform
            .register_listener(self.kind, self.delay, callback)
        {
            Some(id) => {
                info!("{} sensor: registered {} ({:?})", self.kind, id, self.delay);
                lifecycle.listener = Some(id);
            }
            None => {
                warn!("{} sensor unavailable, stream will not emit", self.kind);
            }
        }
    }

    fn publish(&self, event: &SensorEvent) {
        if event.kind != self.kind {
            return;
        }
        let value = match (self.decoder)(event) {
            Some(value) => value,
            None => {
                trace!("{} sensor: dropped sample {:?}", self.kind, event.values);
                return;
            }
        };

        let mut state = lock(&self.state);
        for subscriber in &state.subscribers {
            push_latest(&subscriber.tx, &subscriber.rx, value.clone());
        }
        state.latest = Some(value);
    }

    fn unsubscribe(self: &Arc<Self>, id: u64) {
        let mut state = lock(&self.state);
        state.subscribers.retain(|s| s.id != id);
        if !state.subscribers.is_empty() {
            return;
        }
        state.release_epoch += 1;
        let epoch = state.release_epoch;
        drop(state);

        debug!(
            "{} stream: last subscriber left, releasing in {:?}",
            self.kind, self.grace
        );

        let inner = Arc::clone(self);
        let spawned = thread::Builder::new()
            .name(format!("{}-release", self.kind))
            .spawn(move || {
                let _ = after(inner.grace).recv();
                inner.release_if_idle(epoch);
            });

        if let Err(e) = spawned {
            warn!("{} stream: failed to spawn release timer: {}", self.kind, e);
            self.release_if_idle(epoch);
        }
    }

    fn release_if_idle(&self, epoch: u64) {
        let mut lifecycle = lock(&self.lifecycle);
        {
            let state = lock(&self.state);
            if !state.subscribers.is_empty() || state.release_epoch != epoch {
                return;
            }
        }
        if !lifecycle.active {
            return;
        }
        lifecycle.active = false;
        if let Some(id) = lifecycle.listener.take() {
            self.platform.unregister_listener(id);
            info!("{} sensor: unregistered {}", self.kind, id);
        }
    }
}

/// Receiving side of a [`SharedSensorStream`]. Dropping it unsubscribes.
pub struct Subscription<T: Clone + Send + 'static> {
    id: u64,
    rx: Receiver<T>,
    owner: Arc<StreamInner<T>>,
}

impl<T: Clone + Send + 'static> Subscription<T> {
    pub fn receiver(&self) -> &Receiver<T> {
        &self.rx
    }

    pub fn try_recv(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<T> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// All queued samples, oldest first.
    pub fn drain(&self) -> Vec<T> {
        self.rx.try_iter().collect()
    }
}

impl<T: Clone + Send + 'static> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.owner.unsubscribe(self.id);
    }
}
