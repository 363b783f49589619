use log::{error, info};
use std::collections::HashMap;
use std::f32::consts::TAU;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::platform::{ListenerId, SensorCallback, SensorPlatform};
use crate::observable::lock;
use crate::types::{SensorDelay, SensorEvent, SensorKind};

/// 最快档位下的最小发送间隔
const MIN_PERIOD: Duration = Duration::from_millis(5);

/// Synthetic vehicle rocking on an uneven track.
#[derive(Debug, Clone, Copy)]
pub struct VehicleMotion {
    pub roll_amplitude_deg: f32,
    pub pitch_amplitude_deg: f32,
    pub lateral_amplitude: f32,
    pub longitudinal_amplitude: f32,
}

impl Default for VehicleMotion {
    fn default() -> Self {
        Self {
            roll_amplitude_deg: 8.0,
            pitch_amplitude_deg: 4.0,
            lateral_amplitude: 1.5,
            longitudinal_amplitude: 2.5,
        }
    }
}

impl VehicleMotion {
    /// Sensor values for `kind` at `t` seconds.
    pub fn sample(&self, kind: SensorKind, t: f32) -> Vec<f32> {
        match kind {
            SensorKind::RotationVector => {
                let roll = self.roll_amplitude_deg * (TAU * 0.2 * t).sin();
                let pitch = self.pitch_amplitude_deg * (TAU * 0.13 * t + 1.0).sin();
                let heading = 2.0 * (TAU * 0.02 * t).sin();
                rotation_vector(roll, pitch, heading).to_vec()
            }
            SensorKind::LinearAcceleration => vec![
                self.lateral_amplitude * (TAU * 0.3 * t).sin(),
                self.longitudinal_amplitude * (TAU * 0.1 * t).sin(),
                0.05 * (TAU * 1.7 * t).sin(),
            ],
        }
    }
}

/// Unit quaternion `[x, y, z, w]` for heading about Z, then pitch about X, then roll about Y.
fn rotation_vector(roll_deg: f32, pitch_deg: f32, heading_deg: f32) -> [f32; 4] {
    let axis = |ax: f32, ay: f32, az: f32, deg: f32| {
        let half = deg.to_radians() / 2.0;
        let s = half.sin();
        [ax * s, ay * s, az * s, half.cos()]
    };
    let mul = |a: [f32; 4], b: [f32; 4]| {
        let [ax, ay, az, aw] = a;
        let [bx, by, bz, bw] = b;
        [
            aw * bx + ax * bw + ay * bz - az * by,
            aw * by - ax * bz + ay * bw + az * bx,
            aw * bz + ax * by - ay * bx + az * bw,
            aw * bw - ax * bx - ay * by - az * bz,
        ]
    };

    let heading = axis(0.0, 0.0, 1.0, -heading_deg);
    let pitch = axis(1.0, 0.0, 0.0, -pitch_deg);
    let roll = axis(0.0, 1.0, 0.0, roll_deg);
    mul(mul(heading, pitch), roll)
}

struct SimulatedListener {
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

/// [`SensorPlatform`] that feeds synthetic events from one thread per listener.
pub struct SimulatedPlatform {
    motion: VehicleMotion,
    unavailable: Vec<SensorKind>,
    listeners: Mutex<HashMap<ListenerId, SimulatedListener>>,
    next_id: AtomicU64,
    started: Instant,
}

impl SimulatedPlatform {
    pub fn new(motion: VehicleMotion) -> Self {
        Self {
            motion,
            unavailable: Vec::new(),
            listeners: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            started: Instant::now(),
        }
    }

    /// Pretends the device has no sensor of this kind.
    pub fn without(mut self, kind: SensorKind) -> Self {
        self.unavailable.push(kind);
        self
    }

    pub fn active_listeners(&self) -> usize {
        lock(&self.listeners).len()
    }
}

impl SensorPlatform for SimulatedPlatform {
    fn register_listener(
        &self,
        kind: SensorKind,
        delay: SensorDelay,
        callback: SensorCallback,
    ) -> Option<ListenerId> {
        if self.unavailable.contains(&kind) {
            return None;
        }

        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let shutdown = Arc::new(AtomicBool::new(false));
        let period = Duration::from_micros(delay.period_us()).max(MIN_PERIOD);
        let motion = self.motion;
        let started = self.started;
        let thread_shutdown = Arc::clone(&shutdown);

        let spawned = thread::Builder::new()
            .name(format!("sim-{}", kind))
            .spawn(move || {
                while !thread_shutdown.load(Ordering::Relaxed) {
                    let elapsed = started.elapsed();
                    let event = SensorEvent::new(
                        kind,
                        motion.sample(kind, elapsed.as_secs_f32()),
                        elapsed.as_nanos() as i64,
                    );
                    callback(&event);
                    thread::sleep(period);
                }
            });

        match spawned {
            Ok(handle) => {
                lock(&self.listeners).insert(
                    id,
                    SimulatedListener {
                        shutdown,
                        handle: Some(handle),
                    },
                );
                info!("Simulated {} sensor started ({:?} period)", kind, period);
                Some(id)
            }
            Err(e) => {
                error!("Failed to start simulated {} sensor: {}", kind, e);
                None
            }
        }
    }

    fn unregister_listener(&self, id: ListenerId) {
        let listener = lock(&self.listeners).remove(&id);
        if let Some(mut listener) = listener {
            listener.shutdown.store(true, Ordering::Relaxed);
            if let Some(handle) = listener.handle.take() {
                if handle.join().is_err() {
                    error!("Simulated sensor thread for {} panicked", id);
                }
            }
        }
    }
}

impl Drop for SimulatedPlatform {
    fn drop(&mut self) {
        let listeners: Vec<ListenerId> = lock(&self.listeners).keys().copied().collect();
        for id in listeners {
            self.unregister_listener(id);
        }
    }
}
