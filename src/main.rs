use dotenv::dotenv;
use log::{error, info, warn};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use inclinometer4x4::calibration::{FilePreferenceStore, PREFS_NAMESPACE};
use inclinometer4x4::config::{AppConfig, ConfigManager};
use inclinometer4x4::logger;
use inclinometer4x4::sensors::{SimulatedPlatform, VehicleMotion};
use inclinometer4x4::{PresentationState, Result, SensorHub};

fn main() {
    dotenv().ok(); // 加载 .env 文件

    let manager = match ConfigManager::from_env() {
        Ok(manager) => manager,
        Err(e) => {
            logger::init_logger("info");
            error!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };
    let config = manager.get_config();

    logger::init_logger(&config.logging.level);
    match manager.config_path() {
        Some(path) => info!("Application starting with config {}", path.display()),
        None => info!("Application starting with default config"),
    }

    if let Err(e) = run(config) {
        error!("Inclinometer failed: {}", e);
        std::process::exit(1);
    }

    info!("Application finished");
}

fn run(config: &AppConfig) -> Result<()> {
    let prefs = Arc::new(FilePreferenceStore::open(
        config.get_storage_path(),
        PREFS_NAMESPACE,
        config.storage.auto_create_dir,
    )?);
    let platform = Arc::new(SimulatedPlatform::new(VehicleMotion::default()));
    let hub = SensorHub::new(platform.clone(), prefs, &config.sensors);

    let mut dashboard = PresentationState::new("dashboard", &hub);
    let mut pane = PresentationState::new("head-unit", &hub);
    dashboard.start();
    pane.start();

    let demo = &config.demo;
    let frame = Duration::from_millis(demo.frame_interval_ms);
    let readout_interval = Duration::from_millis(demo.readout_interval_ms);
    let duration = Duration::from_secs_f64(demo.duration_seconds);
    // 负数表示不自动校准
    let mut calibrate_at = (demo.calibrate_after_seconds >= 0.0)
        .then(|| Duration::from_secs_f64(demo.calibrate_after_seconds));

    let started = Instant::now();
    let mut last_readout = started;

    while started.elapsed() < duration {
        dashboard.update();
        pane.update();

        if calibrate_at.is_some_and(|at| started.elapsed() >= at) {
            calibrate_at = None;
            match dashboard.calibrate() {
                Ok(offset) => info!(
                    "Dashboard calibrated: roll {:.2}, pitch {:.2}",
                    offset.roll, offset.pitch
                ),
                // 偏移已在内存中生效，只是没有保存
                Err(e) => warn!("Calibration not saved: {}", e),
            }
        }

        if last_readout.elapsed() >= readout_interval {
            last_readout = Instant::now();
            let g = dashboard.g_force();
            info!(
                "{} | g: ({:.2}, {:.2}) peak {:.2} | {}: {}",
                dashboard.readout(),
                g.x,
                g.y,
                dashboard.peak_g_force(),
                pane.name(),
                pane.readout()
            );
        }

        thread::sleep(frame);
    }

    dashboard.stop();
    pane.stop();
    info!(
        "Stopped, {} simulated listener(s) pending release",
        platform.active_listeners()
    );

    Ok(())
}
