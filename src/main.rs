//! Circle Sim headless driver
//!
//! Usage: `circle-sim [settings.json] [frames]`
//!
//! Runs the engine at its nominal framerate while a control thread pokes it
//! through a `ControlHandle`, the way a UI panel would. Set `RUST_LOG=info`
//! (or `debug`) to watch it.

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};

use circle_sim::render;
use circle_sim::sim::{ControlHandle, Engine, SpawnerConfig, Vector2};
use circle_sim::Settings;

const DEFAULT_SETTINGS_PATH: &str = "circle-sim.json";
const DEFAULT_FRAMES: u64 = 600;

/// Spawner used when the settings file configures none
fn default_spawner() -> SpawnerConfig {
    SpawnerConfig::new(
        "spawner",
        Vector2::new(200.0, 200.0),
        Vector2::new(1000.0, -1000.0),
        0.2,
    )
}

/// Scripted control panel: adds a second spawner, flips gravity sideways,
/// pauses briefly, then restores everything. Stops early once `shutdown`
/// disconnects.
fn control_script(handle: ControlHandle, shutdown: Receiver<()>) {
    let wait_until = |sim_seconds: f64| loop {
        if handle.snapshot().time >= sim_seconds {
            return true;
        }
        match shutdown.recv_timeout(Duration::from_millis(20)) {
            Err(RecvTimeoutError::Timeout) => continue,
            _ => return false,
        }
    };

    if !wait_until(2.0) {
        return;
    }
    log::info!("control: adding spawner 'right'");
    let right = SpawnerConfig::new(
        "right",
        Vector2::new(500.0, 200.0),
        Vector2::new(-800.0, -600.0),
        0.3,
    );
    handle.add_spawner(right);

    if !wait_until(4.0) {
        return;
    }
    let gravity = handle.snapshot().gravity;
    log::info!("control: gravity sideways");
    handle.set_gravity_components(gravity.y, 0.0);

    if !wait_until(6.0) {
        return;
    }
    log::info!("control: pause for 250ms");
    handle.toggle_pause();
    thread::sleep(Duration::from_millis(250));
    log::info!(
        "control: paused={} bodies={}",
        handle.is_paused(),
        handle.body_count()
    );
    handle.toggle_pause();
    handle.set_gravity(gravity);
    handle.remove_spawner("right");
}

fn main() {
    env_logger::init();
    log::info!("Circle Sim (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings_path = args.next().unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_string());
    let frames = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(frames)) => frames,
        Some(Err(e)) => {
            log::warn!("Bad frame count ({}), using {}", e, DEFAULT_FRAMES);
            DEFAULT_FRAMES
        }
        None => DEFAULT_FRAMES,
    };

    let mut settings = Settings::load_or_default(&settings_path);
    if settings.spawners.is_empty() {
        settings.spawners.push(default_spawner());
    }

    let mut engine = Engine::from_settings(&settings);
    log::info!(
        "Engine: {} Hz x {} substeps, {} threads, grid {}",
        engine.framerate(),
        engine.substeps(),
        engine.thread_count(),
        engine.grid().info()
    );

    let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded::<()>(0);
    let control = {
        let handle = engine.handle();
        thread::Builder::new()
            .name("control".to_string())
            .spawn(move || control_script(handle, shutdown_rx))
    };
    if let Err(e) = &control {
        log::warn!("Control thread failed to start: {}", e);
    }

    let mut next_frame = Instant::now();
    for frame in 0..frames {
        let frame_time = Duration::from_secs_f32(engine.frame_dt());
        engine.step();

        // What a renderer would upload this frame
        let circles = render::instances(engine.bodies());
        let markers = render::spawner_markers(engine.spawners());

        if frame % u64::from(engine.framerate()) == 0 {
            log::info!(
                "t={:.2}s bodies={} markers={} ke={:.0} bytes={}",
                engine.time(),
                engine.body_count(),
                markers.len(),
                engine.total_kinetic_energy(),
                render::as_bytes(&circles).len()
            );
        }

        next_frame += frame_time;
        let now = Instant::now();
        if next_frame > now {
            thread::sleep(next_frame - now);
        } else {
            next_frame = now;
        }
    }

    log::info!(
        "Done: {} bodies after {:.2}s simulated",
        engine.body_count(),
        engine.time()
    );
    log::debug!("Final grid occupancy:\n{}", engine.grid());

    drop(shutdown_tx);
    if let Ok(control) = control {
        let _ = control.join();
    }
}
