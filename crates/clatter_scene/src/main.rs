//! Clatter playground
//!
//! Drops spheres and boxes onto a floor and plays an impact sound when they
//! land. Type `sphere`, `box`, `reset` or `quit` followed by Enter.
//!
//! Run with: cargo run --bin clatter

use clatter_audio::open_clip;
use clatter_scene::prelude::*;
use crossbeam_channel::Sender;
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = SceneConfig::load()?;

    let host = HeadlessHost::new(&config.camera).with_summary_interval(config.scene.summary_interval);
    let clip = open_clip(&config.audio);
    let mut playground = Playground::new(&config, host, clip)?;
    playground.spawn_initial(&config.scene.initial)?;

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        log::info!("Received Ctrl+C, shutting down...");
        r.store(false, Ordering::SeqCst);
    }) {
        log::warn!("Failed to set Ctrl+C handler: {}", e);
    }

    let (actions, inbox) = crossbeam_channel::unbounded();
    spawn_input_thread(actions, running.clone());
    playground.attach_panel(DebugPanel::new(config.scene.spawn.clone(), config.scene.seed), inbox);

    log::info!("Playground running. Commands: sphere, box, reset, quit");

    let mut clock = SystemClock::new();
    let mut scheduler =
        PacedScheduler::new(config.scene.target_fps, running).with_max_frames(config.scene.max_frames);
    playground.run(&mut clock, &mut scheduler)?;
    Ok(())
}

/// Read debug commands from stdin; `quit` stops the loop
fn spawn_input_thread(actions: Sender<DebugAction>, running: Arc<AtomicBool>) {
    let spawned = std::thread::Builder::new()
        .name("clatter-input".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                let command = line.trim();
                if command.is_empty() {
                    continue;
                }
                if command.eq_ignore_ascii_case("quit") || command.eq_ignore_ascii_case("q") {
                    running.store(false, Ordering::SeqCst);
                    return;
                }
                match command.parse::<DebugAction>() {
                    Ok(action) => {
                        if actions.send(action).is_err() {
                            return;
                        }
                    }
                    Err(e) => log::warn!("{}", e),
                }
            }
            // stdin closed: keep running until Ctrl+C or the frame limit
            log::debug!("Input closed");
        });

    if let Err(e) = spawned {
        log::warn!("Failed to start input thread: {}", e);
    }
}
