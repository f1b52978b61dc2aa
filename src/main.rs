//! Orb Blast entry point
//!
//! The web build wires the canvas and DOM; the native build plays a headless
//! session with the autopilot and records the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    orb_blast::platform::web::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Frames before a native demo run gives up (about ten minutes at 60 Hz)
#[cfg(not(target_arch = "wasm32"))]
const MAX_DEMO_FRAMES: u64 = 36_000;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use orb_blast::GameConfig;
    use orb_blast::highscores::FileStore;
    use orb_blast::platform::HeadlessRunner;
    use orb_blast::sim::Viewport;

    env_logger::init();
    log::info!("Orb Blast (native) starting...");
    log::info!("Native mode runs a headless autopilot session - run with `trunk serve` to play");

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse().unwrap_or_else(|_| {
            log::warn!("Seed {:?} is not a number, picking one", arg);
            rand::random()
        }),
        None => rand::random(),
    };

    let config = GameConfig::load();
    let mut store = FileStore::in_home();
    let mut runner = HeadlessRunner::new(seed, Viewport::new(1280.0, 720.0), config)
        .with_autopilot(true);
    let report = runner.run(MAX_DEMO_FRAMES, &mut store);

    println!(
        "seed {}: score {} after {} frames{} (best {})",
        seed,
        report.score,
        report.frames,
        if report.game_over { "" } else { ", survived" },
        report.best
    );
}
