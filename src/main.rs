mod app;
mod assets;
mod config;
mod hero;
mod input;
mod render;

use config::Preset;

fn main() {
    env_logger::init();
    log::info!("herotoy starting up");

    // Swap for Preset::street() to get the ground-only variant
    // (800x600, no gravity, no crouch).
    if let Err(e) = app::run(Preset::rooftop()) {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
