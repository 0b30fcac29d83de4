//! Main application entry point.

use overdraw_app::{App, AppConfig};

fn main() {
    env_logger::init();
    log::info!("Starting Overdraw");

    let result =
        AppConfig::from_args(std::env::args().skip(1)).and_then(|config| App::run(&config));
    if let Err(e) = result {
        eprintln!("overdraw: {e}");
        std::process::exit(1);
    }
}
