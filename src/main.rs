#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod Reactions;
#[allow(non_snake_case)]
pub mod Thermodynamics;
#[allow(non_snake_case)]
pub mod Utils;
pub mod settings;

use Examples::gibbs_examples::gibbs_examples;
use Utils::logger::init_logger;
use log::warn;
use settings::Settings;
use simplelog::LevelFilter;

pub fn main() {
    // the logger needs the level from the settings, so load errors are reported afterwards
    let settings = Settings::try_new();
    let level = settings
        .as_ref()
        .map(Settings::log_level)
        .unwrap_or(LevelFilter::Info);
    if let Err(e) = init_logger(level, None) {
        eprintln!("{}", e);
    }
    if let Err(e) = &settings {
        warn!("{}; using default settings", e);
    }
    let task: usize = 0;
    gibbs_examples(task);
}
