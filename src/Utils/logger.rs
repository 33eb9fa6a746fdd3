use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::File;

/// Parses a level name from the settings file; unknown names fall back to `Info`.
pub fn level_from_name(name: &str) -> LevelFilter {
    let name = name.trim();
    if name.eq_ignore_ascii_case("warning") {
        return LevelFilter::Warn;
    }
    name.parse().unwrap_or(LevelFilter::Info)
}

/// Terminal logger, plus a file logger when `log_file` is given.
/// Calling it a second time is harmless: the first logger stays installed.
pub fn init_logger(level: LevelFilter, log_file: Option<&str>) -> Result<(), String> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        let file = File::create(path)
            .map_err(|e| format!("Failed to create log file '{}': {}", path, e))?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }
    if CombinedLogger::init(loggers).is_err() {
        log::debug!("logger already initialised");
    }
    Ok(())
}
