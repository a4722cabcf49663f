//! A process-wide level override, and logger initialization for hosts.
//!
//! get_level() returns None until set_level is called.
use log::LevelFilter;
use simplelog::{CombinedLogger, SharedLogger, TermLogger, TerminalMode, WriteLogger};
use std::{
    fs::File,
    path::Path,
    sync::atomic::{AtomicU8, Ordering},
};

// zero is unset
static LOG_LEVEL: AtomicU8 = AtomicU8::new(0);

const LEVELS: [LevelFilter; 6] = [
    LevelFilter::Off,
    LevelFilter::Error,
    LevelFilter::Warn,
    LevelFilter::Info,
    LevelFilter::Debug,
    LevelFilter::Trace,
];

pub fn set_level(level: LevelFilter) {
    let index = LEVELS
        .iter()
        .position(|candidate| *candidate == level)
        .unwrap_or(0);

    LOG_LEVEL.store(index as u8 + 1, Ordering::SeqCst);
}

pub fn get_level() -> Option<LevelFilter> {
    match LOG_LEVEL.load(Ordering::SeqCst) {
        0 => None,
        n => LEVELS.get(n as usize - 1).copied(),
    }
}

/// Logs to stderr, and to the file if one is provided.  Panics are logged at error level.
///
/// The level is taken from `set_level`, and otherwise defaults to info.
pub fn init(log_file: Option<&Path>) -> anyhow::Result<()> {
    let config = simplelog::ConfigBuilder::new()
        .set_time_format_str("%H:%M:%S%.3f BDG")
        .build();

    let level = get_level().unwrap_or(LevelFilter::Info);

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
    )];

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        loggers.push(WriteLogger::new(level, config, File::create(path)?));
    }

    CombinedLogger::init(loggers).map_err(|err| anyhow::Error::msg(err.to_string()))?;
    log_panics::init();

    Ok(())
}
