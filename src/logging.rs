//! Opt-in file logging.
//!
//! `LOLIKIT_LOG=<level>` turns logging on; records go to `LOLIKIT_LOG_FILE`
//! or `<cache dir>/lolikit/lolikit.log`. Stdout stays free for the selector.

use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::env;
use std::fs::{self, File};
use std::path::PathBuf;

pub fn level_from(raw: &str) -> Option<LevelFilter> {
    raw.trim().parse().ok()
}

fn log_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("LOLIKIT_LOG_FILE") {
        return Some(PathBuf::from(path));
    }
    dirs::cache_dir().map(|dir| dir.join("lolikit").join("lolikit.log"))
}

/// Install the logger if requested. Failures leave logging disabled.
pub fn init() {
    let Some(level) = env::var("LOLIKIT_LOG").ok().and_then(|v| level_from(&v)) else {
        return;
    };
    let Some(path) = log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::options().create(true).append(true).open(&path) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }
}
