//! Logging setup for the checker binary and for debugging tests.
//!
//! The library itself only talks to the `log` facade; this module wires a
//! `fern` dispatch to stderr with colored level prefixes.

use colored::{Color, ColoredString, Colorize};
use log::Level;

pub fn base(level: log::LevelFilter) -> fern::Dispatch {
    fern::Dispatch::new().level(level)
}

pub fn stderr(base: fern::Dispatch) -> fern::Dispatch {
    base.format(move |out, message, record| {
        let level = record.level();
        let color = match level {
            Level::Error => Color::Red,
            Level::Warn => Color::Yellow,
            Level::Info => Color::Blue,
            Level::Debug => Color::Magenta,
            Level::Trace => Color::Green,
        };
        out.finish(format_args!(
            "{} [{}] {}",
            ColoredString::from((level.to_string().to_lowercase() + ":").as_str())
                .color(color)
                .to_string(),
            record.target(),
            message
        ))
    })
    .chain(std::io::stderr())
}

/// Installs the stderr logger. Fails if a global logger is already set.
pub fn init(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    stderr(base(level)).apply()
}
