//! A simple console logger

use ansi_rgb::*;
use libc_print::libc_println;
use log::{set_logger, set_max_level, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use rgb::RGB8;

static LOGGER: TerminalLogger = TerminalLogger;

struct TerminalLogger;

impl Log for TerminalLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let color = match record.level() {
            Level::Error => red(),
            Level::Warn => orange(),
            Level::Info => cyan(),
            Level::Debug => RGB8::new(255 / 2, 255 / 2, 255 / 2),
            Level::Trace => black(),
        };
        match record.line() {
            Some(line) => libc_println!(
                "[{}][{}:{}] {}",
                record.level().as_str().fg(color),
                record.file_static().unwrap_or("?"),
                line,
                record.args(),
            ),
            None => libc_println!(
                "[{}][{}] {}",
                record.level().as_str().fg(color),
                record.target(),
                record.args(),
            ),
        }
    }

    fn flush(&self) {}
}

/// Initializes the logger. Fails if a logger was already installed.
pub fn init_logger(max_level: LevelFilter) -> Result<(), SetLoggerError> {
    set_logger(&LOGGER)?;
    set_max_level(max_level);
    Ok(())
}
