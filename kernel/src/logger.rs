//! Kernel logger
//!
//! Backs the `log` facade with whatever console the platform registers
//! (serial port, VGA, host stdout in tests). Formatting goes through a fixed
//! stack buffer so logging works with interrupts off and without touching
//! the heap.

use crate::scheduler::core::error::{SchedulerError, SchedulerResult};
use core::fmt::Write;
use log::{Level, LevelFilter, Metadata, Record};
use spin::Once;

/// Byte sink for log lines
pub trait Console: Sync {
    fn write_str(&self, s: &str);
}

static CONSOLE: Once<&'static dyn Console> = Once::new();

/// Logger writing `[LEVEL] message` lines to the console
struct KernelLogger;

impl log::Log for KernelLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let Some(console) = CONSOLE.get() else {
            return;
        };

        let level_str = match record.level() {
            Level::Error => "ERROR",
            Level::Warn => "WARN ",
            Level::Info => "INFO ",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };

        let mut buf = [0u8; 512];
        let pos = {
            let mut writer = BufferWriter {
                buffer: &mut buf,
                pos: 0,
            };
            let _ = writeln!(&mut writer, "[{}] {}", level_str, record.args());
            writer.pos
        };
        // Truncation may split a UTF-8 sequence.
        let line = match core::str::from_utf8(&buf[..pos]) {
            Ok(line) => line,
            Err(e) => {
                let valid = e.valid_up_to();
                core::str::from_utf8(&buf[..valid]).unwrap_or_default()
            }
        };
        console.write_str(line);
    }

    fn flush(&self) {}
}

/// Simple buffer writer for formatting without alloc
pub struct BufferWriter<'a> {
    pub buffer: &'a mut [u8],
    pub pos: usize,
}

impl<'a> core::fmt::Write for BufferWriter<'a> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let remaining = self.buffer.len() - self.pos;
        let to_write = bytes.len().min(remaining);

        if to_write > 0 {
            self.buffer[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
            self.pos += to_write;
        }

        Ok(())
    }
}

/// Global logger instance
static LOGGER: KernelLogger = KernelLogger;

/// Install the kernel logger on `console`.
///
/// Call this once, early in boot. A second call (or any other logger
/// already installed) gives `LoggerAlreadySet`.
pub fn init(console: &'static dyn Console, level: LevelFilter) -> SchedulerResult<()> {
    log::set_logger(&LOGGER).map_err(|_| SchedulerError::LoggerAlreadySet)?;
    CONSOLE.call_once(|| console);
    log::set_max_level(level);
    early_print("[LOGGER] Logger initialized\n");
    Ok(())
}

/// Print directly to the console (bypass logger for early debug)
pub fn early_print(s: &str) {
    if let Some(console) = CONSOLE.get() {
        console.write_str(s);
    }
}
