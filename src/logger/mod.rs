//! Leveled logging over the serial console
//!
//! Only the main loop logs. A blocking UART write inside an interrupt
//! handler would stretch the time other interrupts stay deferred.

use crate::drivers::SerialConsole;
use embedded_hal::serial;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub const fn tag(self) -> &'static str {
        match self {
            LogLevel::Error => "[ERR] ",
            LogLevel::Warn => "[WRN] ",
            LogLevel::Info => "[INF] ",
            LogLevel::Debug => "[DBG] ",
        }
    }
}

pub struct Logger<W> {
    console: SerialConsole<W>,
    level: LogLevel,
}

impl<W: serial::Write<u8>> Logger<W> {
    pub fn new(console: SerialConsole<W>, level: LogLevel) -> Self {
        Self { console, level }
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.level
    }

    /// Write one tagged line if `level` passes the threshold. `body` formats
    /// the message, the line ending is added here.
    pub fn log<F>(&mut self, level: LogLevel, body: F) -> Result<(), W::Error>
    where
        F: FnOnce(&mut SerialConsole<W>) -> Result<(), W::Error>,
    {
        if !self.enabled(level) {
            return Ok(());
        }
        self.console.write_str(level.tag())?;
        body(&mut self.console)?;
        self.console.write_str("\r\n")
    }

    pub fn console(&mut self) -> &mut SerialConsole<W> {
        &mut self.console
    }
}

/// `log!(logger, LogLevel::Info, "duty {}%", pct)`, formatted with `ufmt`.
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, |console| ufmt::uwrite!(console, $($arg)+))
    };
}
