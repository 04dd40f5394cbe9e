//! Leveled tracing, shaped as an instance-level trait object rather than
//! global atomics and thread-locals: a pair of global function pointers
//! shared by every link in the process doesn't fit a crate meant to host
//! more than one independent `Ss7` engine. A `Trace` implementation is
//! supplied once, to `Ss7::new`, and every layer holds a `&dyn Trace`
//! instead of calling a global.
//!
//! [`StderrTrace`] is the default, honoring `SS7_LOG_LEVEL` (`off`, `error`,
//! `warn`, `info`, `debug`, `trace`, or the matching digit 0-5) and
//! `SS7_LOG_TIME` (`1` to prefix each line with elapsed nanoseconds).

use std::time::Instant;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => LogLevel::Off,
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    fn from_env_str(s: &str) -> Option<Self> {
        Some(match s.to_lowercase().as_str() {
            "off" | "0" => LogLevel::Off,
            "error" | "1" => LogLevel::Error,
            "warn" | "2" => LogLevel::Warn,
            "info" | "3" => LogLevel::Info,
            "debug" | "4" => LogLevel::Debug,
            "trace" | "5" => LogLevel::Trace,
            _ => return None,
        })
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            LogLevel::Off => "",
            LogLevel::Error => "[ERROR]",
            LogLevel::Warn => "[WARN] ",
            LogLevel::Info => "[INFO] ",
            LogLevel::Debug => "[DEBUG]",
            LogLevel::Trace => "[TRACE]",
        }
    }
}

/// Sink for engine diagnostics. One implementation per `Ss7` instance.
pub trait Trace {
    /// Lowest level this sink will emit; callers should check before
    /// building an expensive message.
    fn enabled(&self, level: LogLevel) -> bool;

    /// Emit one line at `level`, tagged with the originating link index
    /// (`None` for engine-wide messages not tied to a link).
    fn log(&self, level: LogLevel, link: Option<u32>, message: &str);

    fn error(&self, link: Option<u32>, message: &str) {
        if self.enabled(LogLevel::Error) {
            self.log(LogLevel::Error, link, message);
        }
    }
    fn warn(&self, link: Option<u32>, message: &str) {
        if self.enabled(LogLevel::Warn) {
            self.log(LogLevel::Warn, link, message);
        }
    }
    fn info(&self, link: Option<u32>, message: &str) {
        if self.enabled(LogLevel::Info) {
            self.log(LogLevel::Info, link, message);
        }
    }
    fn debug(&self, link: Option<u32>, message: &str) {
        if self.enabled(LogLevel::Debug) {
            self.log(LogLevel::Debug, link, message);
        }
    }
}

/// Discards everything. Useful in tests and for hosts that don't want any
/// engine chatter.
pub struct NullTrace;

impl Trace for NullTrace {
    fn enabled(&self, _level: LogLevel) -> bool {
        false
    }
    fn log(&self, _level: LogLevel, _link: Option<u32>, _message: &str) {}
}

/// Writes to stderr, honoring `SS7_LOG_LEVEL`/`SS7_LOG_TIME` at construction.
pub struct StderrTrace {
    level: LogLevel,
    time: bool,
    start: Instant,
}

impl StderrTrace {
    /// Read `SS7_LOG_LEVEL`/`SS7_LOG_TIME` from the environment once.
    /// Defaults to `Info`, no timestamps, when unset or unparsable.
    pub fn from_env() -> Self {
        let level = std::env::var("SS7_LOG_LEVEL")
            .ok()
            .and_then(|v| LogLevel::from_env_str(&v))
            .unwrap_or(LogLevel::Info);
        let time = matches!(std::env::var("SS7_LOG_TIME").as_deref(), Ok("1"));
        Self { level, time, start: Instant::now() }
    }

    pub fn with_level(level: LogLevel) -> Self {
        Self { level, time: false, start: Instant::now() }
    }
}

impl Default for StderrTrace {
    fn default() -> Self {
        Self::from_env()
    }
}

impl Trace for StderrTrace {
    fn enabled(&self, level: LogLevel) -> bool {
        level as u8 <= self.level as u8
    }

    fn log(&self, level: LogLevel, link: Option<u32>, message: &str) {
        if !self.enabled(level) {
            return;
        }
        let link_tag = match link {
            Some(idx) => format!("l{}", idx),
            None => "l--".to_string(),
        };
        if self.time {
            eprintln!(
                "{} [{}ns] [{}] {}",
                level.prefix(),
                self.start.elapsed().as_nanos(),
                link_tag,
                message
            );
        } else {
            eprintln!("{} [{}] {}", level.prefix(), link_tag, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn from_u8_saturates_to_trace() {
        assert_eq!(LogLevel::from_u8(0), LogLevel::Off);
        assert_eq!(LogLevel::from_u8(99), LogLevel::Trace);
    }

    #[test]
    fn null_trace_reports_disabled() {
        let t = NullTrace;
        assert!(!t.enabled(LogLevel::Error));
        t.error(Some(0), "should be dropped silently");
    }

    #[test]
    fn explicit_level_gates_emission() {
        let t = StderrTrace::with_level(LogLevel::Warn);
        assert!(t.enabled(LogLevel::Error));
        assert!(t.enabled(LogLevel::Warn));
        assert!(!t.enabled(LogLevel::Info));
    }
}
