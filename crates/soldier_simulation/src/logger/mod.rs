//! Global logger с подключаемым sink
//!
//! Simulation core не знает куда уходят логи (консоль, движок, файл).
//! Хост ставит свой `LogSink` через `set_sink`, иначе `init_logger()` ставит консоль.
//! Timestamp добавляется здесь, а не в sink.

use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex};

static SINK: Lazy<Mutex<Option<Box<dyn LogSink>>>> = Lazy::new(|| Mutex::new(None));

static MIN_LEVEL: Lazy<Mutex<LogLevel>> = Lazy::new(|| Mutex::new(LogLevel::Debug));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Куда пишутся строки лога
pub trait LogSink: Send + Sync {
    fn write(&self, level: LogLevel, line: &str);
}

pub fn set_sink(sink: Box<dyn LogSink>) {
    if let Ok(mut slot) = SINK.lock() {
        *slot = Some(sink);
    }
}

pub fn set_sink_if_needed(sink: Box<dyn LogSink>) {
    if let Ok(mut slot) = SINK.lock() {
        if slot.is_none() {
            *slot = Some(sink);
        }
    }
}

pub fn set_log_level(level: LogLevel) {
    if let Ok(mut min) = MIN_LEVEL.lock() {
        *min = level;
    }
}

pub fn log_level() -> LogLevel {
    MIN_LEVEL.lock().map(|l| *l).unwrap_or(LogLevel::Debug)
}

pub fn log(message: &str) {
    log_with_level(LogLevel::Debug, message);
}

pub fn log_info(message: &str) {
    log_with_level(LogLevel::Info, message);
}

pub fn log_warning(message: &str) {
    log_with_level(LogLevel::Warning, message);
}

pub fn log_error(message: &str) {
    log_with_level(LogLevel::Error, message);
}

pub fn log_with_level(level: LogLevel, message: &str) {
    if level < log_level() {
        return;
    }

    // Poisoned mutex = кто-то паникнул внутри sink, просто молчим
    let Ok(slot) = SINK.lock() else {
        return;
    };
    if let Some(sink) = slot.as_ref() {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        sink.write(level, &format!("[{}] {}", timestamp, message));
    }
}

/// stdout sink (headless binary, тесты)
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn write(&self, level: LogLevel, line: &str) {
        println!("[{}] {}", level.as_str(), line);
    }
}

/// Sink в память: строки доступны через общий handle
#[derive(Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn count_at(&self, level: LogLevel) -> usize {
        self.lines().iter().filter(|(l, _)| *l == level).count()
    }
}

impl LogSink for MemorySink {
    fn write(&self, level: LogLevel, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((level, line.to_string()));
        }
    }
}

pub fn init_logger() {
    set_sink_if_needed(Box::new(ConsoleSink));
}
