//! Small embeddable logging core.
//!
//! A [`Logger`] filters events against a global threshold and fans them out to
//! bounded sets of console, file and callback sinks, each with a threshold of
//! its own. Dispatch is synchronous on the calling thread. For multi-threaded
//! use, build the logger with [`Logger::init_threaded`] and a [`LockHooks`]
//! implementation; every dispatch is then bracketed by `lock`/`unlock`.

mod config;
mod error;
mod event;
mod formatters;
mod lock;
mod logger;
mod macros;
mod severity;
pub mod sinks;

pub use config::{Config, DEFAULT_MAX_SINKS};
pub use error::{LogError, SinkKind};
pub use event::LogEvent;
pub use formatters::DefaultFormatter;
pub use lock::{hooks, HookPair, LockHooks, MutexHooks};
pub use logger::{Builder, Logger};
pub use severity::{ParseSeverityError, Severity};
pub use sinks::SharedWriter;

pub trait LogFormatter: Sync + Send {
    fn format(&self, event: &LogEvent<'_>) -> String;
}

pub trait LogSink: Sync + Send {
    fn write_event(&self, event: &LogEvent<'_>) -> eyre::Result<()>;
    fn flush(&self);
}
