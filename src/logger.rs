use std::{
    fmt,
    path::PathBuf,
    sync::{
        atomic::{AtomicU8, Ordering},
        Arc,
    },
};

use chrono::Local;
use eyre::Context;
use log::{LevelFilter, Log};

use crate::{
    config::Config,
    formatters::DefaultFormatter,
    lock::{DispatchGuard, LockHooks},
    sinks::{self, CallbackSink, SharedWriter, WriterSink},
    LogError, LogEvent, LogSink, Severity, SinkKind,
};

struct Registered {
    threshold: Severity,
    sink: Box<dyn LogSink>,
}

/// Filters log events and fans them out to registered sinks.
///
/// Sinks are registered through `&mut self` before the logger is shared;
/// afterwards [`Logger::log`] only needs `&self`, so an `Arc<Logger>` can be
/// handed to every thread.
pub struct Logger {
    level: AtomicU8,
    config: Config,
    console_sinks: Vec<Registered>,
    file_sinks: Vec<Registered>,
    callback_sinks: Vec<Registered>,
    hooks: Option<Box<dyn LockHooks>>,
}

impl Logger {
    pub fn init(level: Severity) -> Self {
        Self::with_config(level, Config::new())
    }

    /// Like [`Logger::init`], bracketing every dispatch with `hooks`.
    pub fn init_threaded(level: Severity, hooks: impl LockHooks + 'static) -> Self {
        let mut logger = Self::init(level);
        logger.hooks = Some(Box::new(hooks));
        logger
    }

    /// Invalid time formats in `config` are replaced with the defaults; use
    /// [`Builder`] to have them rejected instead.
    pub fn with_config(level: Severity, config: Config) -> Self {
        Self {
            level: AtomicU8::new(level as u8),
            config: config.with_valid_time_formats(),
            console_sinks: Vec::new(),
            file_sinks: Vec::new(),
            callback_sinks: Vec::new(),
            hooks: None,
        }
    }

    pub fn add_console_sink(
        &mut self,
        handle: Option<SharedWriter>,
        level: Severity,
    ) -> Result<(), LogError> {
        let handle = handle.ok_or(LogError::NullTarget(SinkKind::Console))?;
        let formatter =
            DefaultFormatter::new(&self.config.console_time_format, self.config.use_ansi);
        self.register(
            SinkKind::Console,
            level,
            Box::new(WriterSink::new(handle, Box::new(formatter))),
        )
    }

    pub fn add_file_sink(
        &mut self,
        handle: Option<SharedWriter>,
        level: Severity,
    ) -> Result<(), LogError> {
        let handle = handle.ok_or(LogError::NullTarget(SinkKind::File))?;
        let formatter = DefaultFormatter::new(&self.config.file_time_format, false);
        self.register(
            SinkKind::File,
            level,
            Box::new(WriterSink::new(handle, Box::new(formatter))),
        )
    }

    pub fn add_callback_sink<C, F>(
        &mut self,
        callback: F,
        context: Option<Arc<C>>,
        level: Severity,
    ) -> Result<(), LogError>
    where
        C: Send + Sync + 'static,
        F: Fn(&LogEvent<'_>, &C) + Send + Sync + 'static,
    {
        let context = context.ok_or(LogError::NullTarget(SinkKind::Callback))?;
        self.register(
            SinkKind::Callback,
            level,
            Box::new(CallbackSink::new(callback, context)),
        )
    }

    fn register(
        &mut self,
        kind: SinkKind,
        threshold: Severity,
        sink: Box<dyn LogSink>,
    ) -> Result<(), LogError> {
        let capacity = self.config.max_sinks;
        let group = match kind {
            SinkKind::Console => &mut self.console_sinks,
            SinkKind::File => &mut self.file_sinks,
            SinkKind::Callback => &mut self.callback_sinks,
        };

        if group.len() >= capacity {
            return Err(LogError::TooManySinks { kind, capacity });
        }

        group.push(Registered { threshold, sink });
        Ok(())
    }

    pub fn set_level(&self, level: Severity) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    pub fn level(&self) -> Severity {
        Severity::from_u8(self.level.load(Ordering::Relaxed))
    }

    pub fn sink_count(&self, kind: SinkKind) -> usize {
        match kind {
            SinkKind::Console => self.console_sinks.len(),
            SinkKind::File => self.file_sinks.len(),
            SinkKind::Callback => self.callback_sinks.len(),
        }
    }

    /// Maximum number of sinks per kind.
    pub fn capacity(&self) -> usize {
        self.config.max_sinks
    }

    pub fn is_threaded(&self) -> bool {
        self.hooks.is_some()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn sinks(&self) -> impl Iterator<Item = &Registered> {
        self.console_sinks
            .iter()
            .chain(self.file_sinks.iter())
            .chain(self.callback_sinks.iter())
    }

    /// Dispatches one event to every sink whose threshold it clears.
    ///
    /// Usually reached through [`trace!`](crate::trace) and friends, which fill
    /// in `file` and `line`. Sink write failures are dropped.
    pub fn log(&self, severity: Severity, file: &str, line: u32, args: fmt::Arguments<'_>) {
        let time = Local::now();
        let _guard = DispatchGuard::acquire(self.hooks.as_deref());

        if !self.config.enabled || severity < self.level() {
            return;
        }

        if !self.sinks().any(|entry| severity >= entry.threshold) {
            return;
        }

        let message = fmt::format(args);
        let event = LogEvent {
            severity,
            file,
            line,
            message: &message,
            time,
        };

        for entry in self.sinks().filter(|entry| severity >= entry.threshold) {
            let _ = entry.sink.write_event(&event);
        }
    }

    pub fn flush(&self) {
        let _guard = DispatchGuard::acquire(self.hooks.as_deref());
        for entry in self.sinks() {
            entry.sink.flush();
        }
    }

    /// Registers this logger as the `log` crate backend.
    pub fn install(self) -> eyre::Result<()> {
        log::set_max_level(LevelFilter::Trace);
        log::set_boxed_logger(Box::new(self)).context("Failed registering boxed logger")?;

        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.config.enabled && Severity::from(metadata.level()) >= self.level()
    }

    fn log(&self, record: &log::Record) {
        Logger::log(
            self,
            record.level().into(),
            record.file().unwrap_or(record.target()),
            record.line().unwrap_or(0),
            *record.args(),
        );
    }

    fn flush(&self) {
        Logger::flush(self)
    }
}

type SinkConstructor = Box<dyn FnOnce(&mut Logger) -> eyre::Result<()>>;

pub struct Builder {
    level: Severity,
    config: Config,
    constructors: Vec<SinkConstructor>,
    hooks: Option<Box<dyn LockHooks>>,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            level: Severity::Info,
            config: Config::new(),
            constructors: Vec::new(),
            hooks: None,
        }
    }

    pub fn with_level(self, level: Severity) -> Self {
        Self { level, ..self }
    }

    /// Reads the global threshold from `var` if it is set.
    pub fn with_level_from_env(self, var: &str) -> eyre::Result<Self> {
        self.with_level_from_lookup(var, |key| std::env::var(key).ok())
    }

    /// Same as [`Builder::with_level_from_env`], reading `var` through `lookup`.
    pub fn with_level_from_lookup<F>(self, var: &str, lookup: F) -> eyre::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(var) {
            Some(value) => {
                let level = value
                    .parse::<Severity>()
                    .with_context(|| format!("Invalid log level in {}", var))?;
                Ok(self.with_level(level))
            }
            None => Ok(self),
        }
    }

    pub fn with_config(self, config: Config) -> Self {
        Self { config, ..self }
    }

    pub fn with_lock_hooks(self, hooks: impl LockHooks + 'static) -> Self {
        Self {
            hooks: Some(Box::new(hooks)),
            ..self
        }
    }

    pub fn with_console_sink(self, handle: SharedWriter, level: Severity) -> Self {
        self.with_constructor(move |logger| Ok(logger.add_console_sink(Some(handle), level)?))
    }

    pub fn with_stdout_sink(self, level: Severity) -> Self {
        self.with_console_sink(sinks::stdout(), level)
    }

    pub fn with_stderr_sink(self, level: Severity) -> Self {
        self.with_console_sink(sinks::stderr(), level)
    }

    pub fn with_file_sink(self, path: impl Into<PathBuf>, level: Severity) -> Self {
        let path: PathBuf = path.into();
        self.with_constructor(move |logger| {
            let handle = sinks::open_log_file(&path)?;
            Ok(logger.add_file_sink(Some(handle), level)?)
        })
    }

    pub fn with_callback_sink<C, F>(self, callback: F, context: Arc<C>, level: Severity) -> Self
    where
        C: Send + Sync + 'static,
        F: Fn(&LogEvent<'_>, &C) + Send + Sync + 'static,
    {
        self.with_constructor(move |logger| {
            Ok(logger.add_callback_sink(callback, Some(context), level)?)
        })
    }

    fn with_constructor(
        mut self,
        constructor: impl FnOnce(&mut Logger) -> eyre::Result<()> + 'static,
    ) -> Self {
        self.constructors.push(Box::new(constructor));
        self
    }

    pub fn build(self) -> eyre::Result<Logger> {
        self.config.validate().context("Invalid logger config")?;

        let mut logger = Logger::with_config(self.level, self.config);
        logger.hooks = self.hooks;

        for constructor in self.constructors {
            constructor(&mut logger).context("Failed registering sink")?;
        }

        Ok(logger)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}
