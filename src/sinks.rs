use std::{
    io::{self, Write},
    sync::Arc,
};

use eyre::Context;
use parking_lot::Mutex;

use crate::{LogEvent, LogFormatter, LogSink};

/// A writable handle shared between the caller and the logger.
///
/// The logger only ever holds a clone of the `Arc`; whoever registered the
/// handle keeps it alive and decides when the underlying stream is closed.
pub type SharedWriter = Arc<Mutex<dyn Write + Send>>;

pub fn shared<W>(writer: W) -> SharedWriter
where
    W: Write + Send + 'static,
{
    Arc::new(Mutex::new(writer))
}

pub fn stdout() -> SharedWriter {
    shared(io::stdout())
}

pub fn stderr() -> SharedWriter {
    shared(io::stderr())
}

/// Opens (or creates) `path` in append mode.
pub fn open_log_file(path: impl AsRef<std::path::Path>) -> eyre::Result<SharedWriter> {
    let path = path.as_ref();
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed opening or creating log file {}", path.display()))?;

    Ok(shared(file))
}

fn write_line(handle: &SharedWriter, line: &str) -> eyre::Result<()> {
    let mut writer = handle.lock();
    writeln!(writer, "{}", line)?;
    writer.flush().context("Can't flush sink")
}

/// Console and file sinks: one formatted line per event, flushed right away.
/// The two kinds differ only in the formatter the logger hands them.
pub struct WriterSink {
    handle: SharedWriter,
    formatter: Box<dyn LogFormatter>,
}

impl WriterSink {
    pub fn new(handle: SharedWriter, formatter: Box<dyn LogFormatter>) -> Self {
        Self { handle, formatter }
    }
}

impl LogSink for WriterSink {
    fn write_event(&self, event: &LogEvent<'_>) -> eyre::Result<()> {
        write_line(&self.handle, &self.formatter.format(event))
    }

    fn flush(&self) {
        let _ = self.handle.lock().flush();
    }
}

/// Hands every matching event to a user closure together with the context it
/// was registered with.
pub struct CallbackSink<C> {
    callback: Box<dyn Fn(&LogEvent<'_>, &C) + Send + Sync>,
    context: Arc<C>,
}

impl<C> CallbackSink<C>
where
    C: Send + Sync,
{
    pub fn new<F>(callback: F, context: Arc<C>) -> Self
    where
        F: Fn(&LogEvent<'_>, &C) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
            context,
        }
    }
}

impl<C> LogSink for CallbackSink<C>
where
    C: Send + Sync,
{
    fn write_event(&self, event: &LogEvent<'_>) -> eyre::Result<()> {
        (self.callback)(event, &self.context);
        Ok(())
    }

    fn flush(&self) {}
}
