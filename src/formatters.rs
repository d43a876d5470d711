use std::fmt::Write;

use yansi::{Color, Paint};

use crate::{
    config::{is_valid_time_format, DEFAULT_FILE_TIME_FORMAT},
    LogEvent, LogFormatter, Severity,
};

/// Renders `<time> <LABEL> <file>:<line>: <message>` with the label padded to
/// five columns. An invalid strftime string falls back to
/// `%Y-%m-%d %H:%M:%S`.
pub struct DefaultFormatter {
    datetime_format: String,
    use_ansi: bool,
}

impl DefaultFormatter {
    pub fn new(datetime_format: impl Into<String>, use_ansi: bool) -> Self {
        let mut datetime_format = datetime_format.into();
        if !is_valid_time_format(&datetime_format) {
            datetime_format = DEFAULT_FILE_TIME_FORMAT.to_string();
        }

        Self {
            datetime_format,
            use_ansi,
        }
    }

    fn timestamp(&self, event: &LogEvent<'_>) -> String {
        let mut time = String::new();
        if write!(time, "{}", event.time.format(&self.datetime_format)).is_err() {
            time.clear();
            let _ = write!(time, "{}", event.time.format(DEFAULT_FILE_TIME_FORMAT));
        }
        time
    }

    fn level_color(severity: Severity) -> Color {
        match severity {
            Severity::Trace => Color::BrightBlue,
            Severity::Debug => Color::Cyan,
            Severity::Info => Color::Green,
            Severity::Warn => Color::Yellow,
            Severity::Error => Color::Red,
            Severity::Fatal => Color::Magenta,
        }
    }
}

impl LogFormatter for DefaultFormatter {
    fn format(&self, event: &LogEvent<'_>) -> String {
        let level = format!("{:<5}", event.severity);
        let origin = format!("{}:{}:", event.file, event.line);

        if self.use_ansi {
            format!(
                "{} {} {} {}",
                self.timestamp(event),
                level.fg(Self::level_color(event.severity)),
                origin.fg(Color::BrightBlack),
                event.message,
            )
        } else {
            format!(
                "{} {} {} {}",
                self.timestamp(event),
                level,
                origin,
                event.message,
            )
        }
    }
}
