use chrono::{DateTime, Local};

use crate::Severity;

/// A single log call, as seen by every sink it is dispatched to.
///
/// Built once per [`Logger::log`](crate::Logger::log) call and borrowed by each
/// matching sink. The message is rendered from the caller's format arguments
/// exactly once, so every sink observes identical text and an identical
/// timestamp.
#[derive(Debug, Clone, Copy)]
pub struct LogEvent<'a> {
    pub severity: Severity,
    pub file: &'a str,
    pub line: u32,
    pub message: &'a str,
    pub time: DateTime<Local>,
}
