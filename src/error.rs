use std::fmt::Display;

/// The three sink collections a logger keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    Console,
    File,
    Callback,
}

impl Display for SinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkKind::Console => write!(f, "console"),
            SinkKind::File => write!(f, "file"),
            SinkKind::Callback => write!(f, "callback"),
        }
    }
}

/// Registration failures. Neither variant leaves a partially registered sink behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogError {
    #[error("{0} sink target is null")]
    NullTarget(SinkKind),

    #[error("too many {kind} sinks, capacity is {capacity}")]
    TooManySinks { kind: SinkKind, capacity: usize },
}
