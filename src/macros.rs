//! Call-site shorthand. Each macro takes the logger first, then a
//! `format_args!` style message, and fills in `file!()` and `line!()`.
//!
//! ```
//! use corelog::{Logger, Severity};
//!
//! let logger = Logger::init(Severity::Info);
//! corelog::warn!(logger, "shader cache miss for {}", "water.frag");
//! ```

#[macro_export]
macro_rules! log_at {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $crate::Logger::log(&$logger, $severity, file!(), line!(), format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::Severity::Trace, $($arg)+) };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::Severity::Debug, $($arg)+) };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::Severity::Info, $($arg)+) };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::Severity::Warn, $($arg)+) };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::Severity::Error, $($arg)+) };
}

#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::Severity::Fatal, $($arg)+) };
}
