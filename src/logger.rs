//! Structured visual logging.
//!
//! Every log line belongs to a [`Line`] kind that decides its box-drawing
//! decoration or `[LEVEL]` tag. Macros format the message and hand it to
//! [`emit`], which applies the global enable switch and, while the global
//! time source is simulated, prefixes the simulated wall-clock time.
//!
//! ## Conventions
//!
//! - `log_version!` opens the output once at startup: `┏ sunshade vX.Y.Z ━━╸`.
//! - `log_block_start!` starts a conceptual block (spacer pipe, then `┣ message`).
//! - `log_decorated!` continues a block: `┣ message`.
//! - `log_indented!` lists details under a block: `┃   message`.
//! - `log_pipe!` inserts a spacer before a leveled message.
//! - `log_info!` and `log_warning!` tag the line with its level.
//! - `log_error_exit!` closes the output on a fatal error; `log_end!` closes it
//!   normally with `╹`.

use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Local, Utc};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);

/// Global logging switch.
pub struct Log;

impl Log {
    /// Enable or disable all log output (quiet runs and tests).
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// `[HH:MM:SS] ` of the simulated clock, or nothing on the real clock.
    pub fn timestamp_prefix() -> String {
        if !(crate::time_source::is_initialized() && crate::time_source::is_simulated()) {
            return String::new();
        }
        DateTime::<Utc>::from_timestamp(crate::time_source::now(), 0)
            .map(|t| format!("[{}] ", t.with_timezone(&Local).format("%H:%M:%S")))
            .unwrap_or_default()
    }
}

/// Severity tag for leveled lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Self::Info => "\x1b[32mINFO\x1b[0m",
            Self::Warning => "\x1b[33mWARNING\x1b[0m",
            Self::Error => "\x1b[31mERROR\x1b[0m",
        }
    }
}

/// Visual kind of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Version,
    BlockStart,
    Decorated,
    Indented,
    Pipe,
    End,
    Leveled(Level),
    ErrorExit,
}

impl Line {
    /// Render `message` with this line's decoration, one prefix per physical line.
    pub fn render(self, prefix: &str, message: &str) -> String {
        match self {
            Self::Version => format!("{prefix}┏ {message} ━━╸\n"),
            Self::BlockStart => format!("{prefix}┃\n{prefix}┣ {message}\n"),
            Self::Decorated => format!("{prefix}┣ {message}\n"),
            Self::Indented => format!("{prefix}┃   {message}\n"),
            Self::Pipe => format!("{prefix}┃\n"),
            Self::End => format!("{prefix}╹\n"),
            Self::Leveled(level) => format!("{prefix}┣[{}] {message}\n", level.tag()),
            Self::ErrorExit => {
                format!("{prefix}┃\n{prefix}┗[{}] {message}\n", Level::Error.tag())
            }
        }
    }
}

/// Render and print one log line if logging is enabled.
pub fn emit(line: Line, args: fmt::Arguments<'_>) {
    if !Log::is_enabled() {
        return;
    }
    let text = line.render(&Log::timestamp_prefix(), &args.to_string());
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(text.as_bytes());
    let _ = stdout.flush();
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_line {
    ($line:expr, $fmt:literal $($arg:tt)*) => {
        $crate::logger::emit($line, format_args!($fmt $($arg)*))
    };
    ($line:expr, $expr:expr) => {
        $crate::logger::emit($line, format_args!("{}", $expr))
    };
}

/// Log the application version header.
#[macro_export]
macro_rules! log_version {
    () => {
        $crate::logger::emit(
            $crate::logger::Line::Version,
            format_args!("sunshade v{}", env!("CARGO_PKG_VERSION")),
        )
    };
}

/// Start a new block of related messages.
#[macro_export]
macro_rules! log_block_start {
    ($($arg:tt)+) => { $crate::__log_line!($crate::logger::Line::BlockStart, $($arg)+) };
}

/// Log a message continuing the current block.
#[macro_export]
macro_rules! log_decorated {
    ($($arg:tt)+) => { $crate::__log_line!($crate::logger::Line::Decorated, $($arg)+) };
}

/// Log a detail line under the current block.
#[macro_export]
macro_rules! log_indented {
    ($($arg:tt)+) => { $crate::__log_line!($crate::logger::Line::Indented, $($arg)+) };
}

/// Log an empty spacer line.
#[macro_export]
macro_rules! log_pipe {
    () => {
        $crate::logger::emit($crate::logger::Line::Pipe, format_args!(""))
    };
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {
        $crate::logger::emit($crate::logger::Line::End, format_args!(""))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)+) => {
        $crate::__log_line!(
            $crate::logger::Line::Leveled($crate::logger::Level::Info),
            $($arg)+
        )
    };
}

#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)+) => {
        $crate::__log_line!(
            $crate::logger::Line::Leveled($crate::logger::Level::Warning),
            $($arg)+
        )
    };
}

/// Log a fatal error and close the output.
#[macro_export]
macro_rules! log_error_exit {
    ($($arg:tt)+) => { $crate::__log_line!($crate::logger::Line::ErrorExit, $($arg)+) };
}
