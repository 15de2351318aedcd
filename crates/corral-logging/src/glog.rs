//! glog line rendering.

use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Importance of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// The source level could not be mapped.
    Unknown,
    Debug,
    Info,
    Warning,
    Error,
    /// Usually followed by process shutdown.
    Fatal,
}

impl Level {
    pub fn label(self) -> char {
        match self {
            Level::Unknown => 'U',
            Level::Debug => 'D',
            Level::Info => 'I',
            Level::Warning => 'W',
            Level::Error => 'E',
            Level::Fatal => 'F',
        }
    }
}

impl From<&tracing::Level> for Level {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warning,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// The parts of a log record that make up a glog line.
#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    /// `None` renders as [`Level::Unknown`].
    pub level: Option<Level>,
    pub timestamp: DateTime<Utc>,
    pub thread_id: u64,
    pub class_name: Option<&'a str>,
    /// Only rendered when `class_name` is present.
    pub method_name: Option<&'a str>,
    pub message: &'a str,
    /// Rendered error trace, appended on the following lines.
    pub trace: Option<&'a str>,
}

// level + MMdd + space + HH:mm:ss.SSS + space + THREAD + id + space
const BASE_MESSAGE_LENGTH: usize = 1 + 4 + 1 + 12 + 1 + 6 + 4 + 1;

/// Render `record` as a newline-terminated glog line.
pub fn format_record(record: &LogRecord<'_>) -> String {
    let mut capacity = BASE_MESSAGE_LENGTH + 2 + record.message.len();
    if let Some(class) = record.class_name {
        capacity += class.len();
        if let Some(method) = record.method_name {
            capacity += 1 + method.len();
        }
    }
    if let Some(trace) = record.trace {
        capacity += 1 + trace.len();
    }

    let mut line = String::with_capacity(capacity + 1);
    line.push(record.level.unwrap_or(Level::Unknown).label());
    // Writing into a String cannot fail.
    let _ = write!(
        line,
        "{} THREAD{}",
        record.timestamp.format("%m%d %H:%M:%S%.3f"),
        record.thread_id
    );

    if let Some(class) = record.class_name {
        line.push(' ');
        line.push_str(class);
        if let Some(method) = record.method_name {
            line.push('.');
            line.push_str(method);
        }
    }

    line.push_str(": ");
    line.push_str(record.message);

    if let Some(trace) = record.trace {
        line.push('\n');
        line.push_str(trace);
    }

    line.push('\n');
    line
}

/// Render an error and its chain of sources, one per line.
pub fn render_error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str("\nCaused by: ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 2, 18)
            .unwrap()
            .and_hms_milli_opt(17, 36, 47, 461)
            .unwrap()
            .and_utc()
    }

    fn record<'a>(message: &'a str) -> LogRecord<'a> {
        LogRecord {
            level: Some(Level::Info),
            timestamp: timestamp(),
            thread_id: 7,
            class_name: None,
            method_name: None,
            message,
            trace: None,
        }
    }

    #[test]
    fn test_minimal_record() {
        assert_eq!(format_record(&record("hello")), "I0218 17:36:47.461 THREAD7: hello\n");
    }

    #[test]
    fn test_class_and_method() {
        let mut rec = record("saved");
        rec.class_name = Some("corral_store::mem");
        rec.method_name = Some("save");
        assert_eq!(
            format_record(&rec),
            "I0218 17:36:47.461 THREAD7 corral_store::mem.save: saved\n"
        );

        rec.class_name = None;
        assert_eq!(format_record(&rec), "I0218 17:36:47.461 THREAD7: saved\n");
    }

    #[test]
    fn test_unknown_level() {
        let mut rec = record("what");
        rec.level = None;
        assert!(format_record(&rec).starts_with("U0218 "));
    }

    #[test]
    fn test_trace_appended() {
        #[derive(Debug)]
        struct Inner;
        impl std::fmt::Display for Inner {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "disk full")
            }
        }
        impl std::error::Error for Inner {}

        #[derive(Debug)]
        struct Outer(Inner);
        impl std::fmt::Display for Outer {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "save failed")
            }
        }
        impl std::error::Error for Outer {
            fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
                Some(&self.0)
            }
        }

        let trace = render_error_chain(&Outer(Inner));
        let mut rec = record("boom");
        rec.level = Some(Level::Warning);
        rec.trace = Some(&trace);

        assert_eq!(
            format_record(&rec),
            "W0218 17:36:47.461 THREAD7: boom\nsave failed\nCaused by: disk full\n"
        );
    }
}
