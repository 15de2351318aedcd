//! glog event format for `tracing-subscriber`.

use std::fmt::{self, Write as _};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::glog::{LogRecord, format_record, render_error_chain};

/// Formats events as glog lines.
///
/// The event's module path is the class and the innermost span is the
/// method. An `error` field is rendered as the trailing trace; other fields
/// are appended to the message as `key=value`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlogFormat;

impl<S, N> FormatEvent<S, N> for GlogFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();

        let mut visitor = GlogVisitor::default();
        event.record(&mut visitor);
        let (message, trace) = visitor.into_message();

        let method = ctx
            .event_scope()
            .and_then(|mut scope| scope.next())
            .map(|span| span.name());

        let record = LogRecord {
            level: Some(meta.level().into()),
            timestamp: chrono::Utc::now(),
            thread_id: current_thread_id(),
            class_name: Some(meta.module_path().unwrap_or_else(|| meta.target())),
            method_name: method,
            message: &message,
            trace: trace.as_deref(),
        };

        writer.write_str(&format_record(&record))
    }
}

/// Small sequential id for the calling thread, stable for its lifetime.
fn current_thread_id() -> u64 {
    static NEXT_ID: AtomicU64 = AtomicU64::new(1);
    thread_local! {
        static THREAD_ID: u64 = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    }
    THREAD_ID.with(|id| *id)
}

#[derive(Default)]
struct GlogVisitor {
    message: String,
    fields: String,
    trace: Option<String>,
}

impl GlogVisitor {
    fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>) {
        let _ = write!(self.fields, " {name}={value}");
    }

    fn into_message(self) -> (String, Option<String>) {
        let mut message = self.message;
        if message.is_empty() {
            message = self.fields.trim_start().to_string();
        } else {
            message.push_str(&self.fields);
        }
        (message, self.trace)
    }
}

impl Visit for GlogVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "error" => self.trace = Some(value.to_string()),
            name => self.push_field(name, format_args!("{value}")),
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        if field.name() == "error" {
            self.trace = Some(render_error_chain(value));
        } else {
            self.push_field(field.name(), format_args!("{value}"));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "error" => self.trace = Some(format!("{value:?}")),
            name => self.push_field(name, format_args!("{value:?}")),
        }
    }
}
