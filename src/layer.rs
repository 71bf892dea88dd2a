use crate::attachment::Attachment;
use crate::context::Context;
use crate::data::Data;
use crate::logger::Logger;
use crate::severity::Level;
use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{self, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Target prefix of this crate's own diagnostics, which are never forwarded.
const OWN_TARGET: &str = "event_log";

/// Whether `target` is this crate or one of its modules. Other crates whose
/// names merely start with the same text (`event_logger`) don't match.
pub(crate) fn is_own_target(target: &str) -> bool {
    target
        .strip_prefix(OWN_TARGET)
        .map_or(false, |rest| rest.is_empty() || rest.starts_with("::"))
}

/// Event field read as the trace id instead of being put in `data`.
const TRACE_ID_FIELD: &str = "trace_id";

/// `tracing_subscriber` layer that turns `tracing` events into logged events.
///
/// The event message becomes the event name, the level is translated to a
/// severity, a `trace_id` field becomes the trace id and every other field
/// goes into `data`. Events below the logger's level are dropped, compared on
/// the full scale so `DEBUG` and `TRACE` don't pass as INFO.
///
/// Events emitted by this crate itself are ignored, so a write failure
/// reported through `tracing` can't loop back into the pipeline.
#[derive(Clone, Debug)]
pub struct EventLayer {
    logger: Arc<Logger>,
}

impl EventLayer {
    pub fn new(logger: Arc<Logger>) -> Self {
        EventLayer { logger }
    }
}

impl<S> Layer<S> for EventLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: layer::Context<'_, S>) {
        let meta = event.metadata();
        if is_own_target(meta.target()) {
            return;
        }

        let level = Level::from(*meta.level());
        if level < self.logger.level() {
            return;
        }

        let mut data = Data::new();
        let mut message = None;
        let mut trace_id = None;
        event.record(&mut FieldVisitor {
            data: &mut data,
            message: &mut message,
            trace_id: &mut trace_id,
        });

        let ctx = trace_id.map(Context::with_trace_id).unwrap_or_default();
        let name = message.unwrap_or_else(|| meta.name().to_string());

        let mut attachments = vec![Attachment::Severity(level.severity())];
        if !data.is_empty() {
            attachments.push(Attachment::Data(data));
        }
        self.logger.event(&ctx, &name, attachments);
    }
}

pub struct FieldVisitor<'a> {
    pub data: &'a mut Data,
    pub message: &'a mut Option<String>,
    pub trace_id: &'a mut Option<String>,
}

impl<'a> FieldVisitor<'a> {
    fn record_string(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => *self.message = Some(value),
            TRACE_ID_FIELD => *self.trace_id = Some(value),
            name => self.data.insert(name, value),
        }
    }
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_string(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.data.insert(field.name(), value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.data.insert(field.name(), value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.data.insert(field.name(), value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.data.insert(field.name(), value);
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.record_string(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_string(field, format!("{:?}", value));
    }
}
