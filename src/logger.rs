use crate::attachment::{merge, Attachment, Check};
use crate::config::Config;
use crate::context::Context;
use crate::data::Data;
use crate::errors::format_error;
use crate::fields::FieldSelection;
use crate::pool::BufferPool;
use crate::record::Record;
use crate::render::{RenderError, Renderer};
use crate::severity::{Level, Severity};
use crate::sink::{Destination, OutputFailure, Sink};
use std::error::Error as StdError;
use std::io::{self, Write};

/// Event name used when an event couldn't be encoded.
pub const MARSHAL_ERROR_EVENT: &str = "error marshalling event data";

/// Called when neither output stream accepts an event. Never returns.
pub type OutputFailureHandler = fn(&OutputFailure) -> !;

/// The event pipeline: merge attachments into a record, filter by level,
/// render into a pooled buffer and write it out.
///
/// Every call runs on the caller's thread and returns nothing. Failures are
/// handled here: unencodable data is replaced by a diagnostic event, a failed
/// primary stream by the fallback, and the loss of both streams ends the
/// process through the [`OutputFailureHandler`].
///
/// ```
/// use event_log::{attach, data, Config, Context, Http, Logger};
///
/// let logger = Logger::with_writers(Config::new("dp-frontend-router"), Box::new(std::io::sink()), Box::new(std::io::sink()));
/// let ctx = Context::with_trace_id("e7a1c");
/// logger.event(&ctx, "http request received", attach![
///     Http::new().with_method("GET").with_path("/embed"),
///     data! { "attempt" => 1 },
/// ]);
/// ```
pub struct Logger {
    namespace: String,
    renderer: Renderer,
    level: Level,
    strict: bool,
    sink: Sink,
    pool: BufferPool,
    on_output_failure: OutputFailureHandler,
}

impl Logger {
    /// Log to stdout, falling back to stderr.
    pub fn new(config: Config) -> Self {
        Logger::with_writers(config, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    pub fn with_writers(config: Config, primary: Destination, fallback: Destination) -> Self {
        Logger {
            renderer: config.renderer(),
            namespace: config.namespace,
            level: config.level,
            strict: config.strict,
            sink: Sink::new(primary, fallback),
            pool: BufferPool::new(),
            on_output_failure: exit_on_output_failure,
        }
    }

    /// Replace what happens when both output streams fail. The default logs
    /// through `tracing` and exits with status 1.
    pub fn with_output_failure_handler(mut self, handler: OutputFailureHandler) -> Self {
        self.on_output_failure = handler;
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn renderer(&self) -> Renderer {
        self.renderer
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Whether an event of `severity` passes the level filter.
    pub fn enabled(&self, severity: Severity) -> bool {
        severity.level() >= self.level
    }

    /// Log `event` with the given attachments. For each attachment kind the
    /// rightmost value wins; in strict mode passing a kind twice panics.
    pub fn event<I>(&self, ctx: &Context, event: &str, attachments: I)
    where
        I: IntoIterator<Item = Attachment>,
    {
        self.emit(ctx, event, None, attachments, None);
    }

    /// As [`Logger::event`], with `fields` choosing what the unrolled renderer
    /// writes.
    pub fn event_with_fields<I>(&self, ctx: &Context, event: &str, fields: &FieldSelection, attachments: I)
    where
        I: IntoIterator<Item = Attachment>,
    {
        self.emit(ctx, event, None, attachments, Some(fields));
    }

    pub fn info<I>(&self, ctx: &Context, event: &str, attachments: I)
    where
        I: IntoIterator<Item = Attachment>,
    {
        self.emit(ctx, event, Some(Severity::Info), attachments, None);
    }

    pub fn warn<I>(&self, ctx: &Context, event: &str, attachments: I)
    where
        I: IntoIterator<Item = Attachment>,
    {
        self.emit(ctx, event, Some(Severity::Warn), attachments, None);
    }

    /// Log at ERROR with `err` formatted into the `errors` field.
    pub fn error<I>(&self, ctx: &Context, event: &str, err: &(dyn StdError + 'static), attachments: I)
    where
        I: IntoIterator<Item = Attachment>,
    {
        let attachments = attachments.into_iter().chain([Attachment::Errors(format_error(err))]);
        self.emit(ctx, event, Some(Severity::Error), attachments, None);
    }

    /// Log at FATAL with `err` formatted into the `errors` field. This does
    /// not stop the process.
    pub fn fatal<I>(&self, ctx: &Context, event: &str, err: &(dyn StdError + 'static), attachments: I)
    where
        I: IntoIterator<Item = Attachment>,
    {
        let attachments = attachments.into_iter().chain([Attachment::Errors(format_error(err))]);
        self.emit(ctx, event, Some(Severity::Fatal), attachments, None);
    }

    /// Swap the primary output stream, returning the previous one.
    pub fn set_destination<W>(&self, writer: W) -> Destination
    where
        W: Write + Send + 'static,
    {
        self.sink.set_primary(Box::new(writer))
    }

    /// Swap the fallback output stream, returning the previous one.
    pub fn set_fallback_destination<W>(&self, writer: W) -> Destination
    where
        W: Write + Send + 'static,
    {
        self.sink.set_fallback(Box::new(writer))
    }

    fn emit<I>(
        &self,
        ctx: &Context,
        event: &str,
        severity: Option<Severity>,
        attachments: I,
        fields: Option<&FieldSelection>,
    ) where
        I: IntoIterator<Item = Attachment>,
    {
        let mut record = Record::new(&self.namespace, event, ctx);

        let check = match (self.strict, severity) {
            (false, _) => Check::None,
            (true, None) => Check::Duplicates,
            (true, Some(_)) => Check::DuplicatesAndSeverity,
        };
        if let Err(misuse) = merge(&mut record, attachments, check) {
            panic!("{}", misuse);
        }
        if severity.is_some() {
            record.severity = severity;
        }

        if !self.enabled(record.effective_severity()) {
            return;
        }

        let mut buf = self.pool.get();
        let rendered = match fields {
            Some(fields) => self.renderer.render_with_fields(&mut buf, &record, fields),
            None => self.renderer.render(&mut buf, &record),
        };

        match rendered {
            Ok(()) => self.write(&buf),
            Err(err) => {
                drop(buf);
                self.encoding_failed(ctx, &record, err);
            }
        }
    }

    /// Replace an event that couldn't be encoded with a diagnostic event
    /// holding the error and a `Debug` dump of the record.
    ///
    /// The diagnostic carries only strings, so it is rendered directly
    /// rather than through [`Logger::emit`].
    fn encoding_failed(&self, ctx: &Context, record: &Record<'_>, err: RenderError) {
        let dump = format!("{:?}", record);

        let mut diagnostic = Record::new(&self.namespace, MARSHAL_ERROR_EVENT, ctx);
        diagnostic.errors = Some(format_error(&err));
        diagnostic.data = Some(Data::new().with("event_data", dump.clone()));

        let mut buf = self.pool.get();
        match self.renderer.render(&mut buf, &diagnostic) {
            Ok(()) => self.write(&buf),
            Err(err) => tracing::error!(error = %err, "failed to encode marshalling diagnostic"),
        }

        if self.strict {
            panic!("{}: {}", MARSHAL_ERROR_EVENT, dump);
        }
    }

    fn write(&self, bytes: &[u8]) {
        if let Err(failure) = self.sink.write(bytes) {
            (self.on_output_failure)(&failure);
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("namespace", &self.namespace)
            .field("renderer", &self.renderer)
            .field("level", &self.level)
            .field("strict", &self.strict)
            .finish_non_exhaustive()
    }
}

fn exit_on_output_failure(failure: &OutputFailure) -> ! {
    tracing::error!(error = %failure, "no writable log destination, exiting");
    std::process::exit(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Auth;
    use crate::http::Http;
    use crate::traced::TracedError;
    use crate::{attach, data};
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Shared {
        fn lines(&self) -> Vec<Value> {
            let out = self.0.lock().unwrap();
            out.split(|&b| b == b'\n')
                .filter(|l| !l.is_empty())
                .map(|l| serde_json::from_slice(l).unwrap())
                .collect()
        }
    }

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "broken"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn logger(config: Config) -> (Logger, Shared) {
        let out = Shared::default();
        let logger = Logger::with_writers(config, Box::new(out.clone()), Box::new(Broken));
        (logger, out)
    }

    fn unencodable() -> Data {
        let mut bad = HashMap::new();
        bad.insert((1u8, 2u8), "value");
        data! { "bad" => bad }
    }

    fn panic_on_failure(failure: &OutputFailure) -> ! {
        panic!("output failure: {}", failure)
    }

    #[test]
    fn event_writes_one_line() {
        let (logger, out) = logger(Config::new("svc"));
        let ctx = Context::with_trace_id("t-1");
        logger.event(&ctx, "starting", attach![Severity::Info, Auth::service("svc")]);

        let lines = out.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["namespace"], "svc");
        assert_eq!(lines[0]["event"], "starting");
        assert_eq!(lines[0]["trace_id"], "t-1");
        assert_eq!(lines[0]["severity"], 3);
        assert_eq!(lines[0]["auth"]["identity_type"], "service");
    }

    #[test]
    fn rightmost_attachment_wins_when_not_strict() {
        let (logger, out) = logger(Config::new("svc"));
        logger.event(&Context::background(), "e", attach![data! { "a" => 1 }, data! { "a" => 2 }]);
        assert_eq!(out.lines()[0]["data"]["a"], 2);
    }

    #[test]
    #[should_panic(expected = "can't pass in the same parameter type multiple times: Data")]
    fn strict_rejects_duplicates() {
        let (logger, _) = logger(Config::new("svc").strict(true));
        logger.event(&Context::background(), "e", attach![Data::new(), Http::new(), Data::new()]);
    }

    #[test]
    #[should_panic(expected = "severity must not be passed as an attachment: WARN")]
    fn strict_rejects_severity_attachment_on_leveled_calls() {
        let (logger, _) = logger(Config::new("svc").strict(true));
        logger.info(&Context::background(), "e", attach![Severity::Warn]);
    }

    #[test]
    fn positional_severity_wins_when_not_strict() {
        let (logger, out) = logger(Config::new("svc"));
        logger.info(&Context::background(), "e", attach![Severity::Fatal]);
        assert_eq!(out.lines()[0]["severity"], 3);
    }

    #[test]
    fn error_formats_the_error() {
        let (logger, out) = logger(Config::new("svc").strict(true));
        let err = TracedError::wrap(TracedError::new("root"), "outer");
        logger.error(&Context::background(), "request failed", &err, attach![data! { "id" => 7 }]);

        let line = &out.lines()[0];
        assert_eq!(line["severity"], 1);
        assert_eq!(line["errors"][0]["message"], "outer");
        assert_eq!(line["errors"][1]["message"], "root");
        assert_eq!(line["data"]["id"], 7);
    }

    #[test]
    #[should_panic(expected = "can't pass in the same parameter type multiple times: Errors")]
    fn strict_error_call_rejects_extra_errors() {
        let (logger, _) = logger(Config::new("svc").strict(true));
        let err = TracedError::new("root");
        logger.fatal(&Context::background(), "e", &err, attach![format_error(&err)]);
    }

    #[test]
    fn level_filter_drops_lower_severities() {
        let (logger, out) = logger(Config::new("svc").level(Level::WARN));
        let ctx = Context::background();
        let err = TracedError::new("boom");

        logger.event(&ctx, "no severity", attach![]);
        logger.info(&ctx, "info", attach![]);
        logger.warn(&ctx, "warn", attach![]);
        logger.error(&ctx, "error", &err, attach![]);
        logger.fatal(&ctx, "fatal", &err, attach![]);

        let events: Vec<_> = out.lines().iter().map(|l| l["event"].clone()).collect();
        assert_eq!(events, ["warn", "error", "fatal"]);
    }

    #[test]
    fn unencodable_data_becomes_a_diagnostic_event() {
        let (logger, out) = logger(Config::new("svc"));
        logger.event(&Context::background(), "checkout", attach![unencodable()]);

        let lines = out.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["event"], MARSHAL_ERROR_EVENT);
        assert!(lines[0]["errors"][0]["message"].as_str().unwrap().contains("key must be a string"));
        let dump = lines[0]["data"]["event_data"].as_str().unwrap();
        assert!(dump.contains("checkout"));
    }

    #[test]
    #[should_panic(expected = "error marshalling event data: Record")]
    fn unencodable_data_panics_when_strict() {
        let (logger, _) = logger(Config::new("svc").strict(true));
        logger.event(&Context::background(), "checkout", attach![unencodable()]);
    }

    #[test]
    fn every_renderer_handles_unencodable_data() {
        for config in [
            Config::new("svc").human(true).colors(false),
            Config::new("svc").minimum_alloc(true),
        ] {
            let (logger, out) = logger(config);
            logger.event(&Context::background(), "checkout", attach![unencodable()]);
            let text = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
            assert!(text.contains(MARSHAL_ERROR_EVENT));
            assert!(!text.contains("\"event\": \"checkout\"") && !text.contains("\"event\":\"checkout\""));
        }
    }

    #[test]
    fn destination_can_be_swapped() {
        let (logger, first) = logger(Config::new("svc"));
        let second = Shared::default();
        let ctx = Context::background();

        logger.event(&ctx, "one", attach![]);
        let _previous = logger.set_destination(second.clone());
        logger.event(&ctx, "two", attach![]);

        assert_eq!(first.lines()[0]["event"], "one");
        assert_eq!(second.lines()[0]["event"], "two");
        assert_eq!(first.lines().len(), 1);
    }

    #[test]
    fn broken_primary_falls_back() {
        let fallback = Shared::default();
        let logger = Logger::with_writers(Config::new("svc"), Box::new(Broken), Box::new(fallback.clone()));
        logger.event(&Context::background(), "e", attach![]);
        assert_eq!(fallback.lines()[0]["event"], "e");
    }

    #[test]
    #[should_panic(expected = "output failure: error writing log data")]
    fn losing_both_streams_calls_the_handler() {
        let logger = Logger::with_writers(Config::new("svc"), Box::new(Broken), Box::new(Broken))
            .with_output_failure_handler(panic_on_failure);
        logger.event(&Context::background(), "e", attach![]);
    }

    #[test]
    fn previous_fallback_is_returned() {
        let (logger, _) = logger(Config::new("svc"));
        let mut previous = logger.set_fallback_destination(Shared::default());
        assert!(previous.write_all(b"x").is_err());
    }

    #[test]
    fn explicit_fields_trim_unrolled_output() {
        let (logger, out) = logger(Config::new("svc").minimum_alloc(true));
        logger.event_with_fields(
            &Context::background(),
            "proxying",
            &FieldSelection::PROXY,
            attach![Http::new().with_status_code(200).with_method("GET")],
        );

        let line = &out.lines()[0];
        assert!(line.get("namespace").is_none());
        assert_eq!(line["http"], serde_json::json!({"status_code": 200}));
    }
}
