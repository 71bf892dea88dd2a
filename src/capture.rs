use crate::context::Context;
use crate::data::Data;
use crate::logger::Logger;
use crate::attach;
use std::io;
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

/// Event name for text captured from other loggers.
pub const THIRD_PARTY_EVENT: &str = "third party logs";

/// Redirects text written by another logger into the event pipeline.
///
/// Every `write` call becomes one INFO event, `"third party logs"`, with the
/// written text (surrounding whitespace trimmed) under `data.raw`. It is
/// also a [`MakeWriter`], so a `tracing_subscriber::fmt` layer can print
/// through it:
///
/// ```
/// use event_log::{CaptureWriter, Config, Logger};
/// use std::sync::Arc;
///
/// let logger = Arc::new(Logger::new(Config::new("svc")));
/// let subscriber = tracing_subscriber::fmt()
///     .with_writer(CaptureWriter::new(logger))
///     .without_time()
///     .finish();
/// # drop(subscriber);
/// ```
#[derive(Clone, Debug)]
pub struct CaptureWriter {
    logger: Arc<Logger>,
}

impl CaptureWriter {
    pub fn new(logger: Arc<Logger>) -> Self {
        CaptureWriter { logger }
    }
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let raw = String::from_utf8_lossy(buf).trim().to_string();
        self.logger.info(
            &Context::background(),
            THIRD_PARTY_EVENT,
            attach![Data::new().with("raw", raw)],
        );
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureWriter {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
