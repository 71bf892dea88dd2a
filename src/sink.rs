use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Writer type accepted as an output destination.
pub type Destination = Box<dyn Write + Send>;

/// Which stream ended up holding a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Primary,
    Fallback,
}

/// Both the primary and the fallback stream refused a write.
#[derive(thiserror::Error, Debug)]
#[error("error writing log data: {primary}; fallback also failed: {fallback}")]
pub struct OutputFailure {
    pub primary: io::Error,
    pub fallback: io::Error,
}

/// Primary and fallback output streams for rendered events.
///
/// Each stream sits behind its own mutex, held for the whole of a write, so
/// concurrent writers never interleave partial lines and a destination swap
/// is never observed half way through a write.
pub struct Sink {
    primary: Mutex<Destination>,
    fallback: Mutex<Destination>,
}

impl Sink {
    pub fn new(primary: Destination, fallback: Destination) -> Self {
        Sink {
            primary: Mutex::new(primary),
            fallback: Mutex::new(fallback),
        }
    }

    /// Write one rendered event.
    ///
    /// **Returns**
    /// - `Ok(WriteOutcome::Primary)` if the primary stream took all of `bytes`.
    /// - `Ok(WriteOutcome::Fallback)` if the primary failed or wrote short and
    ///   the whole payload was then written to the fallback stream.
    /// - `Err(OutputFailure)` if both streams failed.
    pub fn write(&self, bytes: &[u8]) -> Result<WriteOutcome, OutputFailure> {
        let primary = match write_to(&self.primary, bytes) {
            Ok(()) => return Ok(WriteOutcome::Primary),
            Err(e) => e,
        };

        tracing::warn!(error = %primary, "primary log destination failed, using fallback");

        match write_to(&self.fallback, bytes) {
            Ok(()) => Ok(WriteOutcome::Fallback),
            Err(fallback) => Err(OutputFailure { primary, fallback }),
        }
    }

    /// Replace the primary stream, returning the one it replaces.
    pub fn set_primary(&self, writer: Destination) -> Destination {
        std::mem::replace(&mut *lock(&self.primary), writer)
    }

    /// Replace the fallback stream, returning the one it replaces.
    pub fn set_fallback(&self, writer: Destination) -> Destination {
        std::mem::replace(&mut *lock(&self.fallback), writer)
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sink").finish_non_exhaustive()
    }
}

fn lock(stream: &Mutex<Destination>) -> MutexGuard<'_, Destination> {
    stream.lock().unwrap_or_else(PoisonError::into_inner)
}

/// `write_all` then `flush`; a short write (`Ok(0)`) surfaces as
/// `ErrorKind::WriteZero`.
fn write_to(stream: &Mutex<Destination>, bytes: &[u8]) -> io::Result<()> {
    let mut writer = lock(stream);
    writer.write_all(bytes)?;
    writer.flush()
}
