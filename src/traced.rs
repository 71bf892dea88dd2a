use serde::Serialize;
use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// An error that remembers where it was created or wrapped.
///
/// Each `new` or `wrap` call records exactly one frame, the caller's
/// location, so a chain built from `TracedError`s formats to one frame per
/// wrap level. Optional structured data is carried along and ends up in the
/// `data` field of the formatted error entry.
///
/// ```
/// use event_log::TracedError;
///
/// let root = TracedError::new("connection refused");
/// let err = TracedError::wrap(root, "failed to load dataset");
/// assert_eq!(err.to_string(), "failed to load dataset");
/// ```
pub struct TracedError {
    message: String,
    location: &'static Location<'static>,
    data: Option<serde_json::Value>,
    source: Option<BoxError>,
}

impl TracedError {
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        TracedError {
            message: message.into(),
            location: Location::caller(),
            data: None,
            source: None,
        }
    }

    #[track_caller]
    pub fn wrap<E>(source: E, message: impl Into<String>) -> Self
    where
        E: Into<BoxError>,
    {
        TracedError {
            message: message.into(),
            location: Location::caller(),
            data: None,
            source: Some(source.into()),
        }
    }

    /// Attach structured data. Values `serde_json` can't encode are dropped.
    pub fn with_data<T: Serialize>(mut self, data: T) -> Self {
        self.data = serde_json::to_value(data).ok();
        self
    }

    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    pub fn data(&self) -> Option<&serde_json::Value> {
        self.data.as_ref()
    }
}

impl fmt::Display for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedError")
            .field("message", &self.message)
            .field("location", &format_args!("{}", self.location))
            .field("data", &self.data)
            .field("source", &self.source)
            .finish()
    }
}

impl StdError for TracedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}
