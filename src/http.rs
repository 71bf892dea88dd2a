use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use url::Url;

/// HTTP request/response metadata attached to an event.
///
/// `duration` is never set directly: it is derived from the start and end
/// timestamps and is only present when both are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Http {
    #[serde(skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
    #[serde(skip_serializing_if = "String::is_empty")]
    method: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    scheme: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
    #[serde(skip_serializing_if = "String::is_empty")]
    path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    query: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ended_at: Option<DateTime<Utc>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_nanos"
    )]
    duration: Option<chrono::Duration>,
    #[serde(skip_serializing_if = "is_zero")]
    response_content_length: i64,
}

fn is_zero(n: &i64) -> bool {
    *n == 0
}

fn serialize_nanos<S: Serializer>(
    duration: &Option<chrono::Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match duration {
        Some(d) => serializer.serialize_i64(duration_nanos(d)),
        None => serializer.serialize_none(),
    }
}

/// Whole nanoseconds in `d`, saturating at the `i64` bounds.
pub(crate) fn duration_nanos(d: &chrono::Duration) -> i64 {
    d.num_nanoseconds()
        .unwrap_or(if *d < chrono::Duration::zero() { i64::MIN } else { i64::MAX })
}

impl Http {
    pub fn new() -> Self {
        Http::default()
    }

    /// Split a request URL into its parts.
    ///
    /// Only an explicit port in the URL is recorded; the scheme's default
    /// port is not filled in.
    pub fn from_url(method: impl Into<String>, url: &Url) -> Self {
        Http {
            method: method.into(),
            scheme: url.scheme().to_string(),
            host: url.host_str().unwrap_or_default().to_string(),
            port: url.port(),
            path: url.path().to_string(),
            query: url.query().unwrap_or_default().to_string(),
            ..Http::default()
        }
    }

    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_response_content_length(mut self, length: i64) -> Self {
        self.response_content_length = length;
        self
    }

    /// Set the request timing and recompute the duration.
    pub fn with_timing(
        mut self,
        started_at: Option<DateTime<Utc>>,
        ended_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.started_at = started_at;
        self.ended_at = ended_at;
        self.duration = match (started_at, ended_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        };
        self
    }

    pub fn with_started_at(self, started_at: DateTime<Utc>) -> Self {
        let ended_at = self.ended_at;
        self.with_timing(Some(started_at), ended_at)
    }

    pub fn with_ended_at(self, ended_at: DateTime<Utc>) -> Self {
        let started_at = self.started_at;
        self.with_timing(started_at, Some(ended_at))
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn duration(&self) -> Option<chrono::Duration> {
        self.duration
    }

    pub fn response_content_length(&self) -> i64 {
        self.response_content_length
    }
}
