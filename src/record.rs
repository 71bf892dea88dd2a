use crate::auth::Auth;
use crate::context::Context;
use crate::data::Data;
use crate::errors::Errors;
use crate::http::Http;
use crate::severity::Severity;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One logged event, assembled from its attachments and rendered once.
///
/// The string fields borrow from the logger and the caller; attachments are
/// owned. A record is created fresh for every event and dropped after it has
/// been written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record<'a> {
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "is_empty")]
    pub namespace: &'a str,
    #[serde(skip_serializing_if = "is_empty")]
    pub event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<Http>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<Auth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Data>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Errors>,
}

fn is_empty(s: &&str) -> bool {
    s.is_empty()
}

impl<'a> Record<'a> {
    /// Start a record stamped with the current UTC time.
    pub fn new(namespace: &'a str, event: &'a str, ctx: &'a Context) -> Self {
        Record::at(Utc::now(), namespace, event, ctx)
    }

    /// Start a record with a fixed creation time.
    pub fn at(created_at: DateTime<Utc>, namespace: &'a str, event: &'a str, ctx: &'a Context) -> Self {
        Record {
            created_at,
            namespace,
            event,
            trace_id: ctx.trace_id().filter(|id| !id.is_empty()),
            severity: None,
            http: None,
            auth: None,
            data: None,
            errors: None,
        }
    }

    /// Severity used for level filtering; events without one count as INFO.
    pub fn effective_severity(&self) -> Severity {
        self.severity.unwrap_or(Severity::Info)
    }
}
