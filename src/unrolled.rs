//! Low-allocation JSON renderer.
//!
//! Writes a [`Record`] straight into a byte buffer with the encoders in
//! [`crate::encode`]. For every field it supports the output parses to the
//! same JSON as the generic renderer; timestamps may differ in how many
//! fractional digits they carry.
//!
//! `data` string values are written inline. Any other `data` value, and the
//! `auth` and `errors` objects, go through `serde_json` since they are off the
//! hot path.

use crate::data::Data;
use crate::encode::ObjectWriter;
use crate::fields::{FieldSelection, HttpFields};
use crate::http::{duration_nanos, Http};
use crate::record::Record;

/// Append `record` to `buf` as one line of JSON, including the trailing
/// newline.
///
/// Fails only when a `data` value can't be encoded; `buf` then holds a
/// partial line and should be discarded.
pub fn render(buf: &mut Vec<u8>, record: &Record<'_>, fields: &FieldSelection) -> serde_json::Result<()> {
    let mut obj = ObjectWriter::begin(buf);

    obj.timestamp("created_at", &record.created_at);

    if fields.namespace && !record.namespace.is_empty() {
        obj.str("namespace", record.namespace);
    }

    if !record.event.is_empty() {
        obj.str("event", record.event);
    }

    if let (true, Some(trace_id)) = (fields.trace_id, record.trace_id) {
        if !trace_id.is_empty() {
            obj.str("trace_id", trace_id);
        }
    }

    if let (true, Some(severity)) = (fields.severity, record.severity) {
        obj.u64("severity", severity.as_u8() as u64);
    }

    if let Some(http) = &record.http {
        write_http(obj.key("http"), http, &fields.http);
    }

    if let (true, Some(auth)) = (fields.auth, &record.auth) {
        serde_json::to_writer(obj.key("auth"), auth)?;
    }

    if let (true, Some(data)) = (fields.data, &record.data) {
        write_data(obj.key("data"), data)?;
    }

    if let (true, Some(errors)) = (fields.errors, &record.errors) {
        serde_json::to_writer(obj.key("errors"), errors)?;
    }

    obj.end();
    buf.push(b'\n');
    Ok(())
}

fn write_http(buf: &mut Vec<u8>, http: &Http, fields: &HttpFields) {
    let mut obj = ObjectWriter::begin(buf);

    if let (true, Some(status_code)) = (fields.status_code, http.status_code()) {
        obj.u64("status_code", status_code as u64);
    }
    if fields.method && !http.method().is_empty() {
        obj.str("method", http.method());
    }
    if fields.scheme && !http.scheme().is_empty() {
        obj.str("scheme", http.scheme());
    }
    if fields.host && !http.host().is_empty() {
        obj.str("host", http.host());
    }
    if let (true, Some(port)) = (fields.port, http.port()) {
        obj.u64("port", port as u64);
    }
    if fields.path && !http.path().is_empty() {
        obj.str("path", http.path());
    }
    if fields.query && !http.query().is_empty() {
        obj.str("query", http.query());
    }
    if let (true, Some(started_at)) = (fields.started_at, http.started_at()) {
        obj.timestamp("started_at", &started_at);
    }
    if let (true, Some(ended_at)) = (fields.ended_at, http.ended_at()) {
        obj.timestamp("ended_at", &ended_at);
    }
    if let (true, Some(duration)) = (fields.duration, http.duration()) {
        obj.i64("duration", duration_nanos(&duration));
    }
    // A zero length is indistinguishable from "not set", and not worth a field.
    if fields.response_content_length && http.response_content_length() != 0 {
        obj.i64("response_content_length", http.response_content_length());
    }

    obj.end();
}

fn write_data(buf: &mut Vec<u8>, data: &Data) -> serde_json::Result<()> {
    let mut obj = ObjectWriter::begin(buf);
    for (key, value) in data.iter() {
        match value.as_str() {
            Some(s) => obj.str(key, s),
            None => value.write_json(obj.key(key))?,
        }
    }
    obj.end();
    Ok(())
}
