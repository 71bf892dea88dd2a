use crate::traced::TracedError;
use serde::Serialize;
use std::error::Error as StdError;

/// One location in a stack trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackFrame {
    pub file: String,
    pub line: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub function: String,
}

/// One error in an unwrap chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEntry {
    pub message: String,
    pub stack_trace: Vec<StackFrame>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Formatted errors attached to an event, outermost error first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Errors(pub Vec<ErrorEntry>);

impl Errors {
    pub fn entries(&self) -> &[ErrorEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Unwrap `err` through its `source()` chain, producing one entry per link.
///
/// Stack traces are only filled in for errors that carry one (see
/// [`TracedError`]); every other link gets an empty trace.
pub fn format_error(err: &(dyn StdError + 'static)) -> Errors {
    let mut entries = Vec::new();
    push_chain(&mut entries, err);
    Errors(entries)
}

/// Format several independent errors into one list. `None` entries are
/// skipped.
pub fn format_errors<'a, I>(errs: I) -> Errors
where
    I: IntoIterator<Item = Option<&'a (dyn StdError + 'static)>>,
{
    let mut entries = Vec::new();
    for err in errs.into_iter().flatten() {
        push_chain(&mut entries, err);
    }
    Errors(entries)
}

fn push_chain(entries: &mut Vec<ErrorEntry>, err: &(dyn StdError + 'static)) {
    let mut next = Some(err);
    while let Some(err) = next {
        entries.push(entry_for(err));
        next = err.source();
    }
}

fn entry_for(err: &(dyn StdError + 'static)) -> ErrorEntry {
    let mut entry = ErrorEntry {
        message: err.to_string(),
        stack_trace: Vec::new(),
        data: None,
    };

    if let Some(traced) = err.downcast_ref::<TracedError>() {
        let location = traced.location();
        entry.stack_trace.push(StackFrame {
            file: location.file().to_string(),
            line: location.line(),
            function: String::new(),
        });
        entry.data = traced.data().cloned();
    }

    entry
}

/// Format an `anyhow::Error` chain.
///
/// anyhow captures a single backtrace for the whole chain, so the frames
/// parsed from it are attached to the outermost entry only.
#[cfg(feature = "anyhow")]
pub fn format_anyhow(err: &anyhow::Error) -> Errors {
    let mut entries = Vec::new();
    for link in err.chain() {
        entries.push(entry_for(link));
    }

    if let Some(first) = entries.first_mut() {
        if first.stack_trace.is_empty() {
            first.stack_trace = parse_backtrace(&err.backtrace().to_string());
        }
    }

    Errors(entries)
}

/// Parse the text form of a captured `std::backtrace::Backtrace`.
///
/// The trailer looks like
///
/// ```text
///    0: my_crate::module::function
///              at ./src/module.rs:10:5
///    1: std::rt::lang_start
/// ```
///
/// Each numbered line names a function; an indented `at file:line:col` line
/// directly below it gives the location. Frames without a location are kept
/// with an empty file and line 0. Text that isn't a backtrace (e.g.
/// "disabled backtrace") yields no frames.
pub fn parse_backtrace(text: &str) -> Vec<StackFrame> {
    let mut frames: Vec<StackFrame> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(location) = trimmed.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                if frame.file.is_empty() {
                    let (file, line) = split_location(location);
                    frame.file = file;
                    frame.line = line;
                }
            }
            continue;
        }

        let Some((index, function)) = trimmed.split_once(':') else {
            continue;
        };
        if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }

        frames.push(StackFrame {
            file: String::new(),
            line: 0,
            function: function.trim().to_string(),
        });
    }

    frames
}

/// Split `path:line:col` (column optional) from the right, so paths
/// containing `:` survive.
fn split_location(location: &str) -> (String, u32) {
    let mut parts = location.rsplitn(3, ':');
    let last = parts.next().unwrap_or_default();
    let middle = parts.next();
    let rest = parts.next();

    match (rest, middle) {
        (Some(file), Some(line)) if line.parse::<u32>().is_ok() => {
            (file.to_string(), line.parse().unwrap_or_default())
        }
        (None, Some(file)) => (file.to_string(), last.parse().unwrap_or_default()),
        (Some(file), Some(middle)) => (format!("{}:{}", file, middle), last.parse().unwrap_or_default()),
        _ => (location.to_string(), 0),
    }
}
