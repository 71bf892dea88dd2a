/// Request or correlation context an event is logged under.
///
/// Only the trace id is read by the pipeline; it is copied onto every
/// record created with this context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    trace_id: Option<String>,
}

impl Context {
    /// A context with no correlation data.
    pub const fn background() -> Self {
        Context { trace_id: None }
    }

    pub fn with_trace_id(trace_id: impl Into<String>) -> Self {
        let trace_id = trace_id.into();
        Context {
            trace_id: (!trace_id.is_empty()).then_some(trace_id),
        }
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }
}
