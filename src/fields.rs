/// Which members of the `http` object the unrolled renderer writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpFields {
    pub status_code: bool,
    pub method: bool,
    pub scheme: bool,
    pub host: bool,
    pub port: bool,
    pub path: bool,
    pub query: bool,
    pub started_at: bool,
    pub ended_at: bool,
    pub duration: bool,
    pub response_content_length: bool,
}

impl HttpFields {
    pub const ALL: HttpFields = HttpFields {
        status_code: true,
        method: true,
        scheme: true,
        host: true,
        port: true,
        path: true,
        query: true,
        started_at: true,
        ended_at: true,
        duration: true,
        response_content_length: true,
    };

    pub const NONE: HttpFields = HttpFields {
        status_code: false,
        method: false,
        scheme: false,
        host: false,
        port: false,
        path: false,
        query: false,
        started_at: false,
        ended_at: false,
        duration: false,
        response_content_length: false,
    };
}

/// Which top level fields of a record the unrolled renderer writes.
///
/// `created_at` and `event` are always written. A field that is selected but
/// empty in the record is still omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelection {
    pub namespace: bool,
    pub trace_id: bool,
    pub severity: bool,
    pub http: HttpFields,
    pub auth: bool,
    pub data: bool,
    pub errors: bool,
}

impl FieldSelection {
    /// Every field; output is equivalent to the generic machine renderer.
    pub const FULL: FieldSelection = FieldSelection {
        namespace: true,
        trace_id: true,
        severity: true,
        http: HttpFields::ALL,
        auth: true,
        data: true,
        errors: true,
    };

    /// Request received: the URL is reduced to method, path and query.
    pub const ACCESS_LOG: FieldSelection = FieldSelection {
        http: HttpFields {
            scheme: false,
            host: false,
            port: false,
            ..HttpFields::ALL
        },
        ..FieldSelection::FULL
    };

    /// Proxying a request: no namespace, and the request only by its status,
    /// query and response size. Proxy details go in `data`.
    pub const PROXY: FieldSelection = FieldSelection {
        namespace: false,
        http: HttpFields {
            status_code: true,
            query: true,
            response_content_length: true,
            ..HttpFields::NONE
        },
        ..FieldSelection::FULL
    };

    /// Request completed: no namespace, and the request only by its status,
    /// timing and response size.
    pub const COMPLETION: FieldSelection = FieldSelection {
        namespace: false,
        http: HttpFields {
            status_code: true,
            started_at: true,
            ended_at: true,
            duration: true,
            response_content_length: true,
            ..HttpFields::NONE
        },
        ..FieldSelection::FULL
    };
}

impl Default for FieldSelection {
    fn default() -> Self {
        FieldSelection::FULL
    }
}
