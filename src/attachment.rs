use crate::auth::Auth;
use crate::data::Data;
use crate::errors::Errors;
use crate::http::Http;
use crate::record::Record;
use crate::severity::Severity;
use std::fmt;

/// A value that sets exactly one optional field of a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    Severity(Severity),
    Http(Http),
    Auth(Auth),
    Data(Data),
    Errors(Errors),
}

/// Discriminant of an [`Attachment`], used to detect duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    Severity,
    Http,
    Auth,
    Data,
    Errors,
}

impl AttachmentKind {
    pub const fn name(self) -> &'static str {
        match self {
            AttachmentKind::Severity => "Severity",
            AttachmentKind::Http => "Http",
            AttachmentKind::Auth => "Auth",
            AttachmentKind::Data => "Data",
            AttachmentKind::Errors => "Errors",
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Attachment {
    pub fn kind(&self) -> AttachmentKind {
        match self {
            Attachment::Severity(_) => AttachmentKind::Severity,
            Attachment::Http(_) => AttachmentKind::Http,
            Attachment::Auth(_) => AttachmentKind::Auth,
            Attachment::Data(_) => AttachmentKind::Data,
            Attachment::Errors(_) => AttachmentKind::Errors,
        }
    }

    /// Set this attachment's field on `record`, replacing any earlier value.
    pub fn attach(self, record: &mut Record<'_>) {
        match self {
            Attachment::Severity(severity) => record.severity = Some(severity),
            Attachment::Http(http) => record.http = Some(http),
            Attachment::Auth(auth) => record.auth = Some(auth),
            Attachment::Data(data) => record.data = Some(data),
            Attachment::Errors(errors) => record.errors = Some(errors),
        }
    }
}

impl From<Severity> for Attachment {
    fn from(severity: Severity) -> Self {
        Attachment::Severity(severity)
    }
}

impl From<Http> for Attachment {
    fn from(http: Http) -> Self {
        Attachment::Http(http)
    }
}

impl From<Auth> for Attachment {
    fn from(auth: Auth) -> Self {
        Attachment::Auth(auth)
    }
}

impl From<Data> for Attachment {
    fn from(data: Data) -> Self {
        Attachment::Data(data)
    }
}

impl From<Errors> for Attachment {
    fn from(errors: Errors) -> Self {
        Attachment::Errors(errors)
    }
}

/// Caller misuse detected in strict mode.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MisuseError {
    #[error("can't pass in the same parameter type multiple times: {0}")]
    Duplicate(AttachmentKind),

    #[error("severity must not be passed as an attachment: {0}")]
    PositionalSeverity(Severity),
}

/// How much checking [`merge`] does before attaching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Attach in order, later values of a kind replace earlier ones.
    None,
    /// Reject the first kind seen twice, scanning left to right.
    Duplicates,
    /// As `Duplicates`, and also reject any `Severity` attachment because
    /// the severity was already given as a call parameter.
    DuplicatesAndSeverity,
}

/// Apply `attachments` to `record` in order.
///
/// With [`Check::None`] the rightmost attachment of each kind wins. The other
/// modes validate the whole sequence first and leave `record` untouched when
/// it is rejected.
pub fn merge<I>(record: &mut Record<'_>, attachments: I, check: Check) -> Result<(), MisuseError>
where
    I: IntoIterator<Item = Attachment>,
{
    if check == Check::None {
        for attachment in attachments {
            attachment.attach(record);
        }
        return Ok(());
    }

    let attachments: Vec<Attachment> = attachments.into_iter().collect();
    validate(&attachments, check == Check::DuplicatesAndSeverity)?;
    for attachment in attachments {
        attachment.attach(record);
    }
    Ok(())
}

/// Scan `attachments` left to right for misuse.
pub fn validate(attachments: &[Attachment], reject_severity: bool) -> Result<(), MisuseError> {
    let mut seen = 0u8;
    for attachment in attachments {
        let kind = attachment.kind();
        if seen & kind.bit() != 0 {
            return Err(MisuseError::Duplicate(kind));
        }
        seen |= kind.bit();

        if let (true, Attachment::Severity(severity)) = (reject_severity, attachment) {
            return Err(MisuseError::PositionalSeverity(*severity));
        }
    }
    Ok(())
}

/// Build an array of [`Attachment`]s from values of different types.
///
/// ```
/// use event_log::{attach, Data, Severity};
///
/// let attachments = attach![Severity::Warn, Data::new().with("key", "value")];
/// assert_eq!(attachments.len(), 2);
/// ```
#[macro_export]
macro_rules! attach {
    () => ([] as [$crate::Attachment; 0]);
    ( $($value:expr),+ $(,)? ) => ([ $( $crate::Attachment::from($value) ),+ ]);
}
