//! Structured event logging: one JSON object per line.
//!
//! An event is a name plus optional attachments ([`Severity`], [`Http`],
//! [`Auth`], [`Data`], [`Errors`]) merged into a [`Record`], rendered by the
//! configured [`Renderer`] into a pooled buffer and written to a primary
//! stream, or to a fallback stream when the primary fails.
//!
//! ```
//! use event_log::{attach, data, Config, Context, Logger, Severity};
//!
//! let logger = Logger::with_writers(Config::new("svc"), Box::new(std::io::sink()), Box::new(std::io::sink()));
//! logger.event(&Context::background(), "starting", attach![Severity::Info, data! { "port" => 8080 }]);
//! ```

pub mod attachment;
pub mod auth;
pub mod capture;
pub mod config;
pub mod context;
pub mod data;
pub mod encode;
pub mod env;
pub mod errors;
pub mod fields;
pub mod http;
pub mod init;
pub mod layer;
pub mod logger;
pub mod pool;
pub mod pretty;
pub mod record;
pub mod render;
pub mod severity;
pub mod sink;
pub mod traced;
pub mod unrolled;

pub use attachment::{Attachment, AttachmentKind, MisuseError};
pub use auth::{Auth, IdentityType};
pub use capture::CaptureWriter;
pub use config::Config;
pub use context::Context;
pub use data::{Data, DataValue};
pub use errors::{format_error, format_errors, ErrorEntry, Errors, StackFrame};
pub use fields::{FieldSelection, HttpFields};
pub use http::Http;
pub use init::{init, init_with_config, InitError};
pub use layer::EventLayer;
pub use logger::Logger;
pub use record::Record;
pub use render::{RenderError, Renderer};
pub use severity::{Level, ParseLevelError, Severity};
pub use sink::OutputFailure;
pub use traced::TracedError;

#[cfg(feature = "anyhow")]
pub use errors::format_anyhow;
