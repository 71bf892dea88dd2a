use crate::config::Config;
use crate::layer::{is_own_target, EventLayer};
use crate::logger::Logger;
use crate::severity::ParseLevelError;
use std::sync::Arc;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("invalid logging configuration: {0}")]
    Config(#[from] ParseLevelError),

    #[error("a global tracing subscriber is already installed: {0}")]
    Subscriber(#[from] SetGlobalDefaultError),
}

/// Build a logger for `namespace` configured from the environment (see
/// [`Config::from_env`]) and install it as the global `tracing` subscriber.
///
/// **Returns**
/// - the logger, for direct event calls.
/// - `Err(InitError::Config)` if `LOG_LEVEL` is not a level.
/// - `Err(InitError::Subscriber)` if a global subscriber already exists.
pub fn init(namespace: impl Into<String>) -> Result<Arc<Logger>, InitError> {
    init_with_config(Config::from_env(namespace)?)
}

/// Build a logger from `config` and install it as the global `tracing`
/// subscriber.
///
/// Every `tracing` event in the process is forwarded to the logger through
/// an [`EventLayer`], except this crate's own diagnostics, which are printed
/// to stderr by a `fmt` layer.
pub fn init_with_config(config: Config) -> Result<Arc<Logger>, InitError> {
    let logger = Arc::new(Logger::new(config));

    let diagnostics = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter_fn(|meta| is_own_target(meta.target())));
    let subscriber = Registry::default()
        .with(EventLayer::new(Arc::clone(&logger)))
        .with(diagnostics);
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::debug!(
        namespace = logger.namespace(),
        renderer = ?logger.renderer(),
        level = %logger.level(),
        strict = logger.is_strict(),
        "event logging initialised"
    );
    Ok(logger)
}
