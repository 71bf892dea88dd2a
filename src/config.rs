use crate::env::{env_bool, LOG_LEVEL_ENV, HUMAN_LOG_ENV, LOG_STRICT_ENV, MINIMUM_ALLOC_ENV};
use crate::fields::FieldSelection;
use crate::render::Renderer;
use crate::severity::{Level, ParseLevelError};

/// Logger configuration.
///
/// **Fields**
/// - `namespace`: service name written on every event.
/// - `human`: pretty print events instead of one JSON object per line.
/// - `colors`: highlight human output (ignored for machine output).
/// - `minimum_alloc`: use the low-allocation renderer with
///   [`FieldSelection::FULL`]. Ignored when `human` is set.
/// - `level`: events below this level are dropped.
/// - `strict`: panic on caller misuse and on unencodable event data instead
///   of recovering. Meant for tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub namespace: String,
    pub human: bool,
    pub colors: bool,
    pub minimum_alloc: bool,
    pub level: Level,
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            human: false,
            colors: true,
            minimum_alloc: false,
            level: Level::INFO,
            strict: false,
        }
    }
}

impl Config {
    pub fn new(namespace: impl Into<String>) -> Self {
        Config {
            namespace: namespace.into(),
            ..Config::default()
        }
    }

    /// Defaults for `namespace`, overridden by `HUMAN_LOG`, `LOG_LEVEL`,
    /// `MINIMUM_ALLOC` and `LOG_STRICT` when set.
    ///
    /// Fails only when `LOG_LEVEL` is set to something that isn't a level.
    /// Unrecognised boolean values are ignored.
    pub fn from_env(namespace: impl Into<String>) -> Result<Self, ParseLevelError> {
        let mut config = Config::new(namespace);
        if let Some(human) = env_bool(HUMAN_LOG_ENV) {
            config.human = human;
        }
        if let Some(minimum_alloc) = env_bool(MINIMUM_ALLOC_ENV) {
            config.minimum_alloc = minimum_alloc;
        }
        if let Some(strict) = env_bool(LOG_STRICT_ENV) {
            config.strict = strict;
        }
        if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
            if !level.is_empty() {
                config.level = level.parse()?;
            }
        }
        Ok(config)
    }

    pub fn human(mut self, human: bool) -> Self {
        self.human = human;
        self
    }

    pub fn colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    pub fn minimum_alloc(mut self, minimum_alloc: bool) -> Self {
        self.minimum_alloc = minimum_alloc;
        self
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// The renderer these settings select.
    pub fn renderer(&self) -> Renderer {
        if self.human {
            Renderer::Human { colors: self.colors }
        } else if self.minimum_alloc {
            Renderer::Unrolled(FieldSelection::FULL)
        } else {
            Renderer::Machine
        }
    }
}
