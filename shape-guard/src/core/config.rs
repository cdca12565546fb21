//! Per-call validation options and message values.

use super::issue::Issue;
use super::registry::Registry;
use std::fmt;
use std::sync::Arc;

/// Recursion limit for lazy schemas when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// A closure that renders a message from the issue being reported.
pub type MessageFn = dyn Fn(&Issue) -> String + Send + Sync;

/// A static message or one computed from the issue.
#[derive(Clone)]
pub enum Message {
    Text(String),
    Dynamic(Arc<MessageFn>),
}

impl Message {
    pub fn dynamic(f: impl Fn(&Issue) -> String + Send + Sync + 'static) -> Self {
        Self::Dynamic(Arc::new(f))
    }

    /// Produces the final string for `issue`.
    pub fn render(&self, issue: &Issue) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Dynamic(f) => f(issue),
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Options that steer a validation run.
///
/// Every option is optional so configs can be layered: [`Config::merged_over`]
/// keeps the receiver's set options and fills the rest from a base config.
///
/// # Examples
///
/// ```rust
/// use shape_guard::core::Config;
///
/// let global = Config::new().with_lang("de").with_abort_pipe_early(true);
/// let local = Config::new().with_abort_early(true);
/// let merged = local.merged_over(&global);
/// assert!(merged.abort_early());
/// assert!(merged.abort_pipe_early());
/// assert_eq!(merged.lang(), Some("de"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Locale used to look up registered messages
    pub lang: Option<String>,
    /// Message used for every issue raised under this config
    pub message: Option<Message>,
    /// Stop all remaining validation at the first issue
    pub abort_early: Option<bool>,
    /// Stop the current pipe at its first issue
    pub abort_pipe_early: Option<bool>,
    /// Run base schemas only, skipping every pipe step
    pub skip_pipe: Option<bool>,
    /// Maximum nesting of lazy schemas
    pub max_depth: Option<usize>,
    registry: Option<Arc<Registry>>,
    depth: usize,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_abort_early(mut self, enabled: bool) -> Self {
        self.abort_early = Some(enabled);
        self
    }

    pub fn with_abort_pipe_early(mut self, enabled: bool) -> Self {
        self.abort_pipe_early = Some(enabled);
        self
    }

    pub fn with_skip_pipe(mut self, enabled: bool) -> Self {
        self.skip_pipe = Some(enabled);
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Uses `registry` for message lookups instead of [`Registry::shared`].
    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn abort_early(&self) -> bool {
        self.abort_early.unwrap_or(false)
    }

    pub fn abort_pipe_early(&self) -> bool {
        self.abort_pipe_early.unwrap_or(false)
    }

    pub fn skip_pipe(&self) -> bool {
        self.skip_pipe.unwrap_or(false)
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH)
    }

    /// Current lazy-schema nesting level.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The registry consulted for messages.
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone().unwrap_or_else(Registry::shared)
    }

    pub(crate) fn without_registry(mut self) -> Self {
        self.registry = None;
        self
    }

    /// A copy of this config one lazy level deeper.
    pub fn descend(&self) -> Self {
        let mut config = self.clone();
        config.depth += 1;
        config
    }

    /// Shallow merge: options set on `self` win, unset ones come from `base`.
    pub fn merged_over(&self, base: &Config) -> Config {
        Config {
            lang: self.lang.clone().or_else(|| base.lang.clone()),
            message: self.message.clone().or_else(|| base.message.clone()),
            abort_early: self.abort_early.or(base.abort_early),
            abort_pipe_early: self.abort_pipe_early.or(base.abort_pipe_early),
            skip_pipe: self.skip_pipe.or(base.skip_pipe),
            max_depth: self.max_depth.or(base.max_depth),
            registry: self.registry.clone().or_else(|| base.registry.clone()),
            depth: self.depth.max(base.depth),
        }
    }
}
