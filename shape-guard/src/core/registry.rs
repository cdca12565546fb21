//! Process-scoped stores for the default config and localized messages.
//!
//! A [`Registry`] is an ordinary value: create one per application (or per
//! test) and hand it to validation through [`Config::with_registry`]. When no
//! registry is configured, [`Registry::shared`] is used.
//!
//! All stores are keyed by locale, where `None` is a locale of its own and not
//! a fallback for the others. Lookups take a read lock and clone the message;
//! the registry gives no transactional guarantees across stores.

use super::config::{Config, Message};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

static SHARED: Lazy<Arc<Registry>> = Lazy::new(|| Arc::new(Registry::new()));
static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// The constructor that built a schema or action, such as `"string"` or
/// `"min_length"`.
///
/// Every instance produced by the same constructor shares its identity, so
/// a message registered against an identity applies to all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity(&'static str);

impl Identity {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

type LangKey = Option<String>;

/// Global config plus global, schema-kind and identity-specific messages.
#[derive(Debug)]
pub struct Registry {
    id: u64,
    revision: AtomicU64,
    global_config: RwLock<Option<Config>>,
    global_messages: RwLock<HashMap<LangKey, Message>>,
    schema_messages: RwLock<HashMap<LangKey, Message>>,
    specific_messages: RwLock<HashMap<(Identity, LangKey), Message>>,
}

fn lang_key(lang: Option<&str>) -> LangKey {
    lang.map(str::to_string)
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            revision: AtomicU64::new(0),
            global_config: RwLock::default(),
            global_messages: RwLock::default(),
            schema_messages: RwLock::default(),
            specific_messages: RwLock::default(),
        }
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unique among the registries created by this process.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Incremented on every change to any store.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    fn touch(&self) {
        self.revision.fetch_add(1, Ordering::AcqRel);
    }

    /// The process-wide registry used when a config names none.
    pub fn shared() -> Arc<Registry> {
        Arc::clone(&SHARED)
    }

    /// Installs the default config merged under every call-local config.
    ///
    /// Any registry attached to `config` is dropped; the registry that holds
    /// the config is the one that applies.
    pub fn set_global_config(&self, config: Config) {
        debug!(
            config.lang = ?config.lang,
            config.abort_early = ?config.abort_early,
            config.abort_pipe_early = ?config.abort_pipe_early,
            "Setting global config"
        );
        *self
            .global_config
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(config.without_registry());
        self.touch();
    }

    pub fn global_config(&self) -> Option<Config> {
        self.global_config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn delete_global_config(&self) {
        *self
            .global_config
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
        self.touch();
    }

    /// Merges `local` over the global config. Local keys win.
    pub fn resolve_config(&self, local: Option<&Config>) -> Config {
        match (local, self.global_config()) {
            (Some(local), Some(global)) => local.merged_over(&global),
            (Some(local), None) => local.clone(),
            (None, Some(global)) => global,
            (None, None) => Config::new(),
        }
    }

    pub fn set_global_message(&self, message: impl Into<Message>, lang: Option<&str>) {
        self.global_messages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(lang_key(lang), message.into());
        self.touch();
    }

    pub fn global_message(&self, lang: Option<&str>) -> Option<Message> {
        self.global_messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&lang_key(lang))
            .cloned()
    }

    pub fn delete_global_message(&self, lang: Option<&str>) {
        self.global_messages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&lang_key(lang));
        self.touch();
    }

    /// Registers a message for every schema-kind issue in `lang`.
    pub fn set_schema_message(&self, message: impl Into<Message>, lang: Option<&str>) {
        self.schema_messages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(lang_key(lang), message.into());
        self.touch();
    }

    pub fn schema_message(&self, lang: Option<&str>) -> Option<Message> {
        self.schema_messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&lang_key(lang))
            .cloned()
    }

    pub fn delete_schema_message(&self, lang: Option<&str>) {
        self.schema_messages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&lang_key(lang));
        self.touch();
    }

    /// Registers a message for every schema or action built by `identity`.
    pub fn set_specific_message(
        &self,
        identity: Identity,
        message: impl Into<Message>,
        lang: Option<&str>,
    ) {
        self.specific_messages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((identity, lang_key(lang)), message.into());
        self.touch();
    }

    pub fn specific_message(&self, identity: Identity, lang: Option<&str>) -> Option<Message> {
        self.specific_messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(identity, lang_key(lang)))
            .cloned()
    }

    pub fn delete_specific_message(&self, identity: Identity, lang: Option<&str>) {
        self.specific_messages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(identity, lang_key(lang)));
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRING: Identity = Identity::new("string");

    #[test]
    fn test_global_config_lifecycle() {
        let registry = Registry::new();
        assert!(registry.global_config().is_none());

        registry.set_global_config(Config::new().with_abort_early(true));
        assert!(registry.global_config().unwrap().abort_early());

        let resolved = registry.resolve_config(Some(&Config::new().with_lang("de")));
        assert!(resolved.abort_early());
        assert_eq!(resolved.lang(), Some("de"));

        registry.delete_global_config();
        assert!(registry.global_config().is_none());
        assert!(!registry.resolve_config(None).abort_early());
    }

    #[test]
    fn test_messages_are_keyed_by_locale() {
        let registry = Registry::new();
        registry.set_global_message("fallback", None);
        registry.set_global_message("Ungültig", Some("de"));

        assert!(matches!(registry.global_message(None), Some(Message::Text(t)) if t == "fallback"));
        assert!(matches!(registry.global_message(Some("de")), Some(Message::Text(t)) if t == "Ungültig"));
        assert!(registry.global_message(Some("fr")).is_none());

        registry.delete_global_message(Some("de"));
        assert!(registry.global_message(Some("de")).is_none());
        assert!(registry.global_message(None).is_some());
    }

    #[test]
    fn test_specific_messages_are_keyed_by_identity() {
        let registry = Registry::new();
        registry.set_specific_message(STRING, "need text", Some("en"));

        assert!(registry.specific_message(STRING, Some("en")).is_some());
        assert!(registry
            .specific_message(Identity::new("number"), Some("en"))
            .is_none());
        assert!(registry.specific_message(STRING, None).is_none());

        registry.delete_specific_message(STRING, Some("en"));
        assert!(registry.specific_message(STRING, Some("en")).is_none());
    }

    #[test]
    fn test_every_change_bumps_revision() {
        let registry = Registry::new();
        assert_ne!(registry.id(), Registry::new().id());

        let start = registry.revision();
        registry.set_global_message("fallback", None);
        registry.delete_global_message(None);
        registry.set_global_config(Config::new().with_lang("de"));
        assert_eq!(registry.revision(), start + 3);

        registry.global_message(None);
        registry.specific_message(STRING, None);
        assert_eq!(registry.revision(), start + 3);
    }

    #[test]
    fn test_schema_message_store() {
        let registry = Registry::new();
        registry.set_schema_message("wrong shape", None);
        assert!(registry.schema_message(None).is_some());
        registry.delete_schema_message(None);
        assert!(registry.schema_message(None).is_none());
    }
}
