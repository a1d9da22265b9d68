//! Process-wide locale table.
//!
//! The table is created on first access with the built-in locales and is
//! append-only afterwards: [`define_locale`] replaces or adds an entry, it
//! never removes one. Readers clone the `Arc` out of the lock, so no lock is
//! held while a locale is used.

use super::{Locale, LocaleDef, ar, de, en, ru};
use crate::error::ChronosError;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

const DEFAULT_LOCALE: &str = "en";

#[derive(Debug)]
struct Registry {
    locales: HashMap<String, Arc<Locale>>,
    global: String,
}

impl Registry {
    fn with_builtins() -> Self {
        let mut registry = Registry { locales: HashMap::new(), global: DEFAULT_LOCALE.to_string() };
        let en = en::locale();
        let builtins = [
            ("en-gb", Locale::derive("en-gb", &en, en::en_gb())),
            ("de", Locale::derive("de", &en, de::definition())),
            ("ru", Locale::derive("ru", &en, ru::definition())),
            ("ar", Locale::derive("ar", &en, ar::definition())),
        ];
        registry.locales.insert(en.abbr.clone(), Arc::new(en));
        for (id, derived) in builtins {
            registry.insert_builtin(id, derived);
        }
        registry
    }

    /// A built-in that fails to derive is logged and left out.
    fn insert_builtin(&mut self, id: &str, derived: Result<Locale, ChronosError>) {
        match derived {
            Ok(locale) => {
                self.locales.insert(locale.abbr.clone(), Arc::new(locale));
            }
            Err(err) => tracing::warn!(locale = id, error = %err, "skipping built-in locale"),
        }
    }

    fn lookup(&self, id: &str) -> Option<Arc<Locale>> {
        let key = normalize_id(id);
        if let Some(locale) = self.locales.get(&key) {
            return Some(Arc::clone(locale));
        }
        let language = key.split('-').next()?;
        self.locales.get(language).map(Arc::clone)
    }
}

static REGISTRY: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::with_builtins()));

fn normalize_id(id: &str) -> String {
    id.trim().to_lowercase().replace('_', "-")
}

/// Register `def` under `id`, layered over `def.parent` (or `"en"`).
///
/// Redefining an existing id replaces it for subsequent lookups; values that
/// already hold the old `Arc` keep using it.
pub fn define_locale(id: &str, def: LocaleDef) -> Result<Arc<Locale>, ChronosError> {
    let key = normalize_id(id);
    if key.is_empty() {
        return Err(ChronosError::InvalidLocale { id: id.to_string(), reason: "empty locale id".to_string() });
    }
    let parent_id = def.parent.clone().unwrap_or_else(|| DEFAULT_LOCALE.to_string());
    let parent = get_locale(&parent_id).ok_or_else(|| ChronosError::UnknownLocale(parent_id.clone()))?;
    let locale = Arc::new(Locale::derive(&key, &parent, def)?);

    tracing::debug!(locale = %key, parent = %parent.abbr, "registered locale");
    REGISTRY.write().locales.insert(key, Arc::clone(&locale));
    Ok(locale)
}

/// Look up a locale by id, falling back from `xx-yy` to `xx`.
pub fn get_locale(id: &str) -> Option<Arc<Locale>> {
    REGISTRY.read().lookup(id)
}

/// Sorted ids of every registered locale.
pub fn list_locales() -> Vec<String> {
    let mut ids: Vec<String> = REGISTRY.read().locales.keys().cloned().collect();
    ids.sort();
    ids
}

/// The locale used when a caller does not name one.
pub fn global_locale() -> Arc<Locale> {
    let registry = REGISTRY.read();
    registry.lookup(&registry.global).unwrap_or_else(|| Arc::new(en::locale()))
}

pub fn set_global_locale(id: &str) -> Result<Arc<Locale>, ChronosError> {
    let locale = get_locale(id).ok_or_else(|| ChronosError::UnknownLocale(id.to_string()))?;
    REGISTRY.write().global = locale.abbr.clone();
    Ok(locale)
}

/// The named locale, or the global one when `id` is absent or unknown.
pub(crate) fn resolve_locale(id: Option<&str>) -> Arc<Locale> {
    id.and_then(get_locale).unwrap_or_else(global_locale)
}
