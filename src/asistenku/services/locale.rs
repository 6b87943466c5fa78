// src/asistenku/services/locale.rs
use crate::storage::keys::LOCALE;
use crate::storage::KeyValueStore;
use candid::CandidType;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy, Default)]
pub enum Locale {
    #[default]
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "en")]
    En,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Id => "id",
            Locale::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "id" => Some(Locale::Id),
            "en" => Some(Locale::En),
            _ => None,
        }
    }
}

/// Persisted locale choice.
pub struct LocaleStore {
    local: Rc<dyn KeyValueStore>,
    fallback: Locale,
}

impl LocaleStore {
    pub fn new(local: Rc<dyn KeyValueStore>, fallback: Locale) -> Self {
        Self { local, fallback }
    }

    /// Stored locale; unknown stored codes fall back to the default.
    pub fn current(&self) -> Locale {
        self.local
            .get(LOCALE)
            .and_then(|code| Locale::from_code(&code))
            .unwrap_or(self.fallback)
    }

    pub fn set(&self, locale: Locale) {
        self.local.set(LOCALE, locale.code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn locale_persists_and_falls_back() {
        let store = Rc::new(MemoryStore::new());
        let locales = LocaleStore::new(store.clone(), Locale::Id);
        assert_eq!(locales.current(), Locale::Id);
        locales.set(Locale::En);
        assert_eq!(store.get(LOCALE).as_deref(), Some("en"));
        assert_eq!(locales.current(), Locale::En);
        store.set(LOCALE, "fr");
        assert_eq!(locales.current(), Locale::Id);
    }
}
