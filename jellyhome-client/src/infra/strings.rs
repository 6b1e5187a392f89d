//! Localized display strings

use std::fmt::Debug;

/// Fixed keys the home screen needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringKey {
    ContinueWatching,
    NextUp,
}

/// Resolves string keys to display text
pub trait StringResource: Send + Sync + Debug {
    fn resolve(&self, key: StringKey) -> String;
}

/// Translations compiled into the binary, keyed by primary language subtag
#[derive(Debug, Clone)]
pub struct BundledStrings {
    language: &'static str,
}

const TABLE: &[(&str, &str, &str)] = &[
    ("en", "Continue Watching", "Next Up"),
    ("de", "Weiterschauen", "Als Nächstes"),
    ("fr", "Reprendre", "À suivre"),
    ("es", "Seguir viendo", "A continuación"),
    ("nl", "Verder kijken", "Volgende"),
];

impl BundledStrings {
    /// Pick the table for `locale` ("de-AT", "fr_FR", ...), English when the
    /// language is not bundled.
    pub fn for_locale(locale: &str) -> Self {
        let primary = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let language = TABLE
            .iter()
            .map(|(lang, _, _)| *lang)
            .find(|lang| *lang == primary)
            .unwrap_or("en");
        Self { language }
    }

    pub fn language(&self) -> &'static str {
        self.language
    }
}

impl Default for BundledStrings {
    fn default() -> Self {
        Self { language: "en" }
    }
}

impl StringResource for BundledStrings {
    fn resolve(&self, key: StringKey) -> String {
        let (_, continue_watching, next_up) = TABLE
            .iter()
            .find(|(lang, _, _)| *lang == self.language)
            .copied()
            .unwrap_or(TABLE[0]);
        match key {
            StringKey::ContinueWatching => continue_watching.to_string(),
            StringKey::NextUp => next_up.to_string(),
        }
    }
}
