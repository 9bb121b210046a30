//! The host framework's side of a translation lookup.

use crate::{
    parser,
    table::{Overlay, TranslationTable},
    traits::Params,
};
use std::collections::HashMap;

/// What the host exposes to a miss handler.
pub trait TranslateContext: Send + Sync {
    /// Language currently in use, if one was activated.
    fn current_lang(&self) -> Option<&str>;

    /// Language to fall back to when none is active.
    fn default_lang(&self) -> Option<&str>;

    /// Canonical table for `lang`, if loaded.
    fn translations(&self, lang: &str) -> Option<&TranslationTable>;

    /// Render `key` against `table`, applying `params`.
    fn parsed_result(&self, table: &Overlay<'_>, key: &str, params: Option<&Params>) -> String;
}

/// One unresolved lookup, as handed to a miss handler.
pub struct MissingTranslationParams<'a> {
    pub key: &'a str,
    pub interpolate_params: Option<&'a Params>,
    pub context: &'a dyn TranslateContext,
}

impl<'a> MissingTranslationParams<'a> {
    pub fn new(
        key: &'a str,
        interpolate_params: Option<&'a Params>,
        context: &'a dyn TranslateContext,
    ) -> Self {
        Self {
            key,
            interpolate_params,
            context,
        }
    }

    /// Current language, else default language.
    pub fn active_lang(&self) -> Option<&'a str> {
        self.context
            .current_lang()
            .or_else(|| self.context.default_lang())
    }
}

/// Minimal in-memory host store with ngx-style interpolation.
#[derive(Debug, Clone, Default)]
pub struct TranslateStore {
    current_lang: Option<String>,
    default_lang: Option<String>,
    translations: HashMap<String, TranslationTable>,
}

impl TranslateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_lang(mut self, lang: impl Into<String>) -> Self {
        self.default_lang = Some(lang.into());
        self
    }

    pub fn use_lang(&mut self, lang: impl Into<String>) {
        self.current_lang = Some(lang.into());
    }

    /// Install a freshly fetched table, replacing any previous one.
    pub fn set_translation(&mut self, lang: impl Into<String>, table: TranslationTable) {
        self.translations.insert(lang.into(), table);
    }

    /// Look `key` up in the active language and interpolate it.
    pub fn instant(&self, key: &str, params: Option<&Params>) -> Option<String> {
        let lang = self.current_lang.as_deref().or(self.default_lang.as_deref())?;
        let template = self.translations.get(lang)?.get(key)?;
        Some(parser::interpolate(template, params))
    }
}

impl TranslateContext for TranslateStore {
    fn current_lang(&self) -> Option<&str> {
        self.current_lang.as_deref()
    }

    fn default_lang(&self) -> Option<&str> {
        self.default_lang.as_deref()
    }

    fn translations(&self, lang: &str) -> Option<&TranslationTable> {
        self.translations.get(lang)
    }

    fn parsed_result(&self, table: &Overlay<'_>, key: &str, params: Option<&Params>) -> String {
        match table.get(key) {
            Some(template) => parser::interpolate(template, params),
            None => key.to_string(),
        }
    }
}
