//! Wiring for host integrations: one setup, two factories.

use crate::{
    loader::BablicTranslateLoader,
    reporter::{BablicMissingTranslationHandler, PageLocation},
};
use bablic_core::{
    config::Config,
    editor::{self, EditorDetector},
    error::BablicError,
    storage::{LocalStorage, MemoryStorage},
    traits::{EditorHook, HttpClient},
};
use std::sync::Arc;

/// Configured adapter, ready to build loaders and miss handlers.
#[derive(Clone)]
pub struct NgxSetup {
    config: Arc<Config>,
    storage: Arc<dyn LocalStorage>,
    detector: EditorDetector,
    location: PageLocation,
}

/// Setup for `site_id` with in-memory storage and no editor.
pub fn bablic_ngx(site_id: &str, is_debug: bool) -> Result<NgxSetup, BablicError> {
    NgxSetup::from_config(Config::for_site(site_id, is_debug))
}

impl NgxSetup {
    pub fn from_config(config: Config) -> Result<Self, BablicError> {
        config.validate()?;
        let page_url = config.reporter.page_url.clone();
        Ok(Self {
            config: Arc::new(config),
            storage: Arc::new(MemoryStorage::new()),
            detector: editor::no_editor(),
            location: Arc::new(move || page_url.clone()),
        })
    }

    pub fn with_storage(mut self, storage: Arc<dyn LocalStorage>) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_editor_detector(mut self, detector: EditorDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_location(mut self, location: PageLocation) -> Self {
        self.location = location;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn editor(&self) -> Option<Arc<dyn EditorHook>> {
        editor::detect(&self.detector)
    }

    /// Loader factory.
    pub fn loader(&self, http: Arc<dyn HttpClient>) -> BablicTranslateLoader {
        BablicTranslateLoader::new(
            http,
            Arc::clone(&self.config),
            Arc::clone(&self.storage),
            self.editor(),
        )
    }

    /// Miss-handler factory. Needs a running tokio runtime.
    pub fn missing_translation_handler(
        &self,
        http: Arc<dyn HttpClient>,
    ) -> Result<BablicMissingTranslationHandler, BablicError> {
        BablicMissingTranslationHandler::new(
            http,
            Arc::clone(&self.config),
            Arc::clone(&self.storage),
            Arc::clone(&self.location),
            self.editor(),
        )
    }
}
