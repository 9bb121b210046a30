//! Translation fetcher.

use crate::endpoints;
use bablic_core::{
    config::Config,
    error::BablicError,
    storage::{self, LocalStorage},
    table::TranslationTable,
    traits::{EditorHook, HttpClient, TranslateLoader},
};
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;
use tracing::debug;

/// Loads one language's table from the Bablic CDN.
///
/// In the editor the network is skipped and an empty table is produced,
/// since the overlay supplies translations live.
#[derive(Clone)]
pub struct BablicTranslateLoader {
    http: Arc<dyn HttpClient>,
    config: Arc<Config>,
    storage: Arc<dyn LocalStorage>,
    editor: Option<Arc<dyn EditorHook>>,
}

impl BablicTranslateLoader {
    pub fn new(
        http: Arc<dyn HttpClient>,
        config: Arc<Config>,
        storage: Arc<dyn LocalStorage>,
        editor: Option<Arc<dyn EditorHook>>,
    ) -> Self {
        Self {
            http,
            config,
            storage,
            editor,
        }
    }

    pub fn in_editor(&self) -> bool {
        self.editor.is_some()
    }

    /// Fetch URL for `lang`, carrying the stored revision when there is one.
    pub fn translation_url(&self, lang: &str) -> String {
        let revision = storage::load_revision(self.storage.as_ref());
        endpoints::translation_url(&self.config, lang, revision.as_deref())
    }

    /// Fetch and normalize the table for `lang`. Errors are not retried.
    pub async fn fetch(&self, lang: &str) -> Result<TranslationTable, BablicError> {
        if self.in_editor() {
            debug!("loader: in editor, serving empty table for {lang}");
            return Ok(TranslationTable::new());
        }
        let url = self.translation_url(lang);
        debug!("loader: GET {url}");
        let raw = self.http.get_json(&url).await?;
        let table = TranslationTable::from_response(&raw)?;
        debug!("loader: {lang} has {} entries", table.len());
        Ok(table)
    }
}

impl TranslateLoader for BablicTranslateLoader {
    fn get_translation(
        &self,
        lang: &str,
    ) -> BoxStream<'static, Result<TranslationTable, BablicError>> {
        let this = self.clone();
        let lang = lang.to_string();
        stream::once(async move { this.fetch(&lang).await }).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockHttp, TaggingEditor};
    use bablic_core::storage::{MemoryStorage, REVISION_KEY};
    use serde_json::json;

    fn loader(
        http: Arc<MockHttp>,
        storage: Arc<MemoryStorage>,
        editor: bool,
    ) -> BablicTranslateLoader {
        let editor: Option<Arc<dyn EditorHook>> = if editor {
            Some(Arc::new(TaggingEditor))
        } else {
            None
        };
        BablicTranslateLoader::new(
            http,
            Arc::new(Config::for_site("abc", false)),
            storage,
            editor,
        )
    }

    #[tokio::test]
    async fn test_editor_mode_emits_empty_table_without_network() {
        let http = MockHttp::new().with_get_response(json!({"a": "A"}));
        let l = loader(Arc::clone(&http), Arc::new(MemoryStorage::new()), true);

        let items: Vec<_> = l.get_translation("fr").collect().await;
        assert_eq!(items.len(), 1);
        assert!(items[0].as_ref().unwrap().is_empty());
        assert!(http.gets().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_emits_one_normalized_table() {
        let http = MockHttp::new().with_get_response(json!({
            "hello": "Bonjour",
            "_empties": ["OK"]
        }));
        let l = loader(Arc::clone(&http), Arc::new(MemoryStorage::new()), false);

        let items: Vec<_> = l.get_translation("fr").collect().await;
        assert_eq!(items.len(), 1);
        let table = items[0].as_ref().unwrap();
        assert_eq!(table.get("hello"), Some("Bonjour"));
        assert_eq!(table.get("OK"), Some("OK"));
        assert!(!table.contains_key("_empties"));
        assert_eq!(http.gets(), vec!["https://c.bablic.com/sites/abc/ngx.fr.json"]);
    }

    #[tokio::test]
    async fn test_fetch_uses_stored_revision() {
        let http = MockHttp::new().with_get_response(json!({}));
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(REVISION_KEY, "1700000000000").unwrap();
        let l = loader(Arc::clone(&http), storage, false);

        l.fetch("de").await.unwrap();
        assert_eq!(
            http.gets(),
            vec!["https://c.bablic.com/sites/abc/ngx.de.json?r=1700000000000"]
        );
    }

    #[tokio::test]
    async fn test_fetch_error_propagates_without_retry() {
        let http = MockHttp::new();
        http.set_fail_gets(true);
        let l = loader(Arc::clone(&http), Arc::new(MemoryStorage::new()), false);

        let items: Vec<_> = l.get_translation("fr").collect().await;
        assert_eq!(items.len(), 1);
        assert!(matches!(
            items[0],
            Err(BablicError::Status { status: 503, .. })
        ));
        assert_eq!(http.gets().len(), 1);
    }

    #[tokio::test]
    async fn test_stream_is_lazy() {
        let http = MockHttp::new().with_get_response(json!({}));
        let l = loader(Arc::clone(&http), Arc::new(MemoryStorage::new()), false);

        let stream = l.get_translation("fr");
        assert!(http.gets().is_empty());
        drop(stream);
        assert!(http.gets().is_empty());
    }
}
