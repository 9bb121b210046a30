//! Missing-key reporter.
//!
//! Every miss renders immediately as the key itself. Outside the editor the
//! miss is also queued, and the queue is posted to the service once no new
//! miss has arrived for a full quiet period. A failed post puts its entries
//! back in front of the queue; they go out with the next flush, which only
//! happens after another miss re-arms the timer.


use crate::{endpoints, timer::Debouncer};
use bablic_core::{
    config::Config,
    context::MissingTranslationParams,
    error::BablicError,
    storage::{self, LocalStorage},
    table::Overlay,
    traits::{EditorHook, HttpClient, MissingTranslationHandler, Params},
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

/// Supplies the page location sent along with each report.
pub type PageLocation = Arc<dyn Fn() -> String + Send + Sync>;

/// One unresolved lookup, as sent to the report endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingEntry {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
}

/// Result of a successful flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushOutcome {
    /// Entries delivered.
    pub sent: usize,
    /// The service applied an update and a new revision was stored.
    pub updated: bool,
}

#[derive(Debug, Default, Deserialize)]
struct ReportResponse {
    #[serde(default)]
    updated: bool,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Inner {
    http: Arc<dyn HttpClient>,
    config: Arc<Config>,
    storage: Arc<dyn LocalStorage>,
    location: PageLocation,
    batch: Mutex<Vec<MissingEntry>>,
    lang: Mutex<Option<String>>,
    timer: Debouncer,
}

impl Inner {
    /// Cut the live batch, leaving an empty one in its place.
    fn detach(&self) -> Vec<MissingEntry> {
        std::mem::take(&mut *lock(&self.batch))
    }

    /// Put a failed batch back ahead of whatever arrived meanwhile.
    fn restore(&self, mut failed: Vec<MissingEntry>) {
        let mut live = lock(&self.batch);
        failed.append(&mut live);
        *live = failed;
    }

    async fn send(&self, batch: Vec<MissingEntry>) -> Result<FlushOutcome, BablicError> {
        if batch.is_empty() {
            debug!("reporter: nothing to flush");
            return Ok(FlushOutcome::default());
        }

        let lang = lock(&self.lang).clone().unwrap_or_default();
        let url = endpoints::report_url(&self.config, &lang, &(self.location)());
        let body = match serde_json::to_value(&batch) {
            Ok(body) => body,
            Err(e) => {
                self.restore(batch);
                return Err(e.into());
            }
        };

        debug!("reporter: POST {url} ({} entries)", batch.len());
        let reply = match self.http.post_json(&url, &body).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("reporter: failed to report {} missing keys: {e}", batch.len());
                self.restore(batch);
                return Err(e);
            }
        };

        let response: ReportResponse = serde_json::from_value(reply).unwrap_or_default();
        if response.updated {
            let revision = chrono::Utc::now().timestamp_millis().to_string();
            match storage::store_revision(self.storage.as_ref(), &revision) {
                Ok(()) => info!("reporter: translations updated, revision {revision}"),
                Err(e) => warn!("reporter: failed to store revision: {e}"),
            }
        }

        Ok(FlushOutcome {
            sent: batch.len(),
            updated: response.updated,
        })
    }

    /// Timer callback: cut the batch now, post it on its own task.
    fn fire(self: Arc<Self>) {
        let batch = self.detach();
        tokio::spawn(async move {
            // Errors are logged and the batch restored inside `send`.
            let _ = self.send(batch).await;
        });
    }
}

/// Fallback renderer and batching reporter for lookup misses.
pub struct BablicMissingTranslationHandler {
    inner: Arc<Inner>,
    editor: Option<Arc<dyn EditorHook>>,
}

impl BablicMissingTranslationHandler {
    /// Must be called from within a tokio runtime; the flush timer runs on it.
    pub fn new(
        http: Arc<dyn HttpClient>,
        config: Arc<Config>,
        storage: Arc<dyn LocalStorage>,
        location: PageLocation,
        editor: Option<Arc<dyn EditorHook>>,
    ) -> Result<Self, BablicError> {
        let runtime = Handle::try_current()
            .map_err(|e| BablicError::Runtime(format!("missing handler needs tokio: {e}")))?;
        let timer = Debouncer::new(config.reporter.quiet_period(), runtime);
        Ok(Self {
            inner: Arc::new(Inner {
                http,
                config,
                storage,
                location,
                batch: Mutex::new(Vec::new()),
                lang: Mutex::new(None),
                timer,
            }),
            editor,
        })
    }

    pub fn in_editor(&self) -> bool {
        self.editor.is_some()
    }

    /// Snapshot of entries waiting for the next flush.
    pub fn pending(&self) -> Vec<MissingEntry> {
        lock(&self.inner.batch).clone()
    }

    /// Language the next report will be filed under.
    pub fn last_lang(&self) -> Option<String> {
        lock(&self.inner.lang).clone()
    }

    /// Flush immediately instead of waiting for the quiet period.
    ///
    /// On failure the entries are back in the pending batch and the error
    /// is returned.
    pub async fn flush(&self) -> Result<FlushOutcome, BablicError> {
        self.inner.timer.cancel();
        let batch = self.inner.detach();
        self.inner.send(batch).await
    }

    fn add_missing(&self, key: &str, params: Option<Params>) {
        let pending = {
            let mut batch = lock(&self.inner.batch);
            batch.push(MissingEntry {
                key: key.to_string(),
                params,
            });
            batch.len()
        };
        debug!("reporter: queued {key} ({pending} pending)");

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        self.inner.timer.arm(move || {
            if let Some(inner) = weak.upgrade() {
                inner.fire();
            }
        });
    }
}

impl MissingTranslationHandler for BablicMissingTranslationHandler {
    fn handle(&self, params: &MissingTranslationParams<'_>) -> String {
        let lang = params.active_lang();
        if let Some(lang) = lang {
            *lock(&self.inner.lang) = Some(lang.to_string());
        }

        let base = lang.and_then(|l| params.context.translations(l));
        let overlay = Overlay::new(base, params.key, params.key);
        let parsed = params
            .context
            .parsed_result(&overlay, params.key, params.interpolate_params);

        if let Some(editor) = &self.editor {
            return editor.preprocess_i18n_item(params.key, &parsed);
        }

        self.add_missing(params.key, params.interpolate_params.cloned());
        parsed
    }
}
