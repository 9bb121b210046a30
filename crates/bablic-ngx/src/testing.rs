//! Test doubles shared by the loader and reporter tests.

use async_trait::async_trait;
use bablic_core::{
    error::BablicError,
    traits::{EditorHook, HttpClient},
};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Records every call; responses and failures are switchable mid-test.
#[derive(Default)]
pub(crate) struct MockHttp {
    gets: Mutex<Vec<String>>,
    posts: Mutex<Vec<(String, Value)>>,
    get_response: Mutex<Value>,
    post_response: Mutex<Value>,
    fail_gets: AtomicBool,
    fail_posts: AtomicBool,
    /// When set, `post_json` waits for a notification before answering.
    gate: Mutex<Option<Arc<Notify>>>,
}

impl MockHttp {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn with_get_response(self: Arc<Self>, value: Value) -> Arc<Self> {
        *self.get_response.lock().unwrap() = value;
        self
    }

    pub(crate) fn set_post_response(&self, value: Value) {
        *self.post_response.lock().unwrap() = value;
    }

    pub(crate) fn set_fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn set_fail_posts(&self, fail: bool) {
        self.fail_posts.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn set_gate(&self, gate: Option<Arc<Notify>>) {
        *self.gate.lock().unwrap() = gate;
    }

    pub(crate) fn gets(&self) -> Vec<String> {
        self.gets.lock().unwrap().clone()
    }

    /// Every POST attempt, failed ones included.
    pub(crate) fn posts(&self) -> Vec<(String, Value)> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for MockHttp {
    async fn get_json(&self, url: &str) -> Result<Value, BablicError> {
        self.gets.lock().unwrap().push(url.to_string());
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(BablicError::Status {
                status: 503,
                body: "unavailable".into(),
            });
        }
        Ok(self.get_response.lock().unwrap().clone())
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, BablicError> {
        self.posts
            .lock()
            .unwrap()
            .push((url.to_string(), body.clone()));
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_posts.load(Ordering::SeqCst) {
            return Err(BablicError::Http("connection reset".into()));
        }
        Ok(self.post_response.lock().unwrap().clone())
    }
}

/// Editor overlay that wraps values in a visible marker.
pub(crate) struct TaggingEditor;

impl EditorHook for TaggingEditor {
    fn preprocess_i18n_item(&self, key: &str, rendered: &str) -> String {
        format!("<bablic key=\"{key}\">{rendered}</bablic>")
    }
}
