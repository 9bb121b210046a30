use crate::{error::BablicError, table::TranslationTable};
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::{Map, Value};

/// Interpolation parameters passed along with a translation lookup.
pub type Params = Map<String, Value>;

/// HTTP capability. The only way the adapter talks to the network.
///
/// Both calls speak JSON. A successful `post_json` with an empty body
/// resolves to `Value::Null`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET `url` and decode the body as JSON.
    async fn get_json(&self, url: &str) -> Result<Value, BablicError>;

    /// POST `body` as JSON to `url` and decode the (optional) JSON reply.
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, BablicError>;
}

/// Live editor overlay. Its presence means translations are authored
/// in place and must not be fetched or reported.
pub trait EditorHook: Send + Sync {
    /// Wrap a rendered fallback so the editor can tag it.
    fn preprocess_i18n_item(&self, key: &str, rendered: &str) -> String;
}

/// Host-side loader interface, called once per language activation.
pub trait TranslateLoader: Send + Sync {
    /// Produce exactly one table for `lang`, then complete.
    fn get_translation(&self, lang: &str)
        -> BoxStream<'static, Result<TranslationTable, BablicError>>;
}

/// Host-side miss interceptor, called once per unresolved key.
pub trait MissingTranslationHandler: Send + Sync {
    /// Return the value to display for the missing key. Must not block.
    fn handle(&self, params: &crate::context::MissingTranslationParams<'_>) -> String;
}
