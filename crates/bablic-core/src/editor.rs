//! Editor-mode detection.

use crate::{error::BablicError, traits::EditorHook};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

/// Probe for the editor overlay. `Ok(None)` means not in the editor.
pub type EditorDetector =
    Arc<dyn Fn() -> Result<Option<Arc<dyn EditorHook>>, BablicError> + Send + Sync>;

/// Detector for contexts that never host the editor.
pub fn no_editor() -> EditorDetector {
    Arc::new(|| Ok(None))
}

/// Detector that always reports the given hook.
pub fn fixed_editor(hook: Arc<dyn EditorHook>) -> EditorDetector {
    Arc::new(move || Ok(Some(Arc::clone(&hook))))
}

/// Run `detector` once. Errors and panics both count as "not in editor".
pub fn detect(detector: &EditorDetector) -> Option<Arc<dyn EditorHook>> {
    match panic::catch_unwind(AssertUnwindSafe(|| detector())) {
        Ok(Ok(hook)) => hook,
        Ok(Err(e)) => {
            warn!("editor: detection failed, assuming not in editor: {e}");
            None
        }
        Err(_) => {
            warn!("editor: detector panicked, assuming not in editor");
            None
        }
    }
}
