// Errors surfaced by the tab helpers
// Become rejected promises at the JS boundary

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failure reported by a tab helper.
#[derive(Debug, Error)]
pub enum TabError {
    /// The tab object carried no `id` (devtools windows, some special pages).
    #[error("tab has no id")]
    MissingTabId,

    /// The host rejected the call (closed tab, missing permission, no receiver...).
    #[error("host error: {0}")]
    Host(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<TabError> for JsValue {
    fn from(err: TabError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T, E = TabError> = std::result::Result<T, E>;
