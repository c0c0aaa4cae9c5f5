// Seam between the background logic and the browser's tab API
// Chrome implementation lives in `chrome.rs`; tests use an in-memory fake

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::tabs::{CreateProperties, Tab, TabId, UpdateProperties};

/// The subset of `chrome.tabs` the background worker proxies to.
///
/// Futures are `!Send`: everything runs on the extension's single event loop.
#[async_trait(?Send)]
pub trait TabsApi {
    async fn get(&self, tab_id: TabId) -> Result<Tab>;

    async fn create(&self, properties: &CreateProperties) -> Result<Tab>;

    async fn remove(&self, tab_id: TabId) -> Result<()>;

    async fn update(&self, tab_id: TabId, properties: &UpdateProperties) -> Result<Tab>;

    /// Deliver `message` to the tab's content scripts and wait for the reply.
    /// A tab that answers nothing resolves to `Value::Null`.
    async fn send_message(&self, tab_id: TabId, message: Value) -> Result<Value>;
}
