// Chrome extension API bindings (Manifest V3, promise-returning)
// JS values cross the boundary as JSON: JSON.stringify -> serde_json and back

use async_trait::async_trait;
use js_sys::{Function, Promise, JSON};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::error::{Result, TabError};
use crate::host::TabsApi;
use crate::tabs::{CreateProperties, Tab, TabId, UpdateProperties};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = get)]
    fn tabs_get(tab_id: i32) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = create)]
    fn tabs_create(properties: JsValue) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = remove)]
    fn tabs_remove(tab_id: i32) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = update)]
    fn tabs_update(tab_id: i32, properties: JsValue) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = sendMessage)]
    fn tabs_send_message(tab_id: i32, message: JsValue) -> std::result::Result<Promise, JsValue>;
}

#[wasm_bindgen]
extern "C" {
    /// `chrome.events.Event`
    pub type Event;

    #[wasm_bindgen(method, js_name = addListener)]
    pub fn add_listener(this: &Event, callback: &Function);

    #[wasm_bindgen(method, js_name = removeListener)]
    pub fn remove_listener(this: &Event, callback: &Function);
}

#[wasm_bindgen]
extern "C" {
    /// `chrome.runtime.Port`
    #[derive(Debug, Clone)]
    pub type Port;

    #[wasm_bindgen(method, getter)]
    pub fn name(this: &Port) -> String;

    #[wasm_bindgen(method, getter, js_name = onMessage)]
    pub fn on_message(this: &Port) -> Event;
}

/// `chrome.tabs` as a [`TabsApi`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ChromeTabs;

#[async_trait(?Send)]
impl TabsApi for ChromeTabs {
    async fn get(&self, tab_id: TabId) -> Result<Tab> {
        from_js(&call(tabs_get(tab_id)).await?)
    }

    async fn create(&self, properties: &CreateProperties) -> Result<Tab> {
        from_js(&call(tabs_create(to_js(properties)?)).await?)
    }

    async fn remove(&self, tab_id: TabId) -> Result<()> {
        call(tabs_remove(tab_id)).await?;
        Ok(())
    }

    async fn update(&self, tab_id: TabId, properties: &UpdateProperties) -> Result<Tab> {
        from_js(&call(tabs_update(tab_id, to_js(properties)?)).await?)
    }

    async fn send_message(&self, tab_id: TabId, message: Value) -> Result<Value> {
        from_js(&call(tabs_send_message(tab_id, to_js(&message)?)).await?)
    }
}

async fn call(promise: std::result::Result<Promise, JsValue>) -> Result<JsValue> {
    let promise = promise.map_err(host_error)?;
    JsFuture::from(promise).await.map_err(host_error)
}

pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue> {
    let text = serde_json::to_string(value)?;
    JSON::parse(&text).map_err(host_error)
}

/// `undefined` (and anything JSON can't represent) reads as `null`.
pub fn from_js<T: DeserializeOwned>(value: &JsValue) -> Result<T> {
    let text = if value.is_undefined() {
        None
    } else {
        JSON::stringify(value).map_err(host_error)?.as_string()
    };
    let text = text.unwrap_or_else(|| "null".to_string());
    Ok(serde_json::from_str(&text)?)
}

fn host_error(err: JsValue) -> TabError {
    if let Some(e) = err.dyn_ref::<js_sys::Error>() {
        return TabError::Host(String::from(e.message()));
    }
    match err.as_string() {
        Some(s) => TabError::Host(s),
        None => TabError::Host(format!("{:?}", err)),
    }
}
