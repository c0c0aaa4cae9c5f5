// Background service worker entry point
// MV3 only delivers wake-up events to listeners registered during the first
// synchronous run of the worker script, so `static/background.js` owns the
// `addListener` calls, buffers events until the module is ready and then
// forwards them to the `on*` methods of the handle returned here.

use js_sys::{Array, Function, Promise};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::future_to_promise;

use crate::background::{Background, InstallDetails};
use crate::chrome::{from_js, to_js, ChromeTabs, Event, Port};
use crate::config::BackgroundConfig;
use crate::message::Message;
use crate::tabs::{Tab, TabChangeInfo, UpdateProperties};

type Shared = Rc<Background<ChromeTabs, Port>>;

/// Initialize the background service worker.
///
/// `config` is an optional object (or JSON string), see [`BackgroundConfig`].
/// Returns the handle the JS glue forwards host events to.
#[wasm_bindgen]
pub fn init_background(config: JsValue) -> BackgroundHandle {
    console_error_panic_hook::set_once();

    let config = BackgroundConfig::from_value(from_js(&config).unwrap_or(Value::Null));
    wasm_logger::init(wasm_logger::Config::new(config.level()));

    let background: Shared = Rc::new(Background::new(ChromeTabs, config));

    log::info!("🚀 Background service initialized");
    BackgroundHandle {
        inner: background,
        port_listener: RefCell::new(None),
    }
}

/// `onMessage` listener attached to the current port.
/// Dropping it detaches the callback from the port before freeing it.
struct PortListener {
    events: Event,
    callback: Closure<dyn FnMut(JsValue)>,
}

impl Drop for PortListener {
    fn drop(&mut self) {
        self.events
            .remove_listener(self.callback.as_ref().unchecked_ref());
    }
}

/// Event sink and tab helpers exposed to JS. Helpers return a `Promise`.
#[wasm_bindgen(js_name = Background)]
pub struct BackgroundHandle {
    inner: Shared,
    port_listener: RefCell<Option<PortListener>>,
}

#[wasm_bindgen(js_class = Background)]
impl BackgroundHandle {
    #[wasm_bindgen(js_name = onInstalled)]
    pub fn on_installed(&self, details: JsValue) {
        let details: InstallDetails = from_js(&details).unwrap_or_default();
        self.inner.on_installed(&details);
    }

    /// Always returns `true`, keeping `sendResponse` valid after the call.
    #[wasm_bindgen(js_name = onMessage)]
    pub fn on_message(&self, message: JsValue, _sender: JsValue, send_response: Function) -> bool {
        let message = from_js(&message)
            .map(Message::from_value)
            .unwrap_or_default();
        self.inner.on_message(&message, |reply| match to_js(&reply) {
            Ok(reply) => {
                let _ = send_response.call1(&JsValue::UNDEFINED, &reply);
            }
            Err(e) => log::warn!("Failed to encode reply: {}", e),
        })
    }

    /// `early_messages` holds whatever arrived on the port while the glue
    /// was still buffering; they are handled before live traffic.
    #[wasm_bindgen(js_name = onConnect)]
    pub fn on_connect(&self, port: Port, early_messages: Option<Array>) {
        log::debug!("Port connected: {}", port.name());
        let events = port.on_message();
        let connection = self.inner.on_connect(port);

        let bg = self.inner.clone();
        let callback = Closure::<dyn FnMut(JsValue)>::new(move |message: JsValue| {
            let message: Value = from_js(&message).unwrap_or(Value::Null);
            bg.on_port_message(connection, &message);
        });
        events.add_listener(callback.as_ref().unchecked_ref());

        // Replacing the slot detaches and frees the superseded port's listener
        self.port_listener
            .replace(Some(PortListener { events, callback }));

        if let Some(early) = early_messages {
            for message in early.iter() {
                let message: Value = from_js(&message).unwrap_or(Value::Null);
                self.inner.on_port_message(connection, &message);
            }
        }
    }

    #[wasm_bindgen(js_name = onUpdated)]
    pub fn on_updated(&self, tab_id: i32, change_info: JsValue, tab: JsValue) {
        let change: TabChangeInfo = from_js(&change_info).unwrap_or_default();
        let tab: Tab = from_js(&tab).unwrap_or_default();
        self.inner.on_updated_tab(tab_id, &change, &tab);
    }

    #[wasm_bindgen(js_name = onCreated)]
    pub fn on_created(&self, tab: JsValue) {
        let tab: Tab = from_js(&tab).unwrap_or_default();
        self.inner.on_created_tab(&tab);
    }

    /// Resolves to the tab's URL, or `""`. Never rejects.
    #[wasm_bindgen(js_name = getURLFromTab)]
    pub fn get_url_from_tab(&self, tab_id: i32) -> Promise {
        let bg = self.inner.clone();
        future_to_promise(async move {
            let url = bg.get_url_from_tab(tab_id).await;
            Ok(JsValue::from_str(&url))
        })
    }

    #[wasm_bindgen(js_name = openNewTab)]
    pub fn open_new_tab(&self, url: String) -> Promise {
        let bg = self.inner.clone();
        future_to_promise(async move {
            let tab = bg.open_new_tab(&url).await?;
            Ok(to_js(&tab)?)
        })
    }

    #[wasm_bindgen(js_name = closeTab)]
    pub fn close_tab(&self, tab: JsValue) -> Promise {
        let bg = self.inner.clone();
        future_to_promise(async move {
            let tab: Tab = from_js(&tab)?;
            bg.close_tab(&tab).await?;
            Ok(JsValue::UNDEFINED)
        })
    }

    #[wasm_bindgen(js_name = updateTab)]
    pub fn update_tab(&self, tab: JsValue, options: JsValue) -> Promise {
        let bg = self.inner.clone();
        future_to_promise(async move {
            let tab: Tab = from_js(&tab)?;
            let options: UpdateProperties = from_js::<Option<UpdateProperties>>(&options)?
                .unwrap_or_default();
            let updated = bg.update_tab(&tab, &options).await?;
            Ok(to_js(&updated)?)
        })
    }

    #[wasm_bindgen(js_name = getTab)]
    pub fn get_tab(&self, tab: JsValue) -> Promise {
        let bg = self.inner.clone();
        future_to_promise(async move {
            let tab: Tab = from_js(&tab)?;
            let fresh = bg.get_tab(&tab).await?;
            Ok(to_js(&fresh)?)
        })
    }

    /// Sends `{ msgType, ...message }` to the tab. Non-object `message`
    /// values contribute no fields, like an object spread would.
    #[wasm_bindgen(js_name = sendMessage)]
    pub fn send_message(&self, tab: JsValue, msg_type: String, message: JsValue) -> Promise {
        let bg = self.inner.clone();
        future_to_promise(async move {
            let tab: Tab = from_js(&tab)?;
            let fields = match from_js::<Value>(&message)? {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            let response = bg.send_message(&tab, &msg_type, fields).await?;
            Ok(to_js(&response)?)
        })
    }
}
