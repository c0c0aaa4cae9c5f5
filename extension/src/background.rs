// Background worker core
// Event handlers plus thin async passthroughs to the host tab API.
// Host-agnostic: the wasm entry point feeds it Chrome events and `ChromeTabs`.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::cell::{Cell, Ref, RefCell};

use crate::config::BackgroundConfig;
use crate::error::{Result, TabError};
use crate::host::TabsApi;
use crate::message::{Message, MsgType};
use crate::tabs::{CreateProperties, Tab, TabChangeInfo, TabId, UpdateProperties};

/// Details passed to `runtime.onInstalled`.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstallDetails {
    #[serde(default)]
    pub reason: Option<String>, // "install", "update", "chrome_update" or "shared_module_update"
    #[serde(default)]
    pub previous_version: Option<String>,
}

/// Listener registrar for the extension's background context.
///
/// Built once by the entry point and shared (via `Rc`) between every
/// registered listener. `P` is the host's port handle; only the most
/// recent connection is kept.
pub struct Background<T, P> {
    tabs: T,
    config: BackgroundConfig,
    port: RefCell<Option<P>>,
    connection: Cell<u64>,
}

impl<T: TabsApi, P> Background<T, P> {
    pub fn new(tabs: T, config: BackgroundConfig) -> Self {
        log::info!("Background worker loaded");
        Self {
            tabs,
            config,
            port: RefCell::new(None),
            connection: Cell::new(0),
        }
    }

    pub fn config(&self) -> &BackgroundConfig {
        &self.config
    }

    pub fn tabs(&self) -> &T {
        &self.tabs
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    pub fn on_installed(&self, details: &InstallDetails) {
        match (&details.reason, &details.previous_version) {
            (Some(reason), Some(prev)) => {
                log::info!("Extension installed ({}, previous version {})", reason, prev)
            }
            (Some(reason), None) => log::info!("Extension installed ({})", reason),
            _ => log::info!("Extension installed"),
        }
    }

    /// Runtime message handler.
    ///
    /// `CHECK_AUTH` is answered with `true` right away. Everything else is
    /// dropped without a reply. Always returns `true`, which tells the host
    /// to keep the reply channel open.
    pub fn on_message<F>(&self, message: &Message, reply: F) -> bool
    where
        F: FnOnce(Value),
    {
        log::debug!("Received message: {:?}", message);

        match message.kind() {
            Some(MsgType::CheckAuth) => reply(Value::Bool(true)),
            Some(other) => log::debug!("Ignoring message type {}", other),
            None => log::debug!("Ignoring message without msgType"),
        }

        true
    }

    /// Remember `port` as the current connection, dropping any previous one.
    /// Returns the connection number to tag messages arriving on this port.
    pub fn on_connect(&self, port: P) -> u64 {
        let connection = self.connection.get() + 1;
        self.connection.set(connection);

        if self.port.replace(Some(port)).is_some() {
            log::debug!("Replacing previous port connection");
        }
        log::info!("Connected (connection #{})", connection);

        connection
    }

    /// Message received over a port. Logged only.
    pub fn on_port_message(&self, connection: u64, message: &Value) {
        if connection != self.connection.get() {
            log::debug!(
                "Message on superseded connection #{}: {}",
                connection,
                message
            );
            return;
        }
        log::info!("Received port message: {}", message);
    }

    pub fn on_created_tab(&self, tab: &Tab) {
        if self.config.log_tab_events {
            log::info!("Created new tab: {:?}", tab.id);
            log::debug!("{:?}", tab);
        }
    }

    pub fn on_updated_tab(&self, tab_id: TabId, change: &TabChangeInfo, _tab: &Tab) {
        if self.config.log_tab_events {
            log::info!("Changed tab {}", tab_id);
            log::debug!("{:?}", change);
        }
    }

    /// The current port, if any component has connected.
    pub fn port(&self) -> Ref<'_, Option<P>> {
        self.port.borrow()
    }

    /// Number of connections seen so far; the latest one owns the port.
    pub fn connection(&self) -> u64 {
        self.connection.get()
    }

    // ------------------------------------------------------------------
    // Tab helpers
    // ------------------------------------------------------------------

    /// URL of the tab, or an empty string when the host reports none.
    /// Never fails; host errors are logged and read as "no URL".
    pub async fn get_url_from_tab(&self, tab_id: TabId) -> String {
        match self.tabs.get(tab_id).await {
            Ok(tab) => tab.url.unwrap_or_default(),
            Err(e) => {
                log::warn!("Failed to read URL of tab {}: {}", tab_id, e);
                String::new()
            }
        }
    }

    pub async fn open_new_tab(&self, url: &str) -> Result<Tab> {
        self.tabs.create(&CreateProperties::url(url)).await
    }

    pub async fn close_tab(&self, tab: &Tab) -> Result<()> {
        self.tabs.remove(tab_id(tab)?).await
    }

    pub async fn update_tab(&self, tab: &Tab, options: &UpdateProperties) -> Result<Tab> {
        self.tabs.update(tab_id(tab)?, options).await
    }

    /// Fresh copy of `tab` from the host.
    pub async fn get_tab(&self, tab: &Tab) -> Result<Tab> {
        self.tabs.get(tab_id(tab)?).await
    }

    /// Send `{ msgType, ...fields }` to the tab and return its response.
    pub async fn send_message(
        &self,
        tab: &Tab,
        msg_type: &str,
        fields: Map<String, Value>,
    ) -> Result<Value> {
        let id = tab_id(tab)?;
        log::debug!("Sending {} to tab {}", MsgType::from(msg_type), id);
        self.tabs
            .send_message(id, Message::outgoing(msg_type, fields))
            .await
    }
}

fn tab_id(tab: &Tab) -> Result<TabId> {
    tab.id.ok_or(TabError::MissingTabId)
}
