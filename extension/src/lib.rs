// Background service worker for the browser extension
// Compiled to wasm32; the core (`background`) also builds natively for tests

mod background;
pub mod config;
pub mod error;
pub mod host;
pub mod message;
pub mod tabs;

#[cfg(target_arch = "wasm32")]
mod chrome;
#[cfg(target_arch = "wasm32")]
mod entry;

pub use background::{Background, InstallDetails};
pub use config::BackgroundConfig;
pub use error::TabError;
pub use host::TabsApi;
pub use message::{Message, MsgType};
pub use tabs::{CreateProperties, Tab, TabChangeInfo, TabId, UpdateProperties};

#[cfg(target_arch = "wasm32")]
pub use chrome::{ChromeTabs, Port};
#[cfg(target_arch = "wasm32")]
pub use entry::{init_background, BackgroundHandle};
