// Tab shapes as the host reports them
// Host-owned; nothing here is cached

use serde::{Deserialize, Serialize};

pub type TabId = i32;

/// A browser tab. Every field is optional because the host withholds
/// `url`/`title` without the `tabs` permission and `id` for some special tabs.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TabId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub highlighted: bool,
    #[serde(default)]
    pub incognito: bool,
}

impl Tab {
    pub fn with_id(id: TabId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

/// Partial change record delivered with `tabs.onUpdated`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabChangeInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
}

/// Options for `tabs.create`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id: Option<i32>,
}

impl CreateProperties {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }
}

/// Options for `tabs.update`. Unset fields are left alone by the host.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_discardable: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tab_from_host_object() {
        let tab: Tab = serde_json::from_value(json!({
            "id": 12,
            "windowId": 1,
            "index": 0,
            "url": "https://example.com/",
            "active": true,
            "discarded": false,
            "groupId": -1
        }))
        .unwrap();

        assert_eq!(tab.id, Some(12));
        assert_eq!(tab.window_id, Some(1));
        assert_eq!(tab.url.as_deref(), Some("https://example.com/"));
        assert!(tab.active);
        assert!(!tab.pinned);
    }

    #[test]
    fn test_tab_without_url() {
        let tab: Tab = serde_json::from_value(json!({ "id": 3 })).unwrap();
        assert_eq!(tab.url, None);
    }

    #[test]
    fn test_update_properties_omit_unset_fields() {
        let props = UpdateProperties {
            active: Some(true),
            auto_discardable: Some(false),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&props).unwrap(),
            json!({ "active": true, "autoDiscardable": false })
        );
    }

    #[test]
    fn test_create_properties_url() {
        assert_eq!(
            serde_json::to_value(CreateProperties::url("about:blank")).unwrap(),
            json!({ "url": "about:blank" })
        );
    }
}
