// Runtime messages exchanged between extension components
// `{ msgType: "...", ...payload }`, interpreted at the call site

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub const MSG_TYPE_FIELD: &str = "msgType";

/// Message discriminators the background worker knows about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MsgType {
    CheckAuth,
    Other(String),
}

impl MsgType {
    pub fn as_str(&self) -> &str {
        match self {
            MsgType::CheckAuth => "CHECK_AUTH",
            MsgType::Other(s) => s,
        }
    }
}

impl From<&str> for MsgType {
    fn from(s: &str) -> Self {
        match s {
            "CHECK_AUTH" => MsgType::CheckAuth,
            other => MsgType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A runtime message. Anything besides `msgType` stays in `payload` untouched.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Message {
    #[serde(
        rename = "msgType",
        default,
        deserialize_with = "lenient_msg_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub msg_type: Option<String>,

    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Message {
    /// Build the outgoing `{ msgType, ...fields }` object. Fields are applied
    /// after the type, so a `msgType` key in `fields` wins whatever its JSON type.
    pub fn outgoing(msg_type: &str, fields: Map<String, Value>) -> Value {
        let mut map = Map::with_capacity(fields.len() + 1);
        map.insert(MSG_TYPE_FIELD.to_string(), Value::String(msg_type.to_string()));
        map.extend(fields);
        Value::Object(map)
    }

    /// Parse an arbitrary JSON value. Non-objects carry no type and no payload.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => {
                serde_json::from_value(Value::Object(map)).unwrap_or_default()
            }
            _ => Self::default(),
        }
    }

    pub fn kind(&self) -> Option<MsgType> {
        self.msg_type.as_deref().map(MsgType::from)
    }
}

// `msgType` of the wrong JSON type is treated as absent rather than failing the whole message
fn lenient_msg_type<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_check_auth() {
        let msg = Message::from_value(json!({ "msgType": "CHECK_AUTH" }));
        assert_eq!(msg.kind(), Some(MsgType::CheckAuth));
        assert!(msg.payload.is_empty());
    }

    #[test]
    fn test_unknown_type_is_kept_verbatim() {
        let msg = Message::from_value(json!({ "msgType": "OPEN_POPUP", "id": 7 }));
        assert_eq!(msg.kind(), Some(MsgType::Other("OPEN_POPUP".into())));
        assert_eq!(msg.payload.get("id"), Some(&json!(7)));
    }

    #[test]
    fn test_missing_or_malformed_type() {
        assert_eq!(Message::from_value(json!({ "foo": 1 })).kind(), None);
        assert_eq!(Message::from_value(json!({ "msgType": 42 })).kind(), None);
        assert_eq!(Message::from_value(json!("CHECK_AUTH")).kind(), None);
        assert_eq!(Message::from_value(Value::Null).kind(), None);
    }

    #[test]
    fn test_outgoing_merges_fields_after_type() {
        let mut fields = Map::new();
        fields.insert("foo".into(), json!(1));
        assert_eq!(
            Message::outgoing("PING", fields),
            json!({ "msgType": "PING", "foo": 1 })
        );
    }

    #[test]
    fn test_outgoing_field_overrides_type() {
        for (value, expected) in [
            (json!("OVERRIDE"), json!({ "msgType": "OVERRIDE", "foo": 1 })),
            (json!(5), json!({ "msgType": 5, "foo": 1 })),
            (Value::Null, json!({ "msgType": null, "foo": 1 })),
            (json!({ "a": 1 }), json!({ "msgType": { "a": 1 }, "foo": 1 })),
        ] {
            let mut fields = Map::new();
            fields.insert("msgType".into(), value);
            fields.insert("foo".into(), json!(1));
            assert_eq!(Message::outgoing("PING", fields), expected);
        }
    }
}
