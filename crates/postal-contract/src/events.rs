//! # Request and Outcome Payloads
//!
//! Wire shapes exchanged with the host: a signed action request carrying
//! typed data entries, and the outcome handed back after execution.
//!
//! Requests arrive the way the form-based UI builds them:
//!
//! ```json
//! {
//!   "sender": "3N...rostov...",
//!   "timestamp": 1792238400000,
//!   "params": [
//!     {"key": "action", "type": "string", "value": "createShipment"},
//!     {"key": "weight", "type": "string", "value": "2.5"}
//!   ]
//! }
//! ```
//!
//! A top-level `"action"` field is accepted as well.

use crate::domain::{Address, LedgerError, Shipment, User};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Data entry key naming the action.
pub const ACTION_KEY: &str = "action";

/// Typed value of a data entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamValue {
    /// `"type": "string"`.
    String(String),
    /// `"type": "integer"`.
    Integer(i64),
    /// `"type": "boolean"`.
    Boolean(bool),
}

impl ParamValue {
    /// Wire type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Boolean(_) => "boolean",
        }
    }
}

/// One named parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDataEntry", into = "RawDataEntry")]
pub struct DataEntry {
    /// Parameter name.
    pub key: String,
    /// Parameter value.
    pub value: ParamValue,
}

impl DataEntry {
    /// String entry.
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: ParamValue::String(value.into()),
        }
    }

    /// Integer entry.
    pub fn integer(key: impl Into<String>, value: i64) -> Self {
        Self {
            key: key.into(),
            value: ParamValue::Integer(value),
        }
    }

    /// Boolean entry.
    pub fn boolean(key: impl Into<String>, value: bool) -> Self {
        Self {
            key: key.into(),
            value: ParamValue::Boolean(value),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawDataEntry {
    key: String,
    #[serde(rename = "type")]
    kind: String,
    value: Value,
}

impl TryFrom<RawDataEntry> for DataEntry {
    type Error = String;

    fn try_from(raw: RawDataEntry) -> Result<Self, Self::Error> {
        let value = match (raw.kind.as_str(), raw.value) {
            ("string", Value::String(s)) => ParamValue::String(s),
            ("integer", Value::Number(n)) => ParamValue::Integer(
                n.as_i64()
                    .ok_or_else(|| format!("entry {}: {n} is not an integer", raw.key))?,
            ),
            ("boolean", Value::Bool(b)) => ParamValue::Boolean(b),
            (kind, value) => {
                return Err(format!(
                    "entry {}: value {value} does not match type {kind}",
                    raw.key
                ))
            }
        };
        Ok(Self {
            key: raw.key,
            value,
        })
    }
}

impl From<DataEntry> for RawDataEntry {
    fn from(entry: DataEntry) -> Self {
        let kind = entry.value.type_name().to_string();
        let value = match entry.value {
            ParamValue::String(s) => Value::String(s),
            ParamValue::Integer(i) => Value::from(i),
            ParamValue::Boolean(b) => Value::Bool(b),
        };
        Self {
            key: entry.key,
            kind,
            value,
        }
    }
}

/// A signed request, sender already verified by the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawActionRequest")]
pub struct ActionRequest {
    /// Verified caller identity.
    pub sender: Address,
    /// Block time in unix milliseconds.
    pub timestamp: u64,
    /// Action name.
    pub action: String,
    /// Action parameters, without the `action` entry.
    pub params: Vec<DataEntry>,
}

impl ActionRequest {
    /// Build a request.
    pub fn new(
        sender: impl Into<Address>,
        timestamp: u64,
        action: impl Into<String>,
        params: Vec<DataEntry>,
    ) -> Self {
        Self {
            sender: sender.into(),
            timestamp,
            action: action.into(),
            params,
        }
    }

    /// Build a request whose action name travels as the `action` entry.
    pub fn from_data_entries(
        sender: impl Into<Address>,
        timestamp: u64,
        mut entries: Vec<DataEntry>,
    ) -> Result<Self, LedgerError> {
        let position = entries
            .iter()
            .position(|e| e.key == ACTION_KEY)
            .ok_or_else(|| LedgerError::invalid("missing parameter action"))?;
        let action = match entries.remove(position).value {
            ParamValue::String(name) => name,
            other => {
                return Err(LedgerError::invalid(format!(
                    "parameter action must be a string, got {}",
                    other.type_name()
                )))
            }
        };
        Ok(Self::new(sender, timestamp, action, entries))
    }

    /// Block time in unix seconds.
    pub fn now_secs(&self) -> u64 {
        self.timestamp / 1_000
    }

    /// Look up a parameter by name.
    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.params.iter().find(|e| e.key == key).map(|e| &e.value)
    }
}

#[derive(Deserialize)]
struct RawActionRequest {
    sender: Address,
    timestamp: u64,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    params: Vec<DataEntry>,
}

impl TryFrom<RawActionRequest> for ActionRequest {
    type Error = String;

    fn try_from(raw: RawActionRequest) -> Result<Self, Self::Error> {
        match raw.action {
            Some(action) => Ok(Self::new(raw.sender, raw.timestamp, action, raw.params)),
            None => Self::from_data_entries(raw.sender, raw.timestamp, raw.params)
                .map_err(|e| e.to_string()),
        }
    }
}

/// Result of a successfully executed action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "record", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// State transition applied.
    Applied,
    /// `getUserInfo` result.
    User(Option<User>),
    /// `getShipment` result.
    Shipment(Option<Shipment>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_data_entry_wire_shape() {
        let entry: DataEntry =
            serde_json::from_value(json!({"key": "class", "type": "integer", "value": 2}))
                .unwrap();
        assert_eq!(entry, DataEntry::integer("class", 2));
        assert_eq!(
            serde_json::to_value(DataEntry::string("name", "Ivan")).unwrap(),
            json!({"key": "name", "type": "string", "value": "Ivan"})
        );
    }

    #[test]
    fn test_data_entry_type_mismatch() {
        let result: Result<DataEntry, _> =
            serde_json::from_value(json!({"key": "class", "type": "integer", "value": "2"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_action_from_data_entries() {
        let request = ActionRequest::from_data_entries(
            "3Nuser",
            5_000,
            vec![
                DataEntry::string("name", "Ivan"),
                DataEntry::string("action", "register"),
            ],
        )
        .unwrap();
        assert_eq!(request.action, "register");
        assert_eq!(request.params.len(), 1);
        assert_eq!(request.now_secs(), 5);
    }

    #[test]
    fn test_missing_action_entry() {
        let err = ActionRequest::from_data_entries("3Nuser", 0, vec![]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);

        let err = ActionRequest::from_data_entries(
            "3Nuser",
            0,
            vec![DataEntry::boolean("action", true)],
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    }

    #[test]
    fn test_request_json_both_forms() {
        let inline: ActionRequest = serde_json::from_value(json!({
            "sender": "3Nuser",
            "timestamp": 1000,
            "params": [{"key": "action", "type": "string", "value": "init"}]
        }))
        .unwrap();
        let top_level: ActionRequest = serde_json::from_value(json!({
            "sender": "3Nuser",
            "timestamp": 1000,
            "action": "init"
        }))
        .unwrap();
        assert_eq!(inline, top_level);
    }

    #[test]
    fn test_outcome_json() {
        assert_eq!(
            serde_json::to_value(ActionOutcome::Applied).unwrap(),
            json!({"outcome": "applied"})
        );
        assert_eq!(
            serde_json::to_value(ActionOutcome::User(None)).unwrap(),
            json!({"outcome": "user", "record": null})
        );
    }
}
