//! Device command publishing over the IoT data plane.
//!
//! Commands are fire-and-forget: the payload is published to the command
//! topic and the operator is pointed at the response topic. There is no
//! response correlation; the timeout flag is accepted but reserved.

use serde_json::{Map, Value};

/// Name-spaced command/response topic pair for a thing.
#[derive(Debug, Clone)]
pub struct CommandTopics {
    pub command_topic: String,
    pub response_topic: String,
}

impl CommandTopics {
    pub fn for_thing(namespace: &str, thing_name: &str) -> Self {
        Self {
            command_topic: format!("{namespace}/{thing_name}/commands"),
            response_topic: format!("{namespace}/{thing_name}/responses"),
        }
    }
}

/// Build the command payload: `{"command": name}` with any extra
/// parameters merged in.
pub fn build_payload(command: &str, params: Option<Map<String, Value>>) -> Value {
    let mut payload = Map::new();
    payload.insert("command".to_string(), Value::String(command.to_string()));
    if let Some(params) = params {
        payload.extend(params);
    }
    Value::Object(payload)
}

/// Parameters for the set_setting command.
pub fn setting_params(name: &str, raw_value: &str) -> Map<String, Value> {
    let mut params = Map::new();
    params.insert("setting".to_string(), Value::String(name.to_string()));
    params.insert("value".to_string(), parse_setting_value(raw_value));
    params
}

/// Interpret a setting value typed on the command line: booleans and
/// numbers become JSON values ("TRUE" counts as true), anything else stays
/// a string with its original casing.
pub fn parse_setting_value(raw: &str) -> Value {
    serde_json::from_str(&raw.to_lowercase()).unwrap_or_else(|_| Value::String(raw.to_string()))
}
