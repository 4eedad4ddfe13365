use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::errors::ClientError;

/// OAuth flow used by the auth client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowType {
    Implicit,
    #[default]
    Pkce,
}

/// Structured options handed to the backend client constructor
///
/// Timeouts are in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientOptions {
    /// Postgres schema used by the data API
    pub schema: String,
    /// Extra headers sent with every request
    pub headers: BTreeMap<String, String>,
    pub auto_refresh_token: bool,
    pub persist_session: bool,
    pub postgrest_client_timeout: u64,
    pub storage_client_timeout: u64,
    pub function_client_timeout: u64,
    pub flow_type: FlowType,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            schema: "public".to_string(),
            headers: BTreeMap::new(),
            auto_refresh_token: true,
            persist_session: true,
            postgrest_client_timeout: 120,
            storage_client_timeout: 20,
            function_client_timeout: 5,
            flow_type: FlowType::Pkce,
        }
    }
}

/// Client options as supplied in configuration: either already structured
/// or a plain key/value mapping that still has to be coerced.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientOptionsInput {
    Typed(ClientOptions),
    Map(Map<String, Value>),
}

impl ClientOptionsInput {
    /// An empty mapping carries no options at all
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Map(map) if map.is_empty())
    }
}

impl From<ClientOptions> for ClientOptionsInput {
    fn from(options: ClientOptions) -> Self {
        Self::Typed(options)
    }
}

impl From<Map<String, Value>> for ClientOptionsInput {
    fn from(map: Map<String, Value>) -> Self {
        Self::Map(map)
    }
}

impl TryFrom<ClientOptionsInput> for ClientOptions {
    type Error = ClientError;

    /// Passes each mapping entry through to the field of the same name.
    /// Unknown keys and mistyped values are rejected.
    fn try_from(input: ClientOptionsInput) -> Result<Self, Self::Error> {
        match input {
            ClientOptionsInput::Typed(options) => Ok(options),
            ClientOptionsInput::Map(map) => serde_json::from_value(Value::Object(map))
                .map_err(|e| ClientError::InvalidOptions(e.to_string())),
        }
    }
}

impl ClientOptions {
    /// Normalize optional configured options into the structured shape.
    ///
    /// Absent options and empty mappings both yield `None`.
    pub fn normalize(input: Option<&ClientOptionsInput>) -> Result<Option<Self>, ClientError> {
        match input {
            None => Ok(None),
            Some(input) if input.is_empty() => Ok(None),
            Some(input) => Self::try_from(input.clone()).map(Some),
        }
    }
}
