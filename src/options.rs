//! Listener options: the caller-facing form and the normalized form that is
//! stored and forwarded to targets.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::RegistryError;

/// Options accepted when registering or removing a listener.
///
/// `name`, `capture` and `once` are interpreted by the registry. Every other
/// field is kept in `extra` and forwarded to the target untouched.
///
/// ```rust
/// use listener_registry::ListenerOptions;
///
/// let options = ListenerOptions::named("save-button").with_capture(true);
/// assert_eq!(options.name.as_deref(), Some("save-button"));
/// assert!(options.capture);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub capture: bool,
    pub once: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ListenerOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }

    pub fn with_once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    /// Attach an opaque option for the target.
    ///
    /// `name`, `capture`, `once` and `callback_once` are dropped when the
    /// options are normalized; use the dedicated builders for those.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// The name, treating an empty string as absent.
    pub(crate) fn given_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    /// Parse an options value received from an untyped caller.
    ///
    /// `Null` means "no options". A boolean gets its own error because it is
    /// almost always a legacy capture flag.
    pub fn from_value(value: &Value) -> Result<Option<Self>, RegistryError> {
        match value {
            Value::Null => Ok(None),
            Value::Object(_) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| RegistryError::MalformedOptions(e.to_string())),
            Value::Bool(_) => Err(RegistryError::BooleanOptions),
            other => Err(RegistryError::InvalidOptionsType {
                found: type_name(other),
            }),
        }
    }

    /// Resolve the trailing positional arguments that follow
    /// `(target, event type, listener)`.
    pub fn from_args(args: &[Value]) -> Result<Option<Self>, RegistryError> {
        match args {
            [] => Ok(None),
            [value] => Self::from_value(value),
            _ => Err(RegistryError::TooManyArguments {
                got: 3 + args.len(),
            }),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Options as stored in a record and handed to the target.
///
/// `once` is translated to `callback_once` so a target never applies its own
/// one-shot semantics on top of the registry's; removal of a fire-once
/// listener is always driven by the registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedOptions {
    pub name: String,
    pub capture: bool,
    pub callback_once: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Keys owned by the registry. They never pass through `extra`.
const RESERVED_KEYS: [&str; 4] = ["name", "capture", "once", "callback_once"];

impl NormalizedOptions {
    pub(crate) fn new(options: ListenerOptions, name: String) -> Self {
        let mut extra = options.extra;
        extra.retain(|key, _| !RESERVED_KEYS.contains(&key.as_str()));
        Self {
            name,
            capture: options.capture,
            callback_once: options.once,
            extra,
        }
    }

    /// Translate back to the registration vocabulary.
    pub fn to_listener_options(&self) -> ListenerOptions {
        ListenerOptions {
            name: Some(self.name.clone()),
            capture: self.capture,
            once: self.callback_once,
            extra: self.extra.clone(),
        }
    }
}
