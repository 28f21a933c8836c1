mod value;

use std::collections::HashMap;

pub use value::Value;

/// Formatter settings: plain structured data, usually a JSON object.
pub type Settings = serde_json::Value;

/// Parameters bound to placeholders by name.
pub type Params = HashMap<String, Value>;
