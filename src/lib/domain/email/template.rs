//! Literal placeholder substitution for templated emails.
//!
//! Each key `k` in the data map replaces every occurrence of the literal
//! token `{{k}}`. No escaping, no nesting, no conditionals; unmatched
//! placeholders are left verbatim.

use serde_json::{Map, Value};

/// Renders a template by substituting `{{key}}` tokens with the string form
/// of the corresponding data value.
pub fn render(template: &str, data: &Map<String, Value>) -> String {
    let mut rendered = template.to_string();

    for (key, value) in data {
        let token = format!("{{{{{}}}}}", key);
        rendered = rendered.replace(&token, &value_to_string(value));
    }

    rendered
}

/// String values substitute verbatim; everything else uses its JSON form.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
