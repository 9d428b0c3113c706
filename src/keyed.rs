use serde_json::{Map, Value};

use crate::error::Result;

/// Render a parsed JSON value as Markdown.
///
/// Arrays become one `## Item` section per element, objects one bullet per
/// key, scalars their pretty JSON text. Nested values are not expanded: they
/// appear as compact JSON inside the bullet.
pub fn value_to_markdown(value: &Value) -> Result<String> {
    let markdown = match value {
        Value::Array(elements) => {
            let mut sections = Vec::with_capacity(elements.len());
            for element in elements {
                let body = match element {
                    Value::Object(map) => bullets(map)?,
                    other => serde_json::to_string(other)?,
                };
                sections.push(format!("## Item\n\n{body}"));
            }
            sections.join("\n\n")
        }
        Value::Object(map) => bullets(map)?,
        scalar => serde_json::to_string_pretty(scalar)?,
    };
    Ok(markdown)
}

fn bullets(map: &Map<String, Value>) -> Result<String> {
    let mut lines = Vec::with_capacity(map.len());
    for (key, value) in map {
        lines.push(format!("- **{key}**: {}", serde_json::to_string(value)?));
    }
    Ok(lines.join("\n"))
}

/// Parse JSON text and render it as Markdown.
pub fn json_to_markdown(text: &str) -> Result<String> {
    let value: Value = serde_json::from_str(text)?;
    value_to_markdown(&value)
}
