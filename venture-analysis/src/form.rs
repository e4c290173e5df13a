//! Collecting form values for a tool.
//!
//! Raw text is typed per field kind at the boundary. Nothing is validated:
//! blank fields and ids the tool does not declare are forwarded as collected.

use tracing::warn;

use crate::types::{InputValue, Inputs, ToolDefinition};

/// Build an input mapping from raw `(field id, text)` pairs.
///
/// With `seed_defaults`, fields that declare a default start with it and
/// supplied pairs override it.
pub fn collect_inputs<'a, I>(tool: &ToolDefinition, raw: I, seed_defaults: bool) -> Inputs
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut inputs = if seed_defaults {
        tool.default_inputs()
    } else {
        Inputs::new()
    };

    for (id, text) in raw {
        let kind = tool.input(id).map(|i| i.kind);
        if kind.is_none() {
            warn!(tool = tool.id, field = id, "Field not declared by tool; forwarding as text");
        }
        inputs.insert(id.to_string(), InputValue::from_raw(kind, text));
    }

    inputs
}

/// Split a `key=value` argument. The value may itself contain `=`.
pub fn parse_assignment(arg: &str) -> Option<(&str, &str)> {
    let (key, value) = arg.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Fields the tool declares that have no value yet.
pub fn missing_fields<'t>(tool: &'t ToolDefinition, inputs: &Inputs) -> Vec<&'t str> {
    tool.inputs
        .iter()
        .filter(|i| inputs.get(i.id).map_or(true, InputValue::is_empty))
        .map(|i| i.id)
        .collect()
}
