use serde_json::Value;

/// Remove every `[` and `]` from `text`.
///
/// The LSV marks translator-supplied words with square brackets
/// ("In the beginning [God] created"); stored text drops the marks but
/// keeps the words.
pub fn strip_brackets(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '[' | ']')).collect()
}

/// Strip brackets from the `text` fields of a payload in place.
///
/// A `data` array is treated as a chapter and every element's `text` is
/// cleaned. Otherwise a top-level `text` is cleaned as a single verse.
/// Anything else passes through untouched. Only string `text` values are
/// modified. Returns the number of `text` fields cleaned.
pub fn clean_payload(payload: &mut Value) -> usize {
    if let Some(Value::Array(items)) = payload.get_mut("data") {
        return items.iter_mut().map(clean_text_field).filter(|cleaned| *cleaned).count();
    }
    usize::from(clean_text_field(payload))
}

fn clean_text_field(value: &mut Value) -> bool {
    match value.get_mut("text") {
        Some(Value::String(text)) => {
            if text.contains(['[', ']']) {
                *text = strip_brackets(text);
            }
            true
        }
        _ => false,
    }
}
