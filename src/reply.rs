//! Extraction of machine-readable commands from model replies.
//!
//! Hosts that prompt a model to answer with a JSON command (device control,
//! structured queries) cannot rely on a clean body: replies arrive wrapped in
//! markdown code fences, embedded in prose, with trailing commas, or cut off
//! by the token limit. `extract_json` digs the first parseable JSON object
//! out of such a reply, applying light repair before giving up.

use log::debug;
use serde_json::Value;

/// Extract the first JSON object from a model reply.
///
/// A fence-stripped reply that itself starts with `{` is treated as the
/// object, repaired if needed (trailing commas removed, a truncated object
/// closed with its missing braces). Otherwise balanced `{...}` candidates
/// embedded in the prose are tried in order, plain first and comma-repaired
/// second. Returns `None` when no object can be recovered; arrays and bare
/// scalars are not accepted.
pub fn extract_json(reply: &str) -> Option<Value> {
    let clean = strip_code_fences(reply.trim());

    // Whole-reply object, possibly broken. Handled before the embedded scan
    // so a truncated outer object is repaired rather than mistaken for its
    // first complete sub-object.
    if clean.starts_with('{') {
        if let Some(value) = parse_object(clean) {
            return Some(value);
        }
        if let Some(value) = parse_object(&strip_trailing_commas(clean)) {
            debug!("recovered command after comma repair");
            return Some(value);
        }
        if let Some(closed) = close_truncated_object(clean) {
            if let Some(value) = parse_object(&strip_trailing_commas(&closed)) {
                debug!("recovered command from truncated reply");
                return Some(value);
            }
        }
    }

    for candidate in object_candidates(clean) {
        if let Some(value) = parse_object(candidate) {
            return Some(value);
        }
    }

    for candidate in object_candidates(clean) {
        if let Some(value) = parse_object(&strip_trailing_commas(candidate)) {
            debug!("recovered command after comma repair");
            return Some(value);
        }
    }

    None
}

fn parse_object(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

/// Drop a surrounding markdown code fence, with or without a `json` tag.
fn strip_code_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim_start();
    match rest.strip_suffix("```") {
        Some(body) => body.trim_end(),
        None => rest,
    }
}

/// Top-level balanced `{...}` substrings, in order of appearance.
fn object_candidates(text: &str) -> Vec<&str> {
    let mut candidates = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{' {
            if let Some(end) = balanced_end(text, i) {
                candidates.push(&text[i..=end]);
                i = end + 1;
                continue;
            }
        }
        i += 1;
    }
    candidates
}

/// Index of the brace closing the object opened at `start`, tracking string
/// literals so braces inside them do not count.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in text.as_bytes()[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if *byte == b'\\' {
                escaped = true;
            } else if *byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Remove commas that directly precede a closing brace or bracket.
fn strip_trailing_commas(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in json.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '}' | ']' => {
                while out.ends_with(|p: char| p.is_whitespace()) {
                    out.pop();
                }
                if out.ends_with(',') {
                    out.pop();
                }
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Close an object the model stopped emitting mid-way: terminate an open
/// string literal and append the missing closing braces.
fn close_truncated_object(text: &str) -> Option<String> {
    if !text.starts_with('{') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for byte in text.bytes() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => depth = depth.checked_sub(1)?,
            _ => {}
        }
    }
    if depth == 0 {
        return None;
    }

    let mut closed = text.trim_end().to_string();
    if in_string {
        closed.push('"');
    }
    while closed.ends_with(|p: char| p.is_whitespace() || p == ',' || p == ':') {
        closed.pop();
    }
    for _ in 0..depth {
        closed.push('}');
    }
    Some(closed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_object() {
        let reply = r#"{"action":"control","entity_id":"light.kitchen"}"#;
        assert_eq!(
            extract_json(reply),
            Some(json!({"action": "control", "entity_id": "light.kitchen"}))
        );
    }

    #[test]
    fn test_markdown_fenced_object() {
        let reply = "```json\n{\"action\":\"query\",\"sub_type\":\"temperatures\"}\n```";
        assert_eq!(
            extract_json(reply),
            Some(json!({"action": "query", "sub_type": "temperatures"}))
        );
    }

    #[test]
    fn test_object_embedded_in_prose() {
        let reply = "Sure! Here is the command: \
                     {\"action\":\"control\",\"service\":\"turn_on\"} Let me know if that works.";
        assert_eq!(
            extract_json(reply),
            Some(json!({"action": "control", "service": "turn_on"}))
        );

        // Leading object with trailing prose still parses.
        let reply = r#"{"action":"query"} Hope that helps!"#;
        assert_eq!(extract_json(reply), Some(json!({"action": "query"})));
    }

    #[test]
    fn test_truncated_outer_object_beats_complete_inner_one() {
        let reply = r#"{"action":"control","data":{"rgb_color":[0,255,0]},"service":"turn_o"#;
        let value = extract_json(reply).unwrap();
        assert_eq!(value["action"], json!("control"));
        assert_eq!(value["data"]["rgb_color"], json!([0, 255, 0]));
    }

    #[test]
    fn test_nested_object_and_braces_inside_strings() {
        let reply = r#"{"action":"control","data":{"rgb_color":[255,0,0]},"note":"use } sparingly"}"#;
        let value = extract_json(reply).unwrap();
        assert_eq!(value["data"]["rgb_color"], json!([255, 0, 0]));
        assert_eq!(value["note"], json!("use } sparingly"));
    }

    #[test]
    fn test_trailing_comma_is_repaired() {
        let reply = r#"{"action":"query","sub_type":"windows",}"#;
        assert_eq!(
            extract_json(reply),
            Some(json!({"action": "query", "sub_type": "windows"}))
        );
    }

    #[test]
    fn test_truncated_reply_is_closed() {
        let reply = r#"{"action":"control","data":{"brightness_pct":50},"entity_id":"light.kit"#;
        let value = extract_json(reply).unwrap();
        assert_eq!(value["action"], json!("control"));
        assert_eq!(value["data"]["brightness_pct"], json!(50));
    }

    #[test]
    fn test_non_json_reply_yields_none() {
        assert_eq!(extract_json("The kitchen light is now on."), None);
        assert_eq!(extract_json(""), None);
        // Arrays and scalars are not commands.
        assert_eq!(extract_json("[1,2,3]"), None);
        assert_eq!(extract_json("42"), None);
    }
}
