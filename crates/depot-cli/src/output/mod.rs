use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Columns shown first, in this order, when present. Remaining keys follow
/// alphabetically.
const LEADING_COLUMNS: [&str; 8] = [
    "id",
    "source",
    "sender",
    "receiver",
    "subject",
    "is_read",
    "is_starred",
    "created_at",
];

/// Columns too long for a row; still present in json/raw output.
const HIDDEN_COLUMNS: [&str; 2] = ["body", "can_toggle_state"];

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let value = serde_json::to_value(value)?;
    match value {
        Value::Array(items) => Ok(render_array_table(&items)),
        Value::Object(map) => {
            let headers = ["key", "value"];
            let mut entries = map.into_iter().collect::<Vec<_>>();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let rows = entries
                .into_iter()
                .map(|(key, value)| vec![key, value_to_cell(&value)])
                .collect::<Vec<_>>();
            Ok(table::render_entity_table(&headers, &rows, table_options()))
        }
        scalar => {
            let rows = vec![vec![value_to_cell(&scalar)]];
            Ok(table::render_entity_table(&["value"], &rows, table_options()))
        }
    }
}

fn render_array_table(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(no messages)");
    }

    if !items.iter().all(Value::is_object) {
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return table::render_entity_table(&["value"], &rows, table_options());
    }

    let headers = column_order(items);
    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| {
                    map.get(header)
                        .map_or_else(|| String::from("-"), value_to_cell)
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    table::render_entity_table(&header_refs, &rows, table_options())
}

fn column_order(items: &[Value]) -> Vec<String> {
    let mut rest = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !rest.contains(key) {
                rest.push(key.clone());
            }
        }
    }
    rest.retain(|key| !HIDDEN_COLUMNS.contains(&key.as_str()));
    rest.sort();

    let mut headers = LEADING_COLUMNS
        .iter()
        .filter(|column| rest.iter().any(|key| key == *column))
        .map(|column| (*column).to_string())
        .collect::<Vec<_>>();
    rest.retain(|key| !LEADING_COLUMNS.contains(&key.as_str()));
    headers.extend(rest);
    headers
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;
    use serde_json::json;

    use super::{column_order, render};
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Example {
        id: &'static str,
        is_read: bool,
    }

    #[test]
    fn json_render_is_valid_json() {
        let out = render(&Example { id: "msg-1", is_read: true }, OutputFormat::Json)
            .expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["id"], "msg-1");
        assert_eq!(parsed["is_read"], true);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&Example { id: "msg-1", is_read: false }, OutputFormat::Raw)
            .expect("raw render should work");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let out = render(&Vec::<Example>::new(), OutputFormat::Table).expect("table render");
        assert_eq!(out, "(no messages)");
    }

    #[test]
    fn message_columns_lead_and_body_is_hidden() {
        let items = vec![json!({
            "body": "long text",
            "zone": "north",
            "subject": "Issue",
            "id": "msg-1",
            "sender": "c@x.com",
        })];
        assert_eq!(column_order(&items), vec!["id", "sender", "subject", "zone"]);
    }

    #[test]
    fn object_renders_as_key_value_table() {
        let out = render(&Example { id: "msg-1", is_read: true }, OutputFormat::Table)
            .expect("table render should work");
        assert!(out.lines().next().is_some_and(|line| line.contains("key")));
        assert!(out.contains("is_read"));
    }
}
