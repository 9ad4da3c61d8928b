use serde::Serialize;
use serde_json::Value;

use crate::cli::{GlobalFlags, OutputFormat};
use table::TableOptions;

pub mod table;

/// Render a serializable response to a string in the requested format.
/// `options` only affects table output.
pub fn render<T: Serialize>(
    value: &T,
    format: OutputFormat,
    options: TableOptions,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => Ok(render_table(&serde_json::to_value(value)?, options)),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response to stdout in the format chosen by `flags`.
pub fn output<T: Serialize>(value: &T, flags: &GlobalFlags) -> anyhow::Result<()> {
    let options = if flags.quiet {
        TableOptions::default()
    } else {
        TableOptions::for_stdout()
    };
    let rendered = render(value, flags.format, options)?;
    println!("{rendered}");
    Ok(())
}

fn render_table(value: &Value, options: TableOptions) -> String {
    match value {
        Value::Array(items) => render_array_table(items, options),
        Value::Object(map) => {
            // A single list field renders as its rows.
            if let Some(Value::Array(items)) = map.get("rows") {
                return render_array_table(items, options);
            }
            let headers = ["key", "value"];
            let rows = map
                .iter()
                .map(|(key, value)| vec![key.clone(), value_to_cell(value)])
                .collect::<Vec<_>>();
            table::render_entity_table(&headers, &rows, options)
        }
        scalar => {
            let headers = ["value"];
            let rows = vec![vec![value_to_cell(scalar)]];
            table::render_entity_table(&headers, &rows, options)
        }
    }
}

fn render_array_table(items: &[Value], options: TableOptions) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    if !items.iter().all(Value::is_object) {
        let headers = ["value"];
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return table::render_entity_table(&headers, &rows, options);
    }

    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    headers.sort();

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

    table::render_entity_table(&header_refs, &rows, options)
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::Object(map) => map
            .get("status")
            .and_then(Value::as_str)
            .map_or_else(|| compact_json(value), ToString::to_string),
        Value::Array(_) => compact_json(value),
    }
}

fn compact_json(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| String::from("<invalid-json>"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::render;
    use super::table::TableOptions;
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Row {
        full_name: &'static str,
        admission_no: &'static str,
        score: Option<f64>,
    }

    #[derive(Serialize)]
    struct Listing {
        class: &'static str,
        rows: Vec<Row>,
    }

    fn listing() -> Listing {
        Listing {
            class: "JSS 1A",
            rows: vec![
                Row {
                    full_name: "Ada Lovelace",
                    admission_no: "1001",
                    score: Some(9.0),
                },
                Row {
                    full_name: "Grace Hopper",
                    admission_no: "1002",
                    score: None,
                },
            ],
        }
    }

    #[test]
    fn json_render_is_valid_json() {
        let out = render(&listing(), OutputFormat::Json, TableOptions::default()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["class"], "JSS 1A");
        assert_eq!(parsed["rows"][1]["score"], serde_json::Value::Null);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&listing(), OutputFormat::Raw, TableOptions::default()).unwrap();
        assert!(!out.contains('\n'));
    }

    #[test]
    fn table_render_lists_rows() {
        let out = render(&listing(), OutputFormat::Table, TableOptions::default()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        let header: Vec<&str> = lines[0].split_whitespace().collect();
        assert_eq!(header, vec!["admission_no", "full_name", "score"]);
        assert!(lines[2].contains("Ada Lovelace"));
        assert!(lines[3].trim_end().ends_with('-'));
    }

    #[test]
    fn nested_outcomes_render_as_status() {
        let value = serde_json::json!({
            "accepted": true,
            "sync": { "status": "skipped", "reason": "missing_credential" },
        });
        let out = render(&value, OutputFormat::Table, TableOptions::default()).unwrap();
        assert!(out.contains("skipped"));
        assert!(!out.contains("missing_credential"));
    }
}
