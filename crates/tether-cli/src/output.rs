//! Terminal formatting for command results.

use serde_json::{Value, json};
use tether_types::{Capability, MethodType};

/// Capability as `{"current": .., "candidates": [..]}`.
pub fn capability_json(capability: &Capability<Value>) -> Value {
    json!({
        "current": capability.current(),
        "candidates": capability.candidates(),
    })
}

/// Render method types as an aligned table, one method per line.
pub fn method_table(methods: &[MethodType]) -> String {
    const HEADERS: [&str; 4] = ["METHOD", "PARAMS", "RESULTS", "VERSION"];

    let rows: Vec<[String; 4]> = methods
        .iter()
        .map(|method| {
            [
                method.name.clone(),
                join_types(&method.parameter_types),
                join_types(&method.result_types),
                method.version.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(str::to_string), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn join_types(types: &[String]) -> String {
    if types.is_empty() {
        "-".to_string()
    } else {
        types.join(", ")
    }
}

fn push_row(out: &mut String, row: &[String; 4], widths: &[usize; 4]) {
    let mut line = String::new();
    for (cell, &width) in row.iter().zip(widths) {
        line.push_str(&format!("{cell:<width$}  "));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, params: &[&str], results: &[&str]) -> MethodType {
        MethodType {
            name: name.to_string(),
            parameter_types: params.iter().map(|s| (*s).to_string()).collect(),
            result_types: results.iter().map(|s| (*s).to_string()).collect(),
            version: "1.0".to_string(),
        }
    }

    #[test]
    fn test_method_table() {
        let table = method_table(&[
            method("getVersions", &[], &["string*"]),
            method("setShootMode", &["string"], &["int"]),
        ]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("METHOD"));
        assert_eq!(lines[1], "getVersions   -       string*  1.0");
        assert_eq!(lines[2], "setShootMode  string  int      1.0");
    }

    #[test]
    fn test_method_table_empty() {
        assert_eq!(method_table(&[]), "METHOD  PARAMS  RESULTS  VERSION\n");
    }

    #[test]
    fn test_capability_json() {
        let capability = Capability::new(json!(30), vec![json!(10), json!(30)]);
        assert_eq!(
            capability_json(&capability),
            json!({"current": 30, "candidates": [10, 30]})
        );
    }
}
