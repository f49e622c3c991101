//! Markdown note rendering

use crate::types::ReadResult;
use serde_json::Value;
use std::fmt::Write;

/// Render a read result as a Markdown note
///
/// Output is deterministic for a given result. Only non-empty string and
/// non-zero numeric metadata entries are listed under `### Extra`.
pub fn format_note(result: &ReadResult) -> String {
    let platform = result.platform.map(|p| p.label());
    let link_text = platform.unwrap_or(result.source.as_str());

    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "# {}", result.display_title());
    out.push('\n');
    let _ = writeln!(out, "> **Source**: [{}]({})", link_text, result.source);
    let _ = writeln!(out, "> **Strategy**: {}", result.strategy);
    out.push_str("\n---\n\n");
    out.push_str(&result.content);
    out.push_str("\n\n---\n\n## Metadata\n\n");
    let _ = writeln!(out, "- **URL**: {}", result.source);
    let _ = writeln!(out, "- **Platform**: {}", platform.unwrap_or("Unknown"));
    let _ = writeln!(out, "- **Strategy**: {}", result.strategy);

    let extra: Vec<(&String, String)> = result
        .metadata
        .iter()
        .filter_map(|(key, value)| scalar_text(value).map(|text| (key, text)))
        .collect();

    if !extra.is_empty() {
        out.push_str("\n### Extra\n\n");
        for (key, text) in extra {
            let _ = writeln!(out, "- **{}**: {}", key, text);
        }
    }

    out
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}
