//! JSON, Markdown table and bullet list rendering.

use crate::extract::Params;
use crate::tools::{ToolContext, ToolOutput};
use crate::types::{AppError, Result};
use serde_json::{json, Value};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Table,
    List,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Table => "table",
            Format::List => "list",
        }
    }
}

impl FromStr for Format {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "table" => Ok(Format::Table),
            "list" => Ok(Format::List),
            other => Err(AppError::Parameter(format!(
                "Unknown format '{other}' (use json, table or list)"
            ))),
        }
    }
}

fn scalar(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn table(data: &Value) -> String {
    match data {
        Value::Array(rows) if rows.first().is_some_and(Value::is_object) => {
            let headers: Vec<String> = rows[0]
                .as_object()
                .map(|o| o.keys().cloned().collect())
                .unwrap_or_default();
            let mut out = format!("| {} |\n", headers.join(" | "));
            out.push_str(&format!(
                "| {} |\n",
                headers
                    .iter()
                    .map(|h| "-".repeat(h.len().max(3)))
                    .collect::<Vec<_>>()
                    .join(" | ")
            ));
            for row in rows {
                let cells: Vec<String> = headers.iter().map(|h| scalar(&row[h.as_str()])).collect();
                out.push_str(&format!("| {} |\n", cells.join(" | ")));
            }
            out.trim_end().to_string()
        }
        Value::Object(map) => {
            let mut out = String::from("| key | value |\n| --- | ----- |\n");
            for (k, v) in map {
                out.push_str(&format!("| {} | {} |\n", k, scalar(v)));
            }
            out.trim_end().to_string()
        }
        other => scalar(other),
    }
}

fn list(data: &Value) -> String {
    match data {
        Value::Array(items) => items
            .iter()
            .map(|i| format!("• {}", scalar(i)))
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("• {}: {}", k, scalar(v)))
            .collect::<Vec<_>>()
            .join("\n"),
        other => format!("• {}", scalar(other)),
    }
}

/// Render `data` in the requested format.
pub fn render(data: &Value, format: Format) -> String {
    match format {
        Format::Json => serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string()),
        Format::Table => table(data),
        Format::List => list(data),
    }
}

/// Interpret free text as JSON when it parses, otherwise wrap it.
pub fn parse_data(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| json!({ "text": raw }))
}

pub fn format_data(_ctx: &ToolContext, params: &Params) -> Result<ToolOutput> {
    let raw = params
        .text("data")
        .ok_or_else(|| AppError::Parameter("No data given to format".to_string()))?;
    let format = params
        .text("format")
        .map(Format::from_str)
        .transpose()?
        .unwrap_or_default();

    let data = parse_data(raw);
    let rendered = render(&data, format);
    let fence = if format == Format::Json { "json" } else { "" };
    Ok(ToolOutput::new(
        json!({ "format": format.as_str(), "formatted": rendered }),
        format!(
            "📋 **Formatted Output ({}):**\n```{}\n{}\n```",
            format.as_str().to_uppercase(),
            fence,
            rendered
        ),
    ))
}
