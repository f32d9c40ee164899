use std::str::FromStr;

use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Unsupported export type: {0}")]
    UnsupportedFormat(String),
    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub content: String,
    pub mime_type: &'static str,
}

pub fn render_export(data: &Value, format: ExportFormat) -> Result<ExportPayload, ExportError> {
    let content = match format {
        ExportFormat::Json => serde_json::to_string_pretty(data)?,
        ExportFormat::Csv => convert_to_csv(data),
    };
    Ok(ExportPayload {
        content,
        mime_type: format.mime_type(),
    })
}

/// Rows are objects; the header row is the first row's keys in insertion
/// order. Anything that is not a non-empty array renders as an empty string.
#[must_use]
pub fn convert_to_csv(data: &Value) -> String {
    let Some(rows) = data.as_array().filter(|rows| !rows.is_empty()) else {
        return String::new();
    };
    let headers: Vec<&str> = rows[0]
        .as_object()
        .map(|first| first.keys().map(String::as_str).collect())
        .unwrap_or_default();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(headers.join(","));
    for row in rows {
        let cells: Vec<String> = headers
            .iter()
            .map(|header| csv_cell(row.get(*header)))
            .collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

fn csv_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => format!("\"{}\"", text.replace('"', "\"\"")),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Number(number)) => number.to_string(),
        Some(nested) => nested.to_string(),
    }
}
