//! Response rendering.
//!
//! Pure functions of a [`ResponseRecord`]; nothing here performs I/O.

use std::fmt::Write as _;

use crate::descriptor::ReturnFormat;
use crate::error::{Error, Result};
use crate::response::ResponseRecord;

/// Render a response body in the requested format.
///
/// Only `json` can fail on a well-formed record: a body that is not JSON is
/// a [`Error::Format`], never a transport error.
pub fn render(response: &ResponseRecord, format: ReturnFormat) -> Result<String> {
    match format {
        ReturnFormat::Text => Ok(response.text().to_string()),
        ReturnFormat::Json => {
            let value = response.json().map_err(|e| Error::Format {
                format: "json",
                reason: format!("response body is not valid JSON: {e}"),
            })?;
            Ok(serde_json::to_string_pretty(&value)?)
        }
        ReturnFormat::Markdown => response.markdown(),
        ReturnFormat::PlainText => Ok(response.plain_text()),
        ReturnFormat::RichText => Ok(rich_text(response)),
    }
}

/// Status and headers as a human-readable block, followed by the body.
fn rich_text(response: &ResponseRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Status: {}", response.status_line());
    let _ = writeln!(out, "URL: {}", response.url);
    out.push_str("Headers:\n");
    for (name, value) in &response.headers {
        let _ = writeln!(out, "  {name}: {value}");
    }
    out.push('\n');
    out.push_str(response.text());
    out
}

/// Status, headers and raw body, as returned by `primp_upload`.
pub fn summary(response: &ResponseRecord) -> String {
    let headers: serde_json::Map<String, serde_json::Value> = response
        .headers
        .iter()
        .map(|(name, value)| (name.clone(), serde_json::Value::String(value.clone())))
        .collect();
    format!(
        "Status: {}\nHeaders: {}\n\nContent:\n{}",
        response.status_line(),
        serde_json::Value::Object(headers),
        response.text()
    )
}
