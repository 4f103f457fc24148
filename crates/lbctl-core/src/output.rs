use crate::error::{Error, Result};
use crate::models::{FetchedMetrics, RawResponseBody};
use crate::render::render_series;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructuredFormat {
    Json,
    Yaml,
}

/// How a command presents its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Re-serialize the decoded API response.
    Passthrough(StructuredFormat),
    /// Human readable output; plots for metrics.
    Graph,
}

impl OutputMode {
    /// JSON wins when both structured formats were requested.
    pub fn from_flags(flags: &[StructuredFormat]) -> Self {
        if flags.contains(&StructuredFormat::Json) {
            OutputMode::Passthrough(StructuredFormat::Json)
        } else if flags.contains(&StructuredFormat::Yaml) {
            OutputMode::Passthrough(StructuredFormat::Yaml)
        } else {
            OutputMode::Graph
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, OutputMode::Passthrough(_))
    }
}

pub fn dispatch<W: Write>(
    mode: OutputMode,
    resource_name: &str,
    fetched: FetchedMetrics,
    out: &mut W,
) -> Result<()> {
    match mode {
        OutputMode::Passthrough(format) => describe_raw(format, &fetched.raw, out),
        OutputMode::Graph => render_series(resource_name, &fetched.result, out),
    }
}

/// Decodes `raw` and writes it in `format`. Nothing is written if decoding fails.
pub fn describe_raw<W: Write>(
    format: StructuredFormat,
    raw: &RawResponseBody,
    out: &mut W,
) -> Result<()> {
    let value = raw.decode()?;
    describe(format, &value, out)
}

pub fn describe<T: Serialize, W: Write>(
    format: StructuredFormat,
    value: &T,
    out: &mut W,
) -> Result<()> {
    let mut rendered = match format {
        StructuredFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| Error::MalformedResponse(e.to_string()))?,
        StructuredFormat::Yaml => serde_yaml::to_string(value)?,
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    out.write_all(rendered.as_bytes())?;
    Ok(())
}
