use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub timestamp: OffsetDateTime,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    pub name: String,
    pub samples: Vec<MetricSample>,
}

impl MetricSeries {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            samples: Vec::new(),
        }
    }

    pub fn push<V: Into<String>>(&mut self, timestamp: OffsetDateTime, value: V) {
        self.samples.push(MetricSample {
            timestamp,
            value: value.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Numeric sample values in order. Values that do not parse as a finite
    /// `f64` are left out rather than reported.
    pub fn numeric_values(&self) -> Vec<f64> {
        let values: Vec<f64> = self
            .samples
            .iter()
            .filter_map(|s| s.value.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .collect();
        let dropped = self.samples.len() - values.len();
        if dropped > 0 {
            tracing::trace!(series = %self.name, dropped, "skipping non-numeric samples");
        }
        values
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsResult {
    pub window: TimeWindow,
    pub series: HashMap<String, MetricSeries>,
}

impl MetricsResult {
    pub fn new(window: TimeWindow) -> Self {
        Self {
            window,
            series: HashMap::new(),
        }
    }

    pub fn insert(&mut self, series: MetricSeries) {
        self.series.insert(series.name.clone(), series);
    }
}

/// Response body of an API call exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawResponseBody(Vec<u8>);

impl RawResponseBody {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Decodes into a generic value. Object keys come back sorted.
    pub fn decode(&self) -> Result<serde_json::Value> {
        serde_json::from_slice(&self.0).map_err(|e| Error::MalformedResponse(e.to_string()))
    }
}

impl From<&str> for RawResponseBody {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

/// Typed metrics and the raw body they were decoded from, produced by one call.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedMetrics {
    pub result: MetricsResult,
    pub raw: RawResponseBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatingIpType {
    Ipv4,
    Ipv6,
}

impl FloatingIpType {
    pub fn label(&self) -> &'static str {
        match self {
            FloatingIpType::Ipv4 => "IPv4",
            FloatingIpType::Ipv6 => "IPv6",
        }
    }
}

impl FromStr for FloatingIpType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ipv4" => Ok(FloatingIpType::Ipv4),
            "ipv6" => Ok(FloatingIpType::Ipv6),
            _ => Err(Error::InvalidArgument(format!(
                "invalid floating IP type: {s} (expected ipv4 or ipv6)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloatingIp {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub ip: String,
    #[serde(rename = "type")]
    pub ip_type: FloatingIpType,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FloatingIpCreateOpts {
    #[serde(rename = "type")]
    pub ip_type: FloatingIpType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<i64>,
    pub description: String,
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatingIpCreated {
    pub floating_ip: FloatingIp,
    pub action: Option<Action>,
    pub raw: RawResponseBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Running,
    Success,
    Error,
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionStatus::Running => "running",
            ActionStatus::Success => "success",
            ActionStatus::Error => "error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub id: i64,
    #[serde(default)]
    pub command: String,
    pub status: ActionStatus,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub error: Option<ActionError>,
}

impl Action {
    pub fn running(id: i64, command: &str) -> Self {
        Self {
            id,
            command: command.into(),
            status: ActionStatus::Running,
            progress: 0,
            error: None,
        }
    }
}
