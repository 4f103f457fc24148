use crate::error::{Error, Result};
use crate::models::TimeWindow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    OpenConnections,
    ConnectionsPerSecond,
    RequestsPerSecond,
    Bandwidth,
}

impl MetricType {
    pub const NAMES: [&'static str; 4] = [
        "open_connections",
        "connections_per_second",
        "requests_per_second",
        "bandwidth",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::OpenConnections => "open_connections",
            MetricType::ConnectionsPerSecond => "connections_per_second",
            MetricType::RequestsPerSecond => "requests_per_second",
            MetricType::Bandwidth => "bandwidth",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "open_connections" => Ok(MetricType::OpenConnections),
            "connections_per_second" => Ok(MetricType::ConnectionsPerSecond),
            "requests_per_second" => Ok(MetricType::RequestsPerSecond),
            "bandwidth" => Ok(MetricType::Bandwidth),
            _ => Err(Error::UnknownMetricType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricQuery {
    pub types: Vec<MetricType>,
    pub window: TimeWindow,
}

impl MetricQuery {
    pub fn single(metric_type: MetricType, window: TimeWindow) -> Self {
        Self {
            types: vec![metric_type],
            window,
        }
    }

    /// Parses `metric_type` and builds a one-type query for `window`.
    pub fn build(metric_type: &str, window: TimeWindow) -> Result<Self> {
        let metric_type = metric_type.parse::<MetricType>()?;
        Ok(Self::single(metric_type, window))
    }

    /// Comma separated type list as sent in the `type` query parameter.
    pub fn type_param(&self) -> String {
        self.types
            .iter()
            .map(MetricType::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}
