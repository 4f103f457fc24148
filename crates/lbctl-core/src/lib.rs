pub mod actions;
pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod plot;
pub mod render;
pub mod timeutils;
pub mod waiter;

pub use api::{
    ActionApi, ActionWaiter, FloatingIpActions, MetricsApi, ResourceDirectory, ServerActions,
};
pub use client::HttpClient;
pub use config::{ActionsConfig, ApiConfig, Config, LoggingConfig};
pub use error::{Error, Result};
pub use metrics::{MetricQuery, MetricType};
pub use models::{
    Action, ActionStatus, FetchedMetrics, FloatingIp, FloatingIpCreateOpts, FloatingIpCreated,
    FloatingIpType, LoadBalancer, MetricSample, MetricSeries, MetricsResult, RawResponseBody,
    Server, TimeWindow,
};
pub use output::{OutputMode, StructuredFormat};
pub use pipeline::{run_metrics, MetricsRequest};
pub use timeutils::{now_utc, resolve_window, Clock, FixedClock, SystemClock};
pub use waiter::PollingWaiter;
