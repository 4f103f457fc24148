//! Capabilities the commands need from the remote API.
//!
//! [`crate::client::HttpClient`] implements all of them; tests substitute fakes.

use crate::error::Result;
use crate::metrics::MetricQuery;
use crate::models::{Action, FetchedMetrics, FloatingIp, FloatingIpCreateOpts, FloatingIpCreated};
use crate::models::{LoadBalancer, Server};

/// Looks up a resource by numeric ID or by name. `Ok(None)` means no match.
pub trait ResourceDirectory<R> {
    fn resolve(&self, id_or_name: &str) -> Result<Option<R>>;
}

pub trait MetricsApi {
    fn fetch_metrics(&self, load_balancer: &LoadBalancer, query: &MetricQuery)
        -> Result<FetchedMetrics>;
}

pub trait ServerActions {
    fn reset(&self, server: &Server) -> Result<Action>;
}

pub trait FloatingIpActions {
    fn create(&self, opts: &FloatingIpCreateOpts) -> Result<FloatingIpCreated>;
    fn change_protection(&self, floating_ip: &FloatingIp, delete: bool) -> Result<Action>;
}

pub trait ActionApi {
    fn get_action(&self, id: i64) -> Result<Action>;
}

/// Blocks until an action has finished.
pub trait ActionWaiter {
    fn wait(&self, action: &Action) -> Result<()>;
}
