//! `load-balancer metrics`: window, query, fetch, then print.

use crate::api::{MetricsApi, ResourceDirectory};
use crate::error::{Error, Result};
use crate::metrics::MetricQuery;
use crate::models::{FetchedMetrics, LoadBalancer};
use crate::output::{dispatch, OutputMode};
use crate::timeutils::{format_rfc3339, resolve_window, Clock};
use std::io::Write;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct MetricsRequest<'a> {
    pub id_or_name: &'a str,
    pub metric_type: &'a str,
    pub start: Option<&'a str>,
    pub end: Option<&'a str>,
    pub mode: OutputMode,
}

/// Resolves the load balancer and issues a single metrics call for `query`.
pub fn fetch_metrics<A>(
    api: &A,
    id_or_name: &str,
    query: &MetricQuery,
) -> Result<(LoadBalancer, FetchedMetrics)>
where
    A: ResourceDirectory<LoadBalancer> + MetricsApi + ?Sized,
{
    let load_balancer = api
        .resolve(id_or_name)?
        .ok_or_else(|| Error::not_found("Load Balancer", id_or_name))?;
    debug!(
        id = load_balancer.id,
        types = %query.type_param(),
        start = %format_rfc3339(query.window.start),
        end = %format_rfc3339(query.window.end),
        "fetching metrics"
    );
    let fetched = api.fetch_metrics(&load_balancer, query)?;
    Ok((load_balancer, fetched))
}

pub fn run_metrics<A, W>(
    api: &A,
    clock: &dyn Clock,
    request: &MetricsRequest<'_>,
    out: &mut W,
) -> Result<()>
where
    A: ResourceDirectory<LoadBalancer> + MetricsApi + ?Sized,
    W: Write,
{
    let window = resolve_window(request.start, request.end, clock)?;
    let query = MetricQuery::build(request.metric_type, window)?;
    let (load_balancer, fetched) = fetch_metrics(api, request.id_or_name, &query)?;
    dispatch(request.mode, &load_balancer.name, fetched, out)
}
