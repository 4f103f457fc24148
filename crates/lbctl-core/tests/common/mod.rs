#![allow(dead_code)]

use lbctl_core::api::{
    ActionApi, ActionWaiter, FloatingIpActions, MetricsApi, ResourceDirectory, ServerActions,
};
use lbctl_core::{
    Action, Error, FetchedMetrics, FloatingIp, FloatingIpCreateOpts, FloatingIpCreated,
    LoadBalancer, MetricQuery, MetricSeries, MetricsResult, RawResponseBody, Result, Server,
    TimeWindow,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use time::macros::datetime;

pub fn window() -> TimeWindow {
    TimeWindow {
        start: datetime!(2024-05-01 10:00 UTC),
        end: datetime!(2024-05-01 10:30 UTC),
    }
}

pub fn series(name: &str, values: &[&str]) -> MetricSeries {
    let mut s = MetricSeries::new(name);
    let start = window().start;
    for (i, v) in values.iter().enumerate() {
        s.push(start + time::Duration::seconds(60 * i as i64), *v);
    }
    s
}

pub fn result_with(series_list: Vec<MetricSeries>) -> MetricsResult {
    let mut result = MetricsResult::new(window());
    for s in series_list {
        result.insert(s);
    }
    result
}

/// In-memory API that records every call it receives.
#[derive(Default)]
pub struct FakeApi {
    pub load_balancers: Vec<LoadBalancer>,
    pub servers: Vec<Server>,
    pub metrics: Option<FetchedMetrics>,
    pub metrics_error: RefCell<Option<Error>>,
    pub created: Option<FloatingIpCreated>,
    pub action_updates: RefCell<VecDeque<Action>>,
    pub calls: RefCell<Vec<String>>,
    pub queries: RefCell<Vec<MetricQuery>>,
    pub create_opts: RefCell<Vec<FloatingIpCreateOpts>>,
}

impl FakeApi {
    pub fn with_load_balancer(id: i64, name: &str) -> Self {
        Self {
            load_balancers: vec![LoadBalancer {
                id,
                name: name.into(),
            }],
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

fn find<'a, T>(
    items: &'a [T],
    id_or_name: &str,
    id: impl Fn(&T) -> i64,
    name: impl Fn(&T) -> &str,
) -> Option<&'a T> {
    let wanted_id = id_or_name.parse::<i64>().ok();
    items
        .iter()
        .find(|item| wanted_id == Some(id(item)) || name(item) == id_or_name)
}

impl ResourceDirectory<LoadBalancer> for FakeApi {
    fn resolve(&self, id_or_name: &str) -> Result<Option<LoadBalancer>> {
        self.record(format!("resolve_load_balancer:{id_or_name}"));
        Ok(find(&self.load_balancers, id_or_name, |l| l.id, |l| l.name.as_str()).cloned())
    }
}

impl ResourceDirectory<Server> for FakeApi {
    fn resolve(&self, id_or_name: &str) -> Result<Option<Server>> {
        self.record(format!("resolve_server:{id_or_name}"));
        Ok(find(&self.servers, id_or_name, |s| s.id, |s| s.name.as_str()).cloned())
    }
}

impl MetricsApi for FakeApi {
    fn fetch_metrics(
        &self,
        load_balancer: &LoadBalancer,
        query: &MetricQuery,
    ) -> Result<FetchedMetrics> {
        self.record(format!("fetch_metrics:{}", load_balancer.id));
        self.queries.borrow_mut().push(query.clone());
        if let Some(err) = self.metrics_error.borrow_mut().take() {
            return Err(err);
        }
        Ok(self.metrics.clone().unwrap_or_else(|| FetchedMetrics {
            result: MetricsResult::new(query.window),
            raw: RawResponseBody::from("{}"),
        }))
    }
}

impl ServerActions for FakeApi {
    fn reset(&self, server: &Server) -> Result<Action> {
        self.record(format!("reset:{}", server.id));
        Ok(Action::running(900, "reset_server"))
    }
}

impl FloatingIpActions for FakeApi {
    fn create(&self, opts: &FloatingIpCreateOpts) -> Result<FloatingIpCreated> {
        self.record("create_floating_ip".into());
        self.create_opts.borrow_mut().push(opts.clone());
        self.created
            .clone()
            .ok_or_else(|| Error::InvalidArgument("no create result configured".into()))
    }

    fn change_protection(&self, floating_ip: &FloatingIp, delete: bool) -> Result<Action> {
        self.record(format!("change_protection:{}:{delete}", floating_ip.id));
        Ok(Action::running(333, "change_protection"))
    }
}

impl ActionApi for FakeApi {
    fn get_action(&self, id: i64) -> Result<Action> {
        self.record(format!("get_action:{id}"));
        self.action_updates
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| Error::InvalidArgument(format!("no update queued for action {id}")))
    }
}

/// Waiter that only records which actions it was asked to wait for.
#[derive(Default)]
pub struct RecordingWaiter {
    pub waited: RefCell<Vec<i64>>,
}

impl ActionWaiter for RecordingWaiter {
    fn wait(&self, action: &Action) -> Result<()> {
        self.waited.borrow_mut().push(action.id);
        Ok(())
    }
}
