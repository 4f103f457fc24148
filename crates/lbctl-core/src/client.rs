use crate::api::{ActionApi, FloatingIpActions, MetricsApi, ResourceDirectory, ServerActions};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::metrics::MetricQuery;
use crate::models::{
    Action, FetchedMetrics, FloatingIp, FloatingIpCreateOpts, FloatingIpCreated, LoadBalancer,
    MetricSeries, MetricsResult, RawResponseBody, Server, TimeWindow,
};
use crate::timeutils::{format_rfc3339, parse_rfc3339, utc_from_unix_seconds};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Blocking REST client for the cloud API.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("lbctl/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    fn send(&self, request: RequestBuilder) -> Result<RawResponseBody> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send()?;
        let status = response.status();
        let body = response.bytes()?;
        debug!(status = status.as_u16(), bytes = body.len(), "api response");
        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }
        Ok(RawResponseBody::new(body.to_vec()))
    }

    fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(T, RawResponseBody)> {
        debug!(path, "GET");
        let raw = self.send(self.http.get(self.url(path)).query(query))?;
        Ok((decode(&raw)?, raw))
    }

    fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<(T, RawResponseBody)> {
        debug!(path, "POST");
        let mut request = self.http.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let raw = self.send(request)?;
        Ok((decode(&raw)?, raw))
    }

    /// ID lookup first when the input is numeric, then a `?name=` search.
    fn lookup<One, Many, R>(
        &self,
        collection: &str,
        id_or_name: &str,
        one: impl FnOnce(One) -> R,
        many: impl FnOnce(Many) -> Vec<R>,
    ) -> Result<Option<R>>
    where
        One: DeserializeOwned,
        Many: DeserializeOwned,
    {
        if let Ok(id) = id_or_name.parse::<i64>() {
            match self.get::<One>(&format!("/{collection}/{id}"), &[]) {
                Ok((found, _)) => return Ok(Some(one(found))),
                Err(Error::Api { status: 404, .. }) => {}
                Err(err) => return Err(err),
            }
        }
        let (list, _) =
            self.get::<Many>(&format!("/{collection}"), &[("name", id_or_name.to_string())])?;
        Ok(many(list).into_iter().next())
    }
}

fn decode<T: DeserializeOwned>(raw: &RawResponseBody) -> Result<T> {
    serde_json::from_slice(raw.as_bytes()).map_err(|e| Error::MalformedResponse(e.to_string()))
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorSchema,
}

#[derive(Deserialize)]
struct ErrorSchema {
    code: String,
    message: String,
}

fn api_error(status: u16, body: &[u8]) -> Error {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) => Error::Api {
            status,
            code: envelope.error.code,
            message: envelope.error.message,
        },
        Err(_) => Error::Api {
            status,
            code: "http_error".into(),
            message: String::from_utf8_lossy(body).trim().to_string(),
        },
    }
}

#[derive(Deserialize)]
struct LoadBalancerEnvelope {
    load_balancer: LoadBalancer,
}

#[derive(Deserialize)]
struct LoadBalancerList {
    load_balancers: Vec<LoadBalancer>,
}

#[derive(Deserialize)]
struct ServerEnvelope {
    server: Server,
}

#[derive(Deserialize)]
struct ServerList {
    servers: Vec<Server>,
}

#[derive(Deserialize)]
struct ActionEnvelope {
    action: Action,
}

#[derive(Deserialize)]
struct FloatingIpCreateResponse {
    floating_ip: FloatingIp,
    #[serde(default)]
    action: Option<Action>,
}

#[derive(Serialize)]
struct ChangeProtectionRequest {
    delete: bool,
}

#[derive(Deserialize)]
struct MetricsEnvelope {
    metrics: MetricsSchema,
}

#[derive(Deserialize)]
struct MetricsSchema {
    start: String,
    end: String,
    #[serde(default)]
    time_series: HashMap<String, TimeSeriesSchema>,
}

#[derive(Deserialize)]
struct TimeSeriesSchema {
    #[serde(default)]
    values: Vec<(f64, String)>,
}

/// Decodes a `/metrics` response body into typed series.
pub fn parse_metrics_response(body: &[u8]) -> Result<MetricsResult> {
    let envelope: MetricsEnvelope =
        serde_json::from_slice(body).map_err(|e| Error::MalformedResponse(e.to_string()))?;
    let metrics = envelope.metrics;
    let window = TimeWindow {
        start: parse_response_time("start", &metrics.start)?,
        end: parse_response_time("end", &metrics.end)?,
    };
    let mut result = MetricsResult::new(window);
    for (name, schema) in metrics.time_series {
        let mut series = MetricSeries::new(name.as_str());
        for (ts, value) in schema.values {
            let timestamp = utc_from_unix_seconds(ts).ok_or_else(|| {
                Error::MalformedResponse(format!("invalid sample timestamp {ts} in {name}"))
            })?;
            series.push(timestamp, value);
        }
        result.insert(series);
    }
    Ok(result)
}

fn parse_response_time(field: &str, value: &str) -> Result<time::OffsetDateTime> {
    parse_rfc3339(value)
        .ok_or_else(|| Error::MalformedResponse(format!("invalid {field} timestamp: {value}")))
}

impl ResourceDirectory<LoadBalancer> for HttpClient {
    fn resolve(&self, id_or_name: &str) -> Result<Option<LoadBalancer>> {
        self.lookup(
            "load_balancers",
            id_or_name,
            |e: LoadBalancerEnvelope| e.load_balancer,
            |l: LoadBalancerList| l.load_balancers,
        )
    }
}

impl ResourceDirectory<Server> for HttpClient {
    fn resolve(&self, id_or_name: &str) -> Result<Option<Server>> {
        self.lookup(
            "servers",
            id_or_name,
            |e: ServerEnvelope| e.server,
            |l: ServerList| l.servers,
        )
    }
}

impl MetricsApi for HttpClient {
    fn fetch_metrics(
        &self,
        load_balancer: &LoadBalancer,
        query: &MetricQuery,
    ) -> Result<FetchedMetrics> {
        let path = format!("/load_balancers/{}/metrics", load_balancer.id);
        let params = [
            ("type", query.type_param()),
            ("start", format_rfc3339(query.window.start)),
            ("end", format_rfc3339(query.window.end)),
        ];
        debug!(path = %path, "GET");
        let raw = self.send(self.http.get(self.url(&path)).query(&params))?;
        let result = parse_metrics_response(raw.as_bytes())?;
        Ok(FetchedMetrics { result, raw })
    }
}

impl ServerActions for HttpClient {
    fn reset(&self, server: &Server) -> Result<Action> {
        let (envelope, _) = self.post::<ActionEnvelope, ()>(
            &format!("/servers/{}/actions/reset", server.id),
            None,
        )?;
        Ok(envelope.action)
    }
}

impl FloatingIpActions for HttpClient {
    fn create(&self, opts: &FloatingIpCreateOpts) -> Result<FloatingIpCreated> {
        let (response, raw) =
            self.post::<FloatingIpCreateResponse, _>("/floating_ips", Some(opts))?;
        Ok(FloatingIpCreated {
            floating_ip: response.floating_ip,
            action: response.action,
            raw,
        })
    }

    fn change_protection(&self, floating_ip: &FloatingIp, delete: bool) -> Result<Action> {
        let (envelope, _) = self.post::<ActionEnvelope, _>(
            &format!("/floating_ips/{}/actions/change_protection", floating_ip.id),
            Some(&ChangeProtectionRequest { delete }),
        )?;
        Ok(envelope.action)
    }
}

impl ActionApi for HttpClient {
    fn get_action(&self, id: i64) -> Result<Action> {
        let (envelope, _) = self.get::<ActionEnvelope>(&format!("/actions/{id}"), &[])?;
        Ok(envelope.action)
    }
}
