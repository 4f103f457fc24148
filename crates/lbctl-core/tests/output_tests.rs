mod common;

use common::{result_with, series};
use lbctl_core::output::{dispatch, OutputMode, StructuredFormat};
use lbctl_core::{Error, FetchedMetrics, RawResponseBody};
use serde_json::{json, Value};

const RAW: &str = r#"{"metrics":{"start":"t0","end":"t1","time_series":{}}}"#;

fn fetched(raw: &str) -> FetchedMetrics {
    FetchedMetrics {
        result: result_with(vec![series("a", &["1", "2"])]),
        raw: RawResponseBody::from(raw),
    }
}

fn run(mode: OutputMode, raw: &str) -> (lbctl_core::Result<()>, String) {
    let mut out = Vec::new();
    let res = dispatch(mode, "lb1", fetched(raw), &mut out);
    (res, String::from_utf8(out).unwrap())
}

#[test]
fn flags_select_mode() {
    use StructuredFormat::*;
    assert_eq!(OutputMode::from_flags(&[]), OutputMode::Graph);
    assert_eq!(OutputMode::from_flags(&[Yaml]), OutputMode::Passthrough(Yaml));
    assert_eq!(OutputMode::from_flags(&[Json]), OutputMode::Passthrough(Json));
    assert_eq!(
        OutputMode::from_flags(&[Yaml, Json]),
        OutputMode::Passthrough(Json)
    );
}

#[test]
fn json_passthrough_is_the_decoded_body() {
    let (res, out) = run(OutputMode::Passthrough(StructuredFormat::Json), RAW);
    res.unwrap();
    let value: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value, serde_json::from_str::<Value>(RAW).unwrap());
    assert!(!out.contains("Load Balancer:"));
}

#[test]
fn yaml_passthrough_is_the_decoded_body() {
    let (res, out) = run(OutputMode::Passthrough(StructuredFormat::Yaml), RAW);
    res.unwrap();
    let value: Value = serde_yaml::from_str(&out).unwrap();
    assert_eq!(
        value,
        json!({"metrics": {"start": "t0", "end": "t1", "time_series": {}}})
    );
}

#[test]
fn json_keys_come_out_sorted() {
    let (res, out) = run(
        OutputMode::Passthrough(StructuredFormat::Json),
        r#"{"b":1,"a":2}"#,
    );
    res.unwrap();
    assert_eq!(out, "{\n  \"a\": 2,\n  \"b\": 1\n}\n");
}

#[test]
fn malformed_body_writes_nothing() {
    let (res, out) = run(OutputMode::Passthrough(StructuredFormat::Yaml), "{not json");
    assert!(matches!(res, Err(Error::MalformedResponse(_))));
    assert!(out.is_empty());
}

#[test]
fn graph_mode_ignores_raw_body() {
    let (res, out) = run(OutputMode::Graph, "{not json");
    res.unwrap();
    assert!(out.starts_with("Load Balancer: lb1 \t Metric: a"));
}
