//! Integration tests for the metrics endpoint
//!
//! These tests verify that:
//! - The export is valid exposition text with the expected names and labels
//! - Counters and histogram counts never decrease between exports

use std::collections::HashMap;
use std::time::Duration;

use uptime_monitor::Endpoint;
use wiremock::MockServer;

use crate::helpers::*;

const TIMEOUT: Duration = Duration::from_secs(5);

/// One sample line: `name{label="value",...} number`
#[derive(Debug)]
struct Sample {
    name: String,
    labels: HashMap<String, String>,
    value: f64,
}

fn parse_exposition(text: &str) -> Vec<Sample> {
    text.lines()
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            let (series, value) = line.rsplit_once(' ').expect("sample without value");
            let value: f64 = value.parse().expect("non-numeric sample value");

            let (name, labels) = match series.split_once('{') {
                Some((name, rest)) => {
                    let body = rest.strip_suffix('}').expect("unterminated label set");
                    let labels = body
                        .split("\",")
                        .filter(|pair| !pair.is_empty())
                        .map(|pair| {
                            let (key, value) = pair.split_once("=\"").expect("malformed label");
                            (key.to_string(), value.trim_end_matches('"').to_string())
                        })
                        .collect();
                    (name.to_string(), labels)
                }
                None => (series.to_string(), HashMap::new()),
            };

            Sample {
                name,
                labels,
                value,
            }
        })
        .collect()
}

fn find(samples: &[Sample], name: &str, url: &Endpoint) -> Option<f64> {
    samples
        .iter()
        .find(|sample| {
            sample.name == name
                && sample.labels.get("url").map(String::as_str) == Some(url.as_str())
        })
        .map(|sample| sample.value)
}

#[tokio::test]
async fn test_metrics_names_and_labels() {
    let mock_server = MockServer::start().await;
    let up = mount_status(&mock_server, "/ok", 200).await;
    let down = unreachable_endpoint();

    let monitor = spawn_test_monitor(vec![up.clone(), down.clone()], TIMEOUT).await;
    get_json(&monitor.url("/status")).await;

    let text = get_text(&monitor.url("/metrics")).await;
    assert!(text.contains("# TYPE uptime_check_success_total counter"));
    assert!(text.contains("# TYPE uptime_check_failure_total counter"));
    assert!(text.contains("# TYPE uptime_check_duration_seconds histogram"));

    let samples = parse_exposition(&text);
    assert!(!samples.is_empty());

    for sample in &samples {
        match sample.name.as_str() {
            "uptime_check_success_total"
            | "uptime_check_failure_total"
            | "uptime_check_duration_seconds_sum"
            | "uptime_check_duration_seconds_count" => {
                assert_eq!(sample.labels.len(), 1, "unexpected labels on {sample:?}");
                assert!(sample.labels.contains_key("url"));
            }
            "uptime_check_duration_seconds_bucket" => {
                assert_eq!(sample.labels.len(), 2, "unexpected labels on {sample:?}");
                assert!(sample.labels.contains_key("url"));
                assert!(sample.labels.contains_key("le"));
            }
            other => panic!("unexpected metric {other}"),
        }
    }

    assert_eq!(find(&samples, "uptime_check_success_total", &up), Some(1.0));
    assert_eq!(find(&samples, "uptime_check_failure_total", &down), Some(1.0));
    assert_eq!(find(&samples, "uptime_check_duration_seconds_count", &up), Some(1.0));
    assert_eq!(find(&samples, "uptime_check_duration_seconds_count", &down), None);
    assert_eq!(find(&samples, "uptime_check_success_total", &down), None);
}

#[tokio::test]
async fn test_metrics_are_monotonic() {
    let mock_server = MockServer::start().await;
    let up = mount_status(&mock_server, "/ok", 200).await;
    let down = unreachable_endpoint();

    let monitor = spawn_test_monitor(vec![up.clone(), down.clone()], TIMEOUT).await;

    let mut previous: Option<Vec<Sample>> = None;
    for _ in 0..3 {
        get_json(&monitor.url("/status")).await;
        let samples = parse_exposition(&get_text(&monitor.url("/metrics")).await);

        if let Some(previous) = &previous {
            for sample in previous {
                let current = samples
                    .iter()
                    .find(|s| s.name == sample.name && s.labels == sample.labels)
                    .expect("series disappeared between exports");
                assert!(
                    current.value >= sample.value,
                    "{} decreased: {} -> {}",
                    sample.name,
                    sample.value,
                    current.value
                );
            }
        }

        previous = Some(samples);
    }

    let samples = previous.unwrap();
    assert_eq!(find(&samples, "uptime_check_success_total", &up), Some(3.0));
    assert_eq!(find(&samples, "uptime_check_failure_total", &down), Some(3.0));
}
