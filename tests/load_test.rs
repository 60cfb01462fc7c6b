//! Load testing for the load balancer.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::http::StatusCode;

mod common;
use crate::common::{client, config_for, start_mock_backend, start_proxy, url};

#[tokio::test]
async fn test_load_performance_and_even_spread() {
    // 1. Setup Mock Backends
    let b1 = start_mock_backend(r#"{"json": {"from": "b1"}}"#).await;
    let b2 = start_mock_backend(r#"{"json": {"from": "b2"}}"#).await;

    // 2. Start Balancer
    let mut config = config_for(&[b1, b2]);
    config.health_check.enabled = false;
    let (proxy, shutdown) = start_proxy(config).await;

    // 3. Run Load Test
    let concurrency = 20;
    let requests_per_task = 25;
    let total_requests = concurrency * requests_per_task;

    let client = client();
    let start = Instant::now();

    let mut tasks = Vec::new();
    for _ in 0..concurrency {
        let client = client.clone();
        let url = url(proxy);
        tasks.push(tokio::spawn(async move {
            let mut results = Vec::new();
            for _ in 0..requests_per_task {
                let req_start = Instant::now();
                if let Ok(res) = client.get(&url).send().await {
                    if res.status() == StatusCode::OK {
                        let server = res
                            .headers()
                            .get("x-forwarded-server")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or_default()
                            .to_string();
                        results.push((server, req_start.elapsed()));
                    }
                }
            }
            results
        }));
    }

    let mut all_latencies = Vec::new();
    let mut per_server: HashMap<String, usize> = HashMap::new();
    for task in tasks {
        for (server, latency) in task.await.unwrap() {
            *per_server.entry(server).or_default() += 1;
            all_latencies.push(latency);
        }
    }

    let duration = start.elapsed();
    let rps = total_requests as f64 / duration.as_secs_f64();

    assert_eq!(all_latencies.len(), total_requests, "Every request should succeed");
    // Selection is serialized, so two always-eligible servers split exactly.
    assert_eq!(per_server.get(&url(b1)), Some(&(total_requests / 2)));
    assert_eq!(per_server.get(&url(b2)), Some(&(total_requests / 2)));

    all_latencies.sort();
    let p50 = all_latencies[all_latencies.len() / 2];
    let p95 = all_latencies[(all_latencies.len() as f64 * 0.95) as usize];
    let p99 = all_latencies[(all_latencies.len() as f64 * 0.99) as usize];
    assert!(p99 < Duration::from_secs(2));

    println!("\n--- Load Test Results ---");
    println!("Total Requests: {}", total_requests);
    println!("Concurrency:    {}", concurrency);
    println!("Total Duration: {:?}", duration);
    println!("Requests/sec:   {:.2}", rps);
    println!("P50 Latency:    {:?}", p50);
    println!("P95 Latency:    {:?}", p95);
    println!("P99 Latency:    {:?}", p99);
    println!("Split:          {:?}", per_server);
    println!("-------------------------\n");

    shutdown.trigger();
}
