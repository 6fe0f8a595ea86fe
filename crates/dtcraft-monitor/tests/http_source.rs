use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::Query, http::StatusCode, routing::get, Router};
use tokio::net::TcpListener;

use dtcraft_monitor::{
    ClusterView, HttpSourceConfig, HttpStatusSource, PollerConfig, ResponseFormat, SourceError,
    StatusPoller, StatusSource,
};

const STATUS: &str = r#"{
    "master": {"host": "10.1.0.1", "num_agents": 1, "num_graphs": 4},
    "agents": [{
        "host": "10.1.0.9",
        "resource": {"num_cpus": 16, "memory_limit_in_bytes": 64000000000, "space_limit_in_bytes": 2000000000000},
        "released": {"num_cpus": 12, "memory_limit_in_bytes": 48000000000, "space_limit_in_bytes": 1500000000000},
        "num_tasks": 2
    }]
}"#;

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Mimics the master: wraps the payload in the callback named by `jsonp`.
async fn jsonp_cluster(Query(params): Query<HashMap<String, String>>) -> (StatusCode, String) {
    match params.get("jsonp") {
        Some(callback) if callback.contains("callback") => {
            (StatusCode::OK, format!("{callback}({STATUS})"))
        }
        _ => (StatusCode::NOT_FOUND, String::new()),
    }
}

fn source(base_url: String, format: ResponseFormat) -> HttpStatusSource {
    HttpStatusSource::new(HttpSourceConfig {
        format,
        request_timeout: Duration::from_secs(2),
        ..HttpSourceConfig::new(base_url)
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_jsonp() {
    let base = serve(Router::new().route("/cluster", get(jsonp_cluster))).await;
    let src = source(base, ResponseFormat::default());

    let status = src.fetch().await.unwrap();
    assert_eq!(status.master.host, "10.1.0.1");
    assert_eq!(status.master.num_graphs, 4);
    assert_eq!(status.agents[0].released.num_cpus, 12);
}

#[tokio::test]
async fn test_fetch_plain_json() {
    let base = serve(Router::new().route("/cluster", get(|| async { STATUS }))).await;
    let src = source(format!("{base}/"), ResponseFormat::Json);

    assert_eq!(src.url(), format!("{base}/cluster"));
    let status = src.fetch().await.unwrap();
    assert_eq!(status.agents.len(), 1);
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let base = serve(Router::new().route("/cluster", get(jsonp_cluster))).await;
    let src = source(
        base,
        ResponseFormat::Jsonp {
            callback: "cb".to_string(),
        },
    );

    match src.fetch().await {
        Err(SourceError::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let app = Router::new().route("/cluster", get(|| async { r#"{"master": {}}"# }));
    let base = serve(app).await;
    let src = source(base, ResponseFormat::Json);

    assert!(matches!(src.fetch().await, Err(SourceError::Decode(_))));
}

#[tokio::test]
async fn test_unreachable_master_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let src = source(format!("http://{addr}"), ResponseFormat::Json);
    assert!(matches!(
        src.fetch().await,
        Err(SourceError::Transport { .. })
    ));
}

#[tokio::test]
async fn test_poller_keeps_view_across_outage() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    // First request succeeds, every later one fails.
    let app = Router::new().route(
        "/cluster",
        get(move || {
            let counter = counter.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    (StatusCode::OK, STATUS.to_string())
                } else {
                    (StatusCode::SERVICE_UNAVAILABLE, String::new())
                }
            }
        }),
    );
    let base = serve(app).await;

    let view = ClusterView::new();
    let mut rx = view.subscribe();
    let mut poller = StatusPoller::new(
        Arc::new(source(base, ResponseFormat::Json)),
        view.clone(),
        PollerConfig {
            interval: Duration::from_millis(10),
        },
    );
    poller.start();

    tokio::time::timeout(Duration::from_secs(2), rx.changed())
        .await
        .unwrap()
        .unwrap();
    let loaded = view.snapshot();

    while hits.load(Ordering::SeqCst) < 4 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    poller.stop().await;

    // let a request that was already on the wire land before counting
    tokio::time::sleep(Duration::from_millis(50)).await;
    let after_stop = hits.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(view.snapshot(), loaded);
    assert_eq!(loaded.master.unwrap().host, "10.1.0.1");
    assert_eq!(hits.load(Ordering::SeqCst), after_stop);
}
