use std::time::Duration;

use dtcraft_common::telemetry::TelemetryConfig;
use dtcraft_monitor::{HttpSourceConfig, PollerConfig, ResponseFormat};

use crate::args::Args;

pub fn source_config(args: &Args) -> HttpSourceConfig {
    let format = if args.plain_json {
        ResponseFormat::Json
    } else {
        ResponseFormat::Jsonp {
            callback: args.jsonp_callback.clone(),
        }
    };

    HttpSourceConfig {
        format,
        request_timeout: Duration::from_millis(args.timeout_ms),
        ..HttpSourceConfig::new(args.master_url.clone())
    }
}

pub fn poller_config(interval_ms: u64) -> PollerConfig {
    PollerConfig {
        interval: Duration::from_millis(interval_ms.max(1)),
    }
}

pub fn telemetry_config(args: &Args) -> TelemetryConfig {
    TelemetryConfig {
        otlp_endpoint: args.otlp_endpoint.clone(),
        otlp_token: args.otlp_token.clone(),
        default_filter: "warn".to_string(),
        ..TelemetryConfig::new("dtcraft-cli")
    }
}
