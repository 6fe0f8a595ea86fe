use std::time::Duration;

use async_trait::async_trait;
use dtcraft_common::ClusterStatus;

use crate::error::SourceError;

/// Callback name sent in JSONP mode. The master only treats a request as a
/// data query when its query string contains `callback`.
pub const DEFAULT_JSONP_CALLBACK: &str = "dtcraft_callback";

/// Anything that can produce a cluster status snapshot.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self) -> Result<ClusterStatus, SourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Plain `application/json` body.
    Json,
    /// `GET /cluster?jsonp=<callback>` answered with `<callback>(<json>)`.
    Jsonp { callback: String },
}

impl Default for ResponseFormat {
    fn default() -> Self {
        ResponseFormat::Jsonp {
            callback: DEFAULT_JSONP_CALLBACK.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    pub base_url: String,
    pub format: ResponseFormat,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl HttpSourceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9912".to_string(),
            format: ResponseFormat::default(),
            connect_timeout: Duration::from_secs(3),
            request_timeout: Duration::from_secs(5),
        }
    }
}

/// Fetches `/cluster` from the master's web UI listener.
#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    client: reqwest::Client,
    url: String,
    format: ResponseFormat,
}

impl HttpStatusSource {
    pub fn new(config: HttpSourceConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(SourceError::Client)?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: reqwest::Client, config: HttpSourceConfig) -> Self {
        Self {
            client,
            url: cluster_url(&config.base_url),
            format: config.format,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn request(&self) -> reqwest::RequestBuilder {
        let req = self.client.get(&self.url);
        match &self.format {
            ResponseFormat::Json => req.header(reqwest::header::ACCEPT, "application/json"),
            ResponseFormat::Jsonp { callback } => req.query(&[("jsonp", callback)]),
        }
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch(&self) -> Result<ClusterStatus, SourceError> {
        let transport = |source| SourceError::Transport {
            url: self.url.clone(),
            source,
        };

        let resp = self.request().send().await.map_err(transport)?;
        if !resp.status().is_success() {
            return Err(SourceError::Status {
                url: self.url.clone(),
                status: resp.status().as_u16(),
            });
        }

        let body = resp.text().await.map_err(transport)?;
        decode_body(&body, &self.format)
    }
}

fn cluster_url(base_url: &str) -> String {
    format!("{}/cluster", base_url.trim_end_matches('/'))
}

/// Parse a `/cluster` response body. In JSONP mode a body wrapped in the
/// expected callback is unwrapped first; a bare JSON body is accepted either
/// way.
pub fn decode_body(body: &str, format: &ResponseFormat) -> Result<ClusterStatus, SourceError> {
    let json = match format {
        ResponseFormat::Jsonp { callback } => unwrap_jsonp(body, callback).unwrap_or(body),
        ResponseFormat::Json => body,
    };
    Ok(serde_json::from_str(json.trim())?)
}

/// Strip `callback( ... )` (optionally followed by `;`) from a JSONP body.
pub fn unwrap_jsonp<'a>(body: &'a str, callback: &str) -> Option<&'a str> {
    let inner = body
        .trim()
        .strip_prefix(callback)?
        .trim_start()
        .strip_prefix('(')?
        .trim_end();
    let inner = inner.strip_suffix(';').unwrap_or(inner).trim_end();
    inner.strip_suffix(')')
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &str = r#"{"master":{"host":"m","num_agents":0,"num_graphs":0},"agents":[]}"#;

    #[test]
    fn test_unwrap_jsonp() {
        let body = format!("cb({STATUS})");
        assert_eq!(unwrap_jsonp(&body, "cb"), Some(STATUS));

        let body = format!("  cb ( {STATUS} );\n");
        assert_eq!(unwrap_jsonp(&body, "cb").map(str::trim), Some(STATUS));

        assert_eq!(unwrap_jsonp(STATUS, "cb"), None);
        assert_eq!(unwrap_jsonp("other({})", "cb"), None);
        assert_eq!(unwrap_jsonp("cb({}", "cb"), None);
    }

    #[test]
    fn test_decode_body_accepts_both_forms() {
        let jsonp = ResponseFormat::Jsonp {
            callback: "cb".to_string(),
        };
        let wrapped = format!("cb({STATUS})");
        assert_eq!(decode_body(&wrapped, &jsonp).unwrap().master.host, "m");
        assert_eq!(decode_body(STATUS, &jsonp).unwrap().master.host, "m");
        assert_eq!(decode_body(STATUS, &ResponseFormat::Json).unwrap().agents.len(), 0);
    }

    #[test]
    fn test_decode_body_fails_closed() {
        let jsonp = ResponseFormat::default();
        assert!(matches!(
            decode_body("dtcraft_callback({\"master\":null})", &jsonp),
            Err(SourceError::Decode(_))
        ));
        assert!(matches!(
            decode_body("cb(1)", &ResponseFormat::Json),
            Err(SourceError::Decode(_))
        ));
        assert!(matches!(decode_body("", &jsonp), Err(SourceError::Decode(_))));
    }

    #[test]
    fn test_cluster_url() {
        assert_eq!(cluster_url("http://h:9912"), "http://h:9912/cluster");
        assert_eq!(cluster_url("http://h:9912/"), "http://h:9912/cluster");
    }
}
