//! HTTP/HTTPS Connector for the Instrument Registry
//!
//! ## Overview
//!
//! [`HttpLookup`] answers both core lookup traits from a REST/JSON
//! registry: one resource for sensor metadata, one for the per-instrument
//! QC table. Each resource path is a template with a `{sensor_id}`
//! placeholder, so query-style APIs (`/sensors?id=eq.{sensor_id}`) and
//! path-style APIs (`/sensors/{sensor_id}`) are both covered.
//!
//! ## Response Shapes
//!
//! Registries disagree on how a single row comes back, so all of these are
//! accepted:
//! - a JSON array: the first element is used, `[]` means "no record"
//! - a JSON object: the row itself
//! - an empty body, `null` or HTTP 404: "no record"
//!
//! Field names are matched leniently (`type`/`sensor_type`,
//! `tolerance`/`toleransi`, ...) and numeric tolerances are accepted as
//! well as strings.
//!
//! ## Retries
//!
//! 5xx, 429 and transport errors are retried up to `max_retries` times,
//! waiting `retry_delay × attempt` between attempts. Other 4xx statuses
//! fail immediately. Requests are blocking; the agent pools connections.
//!
//! ## Example Usage
//!
//! ```no_run
//! use metcal_connectors::http::{HttpConfig, HttpLookup};
//! use metcal_core::QcTableLookup;
//!
//! let config = HttpConfig::new("https://registry.example.org/api")
//!     .bearer_token("your-api-token")
//!     .timeout_secs(10)
//!     .max_retries(2);
//!
//! let lookup = HttpLookup::new(config)?;
//! if let Some(record) = lookup.qc_record("sensor-7")? {
//!     println!("{}: {:?}", record.instrument_name, record.tolerance_raw);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::ConnectionStats;
use base64::Engine;
use metcal_core::{LookupError, LookupResult, QcRecord, QcTableLookup, SensorDirectory, SensorMetadata};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Write;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;

/// Placeholder substituted with the percent-encoded sensor id
pub const SENSOR_ID_PLACEHOLDER: &str = "{sensor_id}";

/// HTTP-specific errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HttpError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Server returned error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Response body was not a decodable record
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<HttpError> for LookupError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Serialization(reason) => LookupError::InvalidResponse { reason },
            other => LookupError::Transport {
                reason: other.to_string(),
            },
        }
    }
}

/// HTTP configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Authentication method
    pub auth: AuthMethod,
    /// Custom headers
    pub headers: HashMap<String, String>,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Backoff unit, multiplied by the attempt number
    pub retry_delay: Duration,
    /// User agent string
    pub user_agent: String,
    /// Sensor metadata resource, relative to `base_url`
    pub sensor_path: String,
    /// QC table resource, relative to `base_url`
    pub qc_path: String,
}

/// Authentication methods
#[derive(Debug, Clone, PartialEq)]
pub enum AuthMethod {
    /// No authentication
    None,
    /// Bearer token
    Bearer(String),
    /// Basic authentication
    Basic { username: String, password: String },
    /// API key in header
    ApiKey { header: String, value: String },
}

impl AuthMethod {
    /// Header carrying the credentials, if any
    pub fn header(&self) -> Option<(String, String)> {
        match self {
            AuthMethod::None => None,
            AuthMethod::Bearer(token) => Some(("Authorization".into(), format!("Bearer {}", token))),
            AuthMethod::Basic { username, password } => {
                let credentials = base64::engine::general_purpose::STANDARD
                    .encode(format!("{}:{}", username, password));
                Some(("Authorization".into(), format!("Basic {}", credentials)))
            }
            AuthMethod::ApiKey { header, value } => Some((header.clone(), value.clone())),
        }
    }
}

impl HttpConfig {
    /// Create new configuration with base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            auth: AuthMethod::None,
            headers: HashMap::new(),
            max_retries: 3,
            retry_delay: Duration::from_millis(200),
            user_agent: format!("metcal/{}", env!("CARGO_PKG_VERSION")),
            sensor_path: "/sensors/{sensor_id}".into(),
            qc_path: "/qc-limits/{sensor_id}".into(),
        }
    }

    /// Set bearer token authentication
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = AuthMethod::Bearer(token.into());
        self
    }

    /// Set basic authentication
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Basic {
            username: username.into(),
            password: password.into(),
        };
        self
    }

    /// Set API key authentication
    pub fn api_key(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.auth = AuthMethod::ApiKey {
            header: header.into(),
            value: value.into(),
        };
        self
    }

    /// Set request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Set retry count
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set backoff unit
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Add custom header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the sensor metadata resource template
    pub fn sensor_path(mut self, path: impl Into<String>) -> Self {
        self.sensor_path = path.into();
        self
    }

    /// Set the QC table resource template
    pub fn qc_path(mut self, path: impl Into<String>) -> Self {
        self.qc_path = path.into();
        self
    }

    /// Check URL scheme and resource templates
    pub fn validate(&self) -> Result<(), HttpError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(HttpError::Config("Base URL must start with http:// or https://".into()));
        }
        for (name, path) in [("sensor_path", &self.sensor_path), ("qc_path", &self.qc_path)] {
            if !path.contains(SENSOR_ID_PLACEHOLDER) {
                return Err(HttpError::Config(format!(
                    "{} must contain {}",
                    name, SENSOR_ID_PLACEHOLDER
                )));
            }
        }
        Ok(())
    }

    /// Full URL for a resource template and sensor id
    pub fn url_for(&self, template: &str, sensor_id: &str) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            template.replace(SENSOR_ID_PLACEHOLDER, &encode_segment(sensor_id))
        )
    }
}

/// Registry lookups over a blocking `ureq` agent
pub struct HttpLookup {
    config: HttpConfig,
    agent: ureq::Agent,
    stats: Mutex<ConnectionStats>,
}

impl HttpLookup {
    /// Create new HTTP lookup
    pub fn new(config: HttpConfig) -> Result<Self, HttpError> {
        config.validate()?;

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Ok(Self {
            config,
            agent,
            stats: Mutex::new(ConnectionStats::default()),
        })
    }

    /// Active configuration
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Snapshot of the request counters
    pub fn stats(&self) -> ConnectionStats {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Fetch and decode the first row of a resource
    fn fetch_row<T: DeserializeOwned>(&self, template: &str, sensor_id: &str) -> Result<Option<T>, HttpError> {
        match self.get_json(&self.config.url_for(template, sensor_id))? {
            Some(body) => first_row(body).map_err(|err| self.fail(err)),
            None => Ok(None),
        }
    }

    /// GET with retry; `None` for 404 and empty bodies
    fn get_json(&self, url: &str) -> Result<Option<Value>, HttpError> {
        let request = self.build_request(self.agent.get(url));
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                self.record(|stats| stats.retries += 1);
                std::thread::sleep(self.config.retry_delay * attempt);
            }

            match request.clone().call() {
                Ok(resp) => {
                    let text = match resp.into_string() {
                        Ok(text) => text,
                        Err(e) => return Err(self.fail(HttpError::Request(e.to_string()))),
                    };
                    self.record(|stats| {
                        stats.requests_sent += 1;
                        stats.bytes_received += text.len() as u64;
                    });

                    if text.trim().is_empty() {
                        return Ok(None);
                    }
                    return serde_json::from_str(&text)
                        .map(Some)
                        .map_err(|e| self.fail(HttpError::Serialization(e.to_string())));
                }
                Err(ureq::Error::Status(404, _)) => {
                    self.record(|stats| stats.requests_sent += 1);
                    return Ok(None);
                }
                Err(ureq::Error::Status(code @ (401 | 403), resp)) => {
                    let message = resp.into_string().unwrap_or_default();
                    return Err(self.fail(HttpError::Auth(format!("{} {}", code, message))));
                }
                Err(ureq::Error::Status(code, resp)) if code >= 500 || code == 429 => {
                    log::debug!("GET {} answered {}, attempt {}", url, code, attempt + 1);
                    last_error = Some(HttpError::ServerError {
                        status: code,
                        message: resp.into_string().unwrap_or_default(),
                    });
                }
                Err(ureq::Error::Status(code, resp)) => {
                    return Err(self.fail(HttpError::ServerError {
                        status: code,
                        message: resp.into_string().unwrap_or_default(),
                    }));
                }
                Err(ureq::Error::Transport(e)) => {
                    log::debug!("GET {} failed: {}, attempt {}", url, e, attempt + 1);
                    last_error = Some(HttpError::Request(e.to_string()));
                }
            }
        }

        let err = last_error.unwrap_or_else(|| HttpError::Request("no attempt made".into()));
        log::warn!("GET {} gave up after {} retries: {}", url, self.config.max_retries, err);
        Err(self.fail(err))
    }

    /// Build request with authentication and headers
    fn build_request(&self, mut request: ureq::Request) -> ureq::Request {
        if let Some((name, value)) = self.config.auth.header() {
            request = request.set(&name, &value);
        }
        for (name, value) in &self.config.headers {
            request = request.set(name, value);
        }
        request.set("Accept", "application/json")
    }

    fn record(&self, update: impl FnOnce(&mut ConnectionStats)) {
        update(&mut self.stats.lock().unwrap_or_else(PoisonError::into_inner));
    }

    fn fail(&self, err: HttpError) -> HttpError {
        self.record(|stats| {
            stats.requests_failed += 1;
            stats.last_error = Some(err.to_string());
        });
        err
    }
}

impl SensorDirectory for HttpLookup {
    fn sensor(&self, sensor_id: &str) -> LookupResult<Option<SensorMetadata>> {
        let row: Option<SensorRow> = self.fetch_row(&self.config.sensor_path, sensor_id)?;
        Ok(row.map(SensorMetadata::from))
    }
}

impl QcTableLookup for HttpLookup {
    fn qc_record(&self, sensor_id: &str) -> LookupResult<Option<QcRecord>> {
        let row: Option<QcRow> = self.fetch_row(&self.config.qc_path, sensor_id)?;
        Ok(row.map(QcRecord::from))
    }
}

/// Sensor row as served by the registry
#[derive(Debug, Deserialize)]
struct SensorRow {
    #[serde(alias = "sensor_name", default)]
    name: String,
    #[serde(rename = "type", alias = "sensor_type", default)]
    sensor_type: String,
    #[serde(alias = "instrument", default)]
    instrument_id: Option<Value>,
    #[serde(alias = "standard", default)]
    is_standard: Option<bool>,
}

impl From<SensorRow> for SensorMetadata {
    fn from(row: SensorRow) -> Self {
        let mut sensor = SensorMetadata::new(row.name, row.sensor_type);
        sensor.instrument_id = row.instrument_id.and_then(text);
        sensor.is_standard = row.is_standard.unwrap_or(false);
        sensor
    }
}

/// QC table row as served by the registry
#[derive(Debug, Deserialize)]
struct QcRow {
    #[serde(alias = "instrument", alias = "nama_alat", default)]
    instrument_name: String,
    #[serde(alias = "tolerance", alias = "toleransi", default)]
    tolerance_raw: Option<Value>,
    #[serde(alias = "satuan", default)]
    unit: Option<String>,
    #[serde(alias = "id", default)]
    record_id: Option<Value>,
}

impl From<QcRow> for QcRecord {
    fn from(row: QcRow) -> Self {
        QcRecord {
            instrument_name: row.instrument_name,
            tolerance_raw: row.tolerance_raw.and_then(text),
            unit: row.unit.unwrap_or_default(),
            record_id: row.record_id.and_then(text),
        }
    }
}

/// Scalar JSON value as text; `null` and containers yield `None`
fn text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Decode the single row of an array-or-object response
fn first_row<T: DeserializeOwned>(body: Value) -> Result<Option<T>, HttpError> {
    let row = match body {
        Value::Null => return Ok(None),
        Value::Array(rows) => match rows.into_iter().next() {
            Some(row) => row,
            None => return Ok(None),
        },
        row @ Value::Object(_) => row,
        other => {
            return Err(HttpError::Serialization(format!(
                "expected a JSON object or array, got {}",
                other
            )))
        }
    };
    serde_json::from_value(row)
        .map(Some)
        .map_err(|e| HttpError::Serialization(e.to_string()))
}

/// Percent-encode everything outside the unreserved set
fn encode_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(byte as char),
            _ => {
                let _ = write!(out, "%{:02X}", byte);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_builder() {
        let config = HttpConfig::new("https://api.example.com")
            .bearer_token("test-token")
            .timeout_secs(60)
            .max_retries(5)
            .header("X-Custom", "value");

        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.max_retries, 5);
        assert!(config.headers.contains_key("X-Custom"));

        match config.auth {
            AuthMethod::Bearer(token) => assert_eq!(token, "test-token"),
            _ => panic!("Wrong auth method"),
        }
    }

    #[test]
    fn test_url_validation() {
        let result = HttpLookup::new(HttpConfig::new("not-a-url"));
        assert!(result.is_err());

        let result = HttpLookup::new(HttpConfig::new("https://valid.url"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_path_template_validation() {
        let config = HttpConfig::new("https://valid.url").qc_path("/master_qc");
        assert!(matches!(config.validate(), Err(HttpError::Config(msg)) if msg.contains("qc_path")));
    }

    #[test]
    fn test_url_for() {
        let config = HttpConfig::new("https://registry.example.org/rest/v1/");
        assert_eq!(
            config.url_for("/sensors?id=eq.{sensor_id}", "AWS 01/T"),
            "https://registry.example.org/rest/v1/sensors?id=eq.AWS%2001%2FT"
        );
        assert_eq!(
            config.url_for(&config.qc_path, "t-01"),
            "https://registry.example.org/rest/v1/qc-limits/t-01"
        );
    }

    #[test]
    fn test_auth_headers() {
        let basic = AuthMethod::Basic {
            username: "qc".into(),
            password: "secret".into(),
        };
        assert_eq!(
            basic.header(),
            Some(("Authorization".into(), "Basic cWM6c2VjcmV0".into()))
        );
        assert_eq!(AuthMethod::None.header(), None);
        let key = AuthMethod::ApiKey {
            header: "apikey".into(),
            value: "k".into(),
        };
        assert_eq!(key.header(), Some(("apikey".into(), "k".into())));
    }

    #[test]
    fn test_decode_sensor_shapes() {
        let array = json!([{ "name": "Sensor Suhu", "type": "Termometer", "instrument_id": 12 }]);
        let row: SensorRow = first_row(array).unwrap().unwrap();
        let sensor = SensorMetadata::from(row);
        assert_eq!(sensor.sensor_type, "Termometer");
        assert_eq!(sensor.instrument_id.as_deref(), Some("12"));
        assert!(!sensor.is_standard);

        let object = json!({ "sensor_name": "Barometer", "sensor_type": "Tekanan", "is_standard": true });
        let sensor = SensorMetadata::from(first_row::<SensorRow>(object).unwrap().unwrap());
        assert_eq!(sensor.name, "Barometer");
        assert!(sensor.is_standard);

        assert!(first_row::<SensorRow>(json!([])).unwrap().is_none());
        assert!(first_row::<SensorRow>(Value::Null).unwrap().is_none());
    }

    #[test]
    fn test_decode_qc_record() {
        let body = json!([{ "id": 7, "nama_alat": "Barometer Digital", "toleransi": "± 0.3", "satuan": "hPa" }]);
        let record = QcRecord::from(first_row::<QcRow>(body).unwrap().unwrap());
        assert_eq!(record.instrument_name, "Barometer Digital");
        assert_eq!(record.tolerance_raw.as_deref(), Some("± 0.3"));
        assert_eq!(record.unit, "hPa");
        assert_eq!(record.record_id.as_deref(), Some("7"));

        let numeric = json!({ "instrument_name": "Termometer", "tolerance": 0.2 });
        let record = QcRecord::from(first_row::<QcRow>(numeric).unwrap().unwrap());
        assert_eq!(record.tolerance_raw.as_deref(), Some("0.2"));
        assert_eq!(record.unit, "");

        let missing = json!({ "instrument_name": "Anemometer", "tolerance": null });
        let record = QcRecord::from(first_row::<QcRow>(missing).unwrap().unwrap());
        assert_eq!(record.tolerance_raw, None);
    }

    #[test]
    fn test_decode_rejects_scalars() {
        let err = first_row::<QcRow>(json!(42)).unwrap_err();
        assert!(matches!(err, HttpError::Serialization(_)));
        assert!(matches!(
            LookupError::from(err),
            LookupError::InvalidResponse { .. }
        ));
    }

    #[test]
    fn test_transport_errors_map_to_lookup_transport() {
        let err = LookupError::from(HttpError::ServerError {
            status: 503,
            message: "maintenance".into(),
        });
        assert_eq!(
            err,
            LookupError::Transport {
                reason: "Server error 503: maintenance".into()
            }
        );
    }

    /// Answer exactly one request on a local socket with a fixed 200 body
    fn serve_once(body: &'static str) -> String {
        use std::io::{Read, Write as _};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut request = Vec::new();
                let mut buf = [0u8; 512];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_undecodable_body_counts_as_failure() {
        let lookup = HttpLookup::new(HttpConfig::new(serve_once("{not json")).max_retries(0)).unwrap();
        let err = lookup.qc_record("t-01").unwrap_err();
        assert!(matches!(err, LookupError::InvalidResponse { .. }));

        let stats = lookup.stats();
        assert_eq!(stats.requests_sent, 1);
        assert_eq!(stats.requests_failed, 1);
        assert!(stats.last_error.unwrap().contains("Serialization"));
    }

    #[test]
    fn test_unexpected_shape_counts_as_failure() {
        let lookup = HttpLookup::new(HttpConfig::new(serve_once("42")).max_retries(0)).unwrap();
        assert!(lookup.sensor("t-01").is_err());
        assert_eq!(lookup.stats().requests_failed, 1);
    }

    #[test]
    fn test_record_decoded_from_live_response() {
        let body = r#"[{"nama_alat":"Barometer Digital","toleransi":"± 0,300","satuan":"hPa"}]"#;
        let lookup = HttpLookup::new(HttpConfig::new(serve_once(body))).unwrap();
        let record = lookup.qc_record("p-01").unwrap().unwrap();
        assert_eq!(record.tolerance_raw.as_deref(), Some("± 0,300"));
        assert_eq!(lookup.stats().requests_failed, 0);
    }

    #[test]
    fn test_stats_start_empty() {
        let lookup = HttpLookup::new(HttpConfig::new("http://localhost:9")).unwrap();
        assert_eq!(lookup.stats(), ConnectionStats::default());
    }
}
