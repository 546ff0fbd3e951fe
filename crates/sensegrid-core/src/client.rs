//! HTTP adapter for the device REST API.
//!
//! This module provides the typed client for the remote device: sensor
//! readings come from `GET /sensors/all`, the LED grid from
//! `GET /leds/get/all`, and full-grid writes go to `POST /leds/set/all`.
//!
//! # Example
//!
//! ```no_run
//! use sensegrid_core::DeviceClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DeviceClient::new("localhost", 8000)?;
//!
//! let snapshot = client.fetch_sensors().await?;
//! println!("{} metrics reported", snapshot.len());
//! # Ok(())
//! # }
//! ```

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

use sensegrid_types::{LedColor, LedGridState, SensorSnapshot};

use crate::error::{Error, Result};
use crate::prefs::ConnectionConfig;
use crate::traits::SenseDevice;

/// Request timeout for all device operations.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Unit selection sent with every sensor fetch.
///
/// The device reports nothing for a metric whose unit parameter is absent,
/// so the client always pins Celsius, hectopascals, and percent.
const SENSOR_UNIT_QUERY: [(&str, &str); 3] = [("t", "c"), ("p", "hpa"), ("h", "perc")];

/// HTTP client for the device API.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    client: Client,
    base_url: String,
}

impl DeviceClient {
    /// Create a new client for `http://{host}:{port}`.
    pub fn new(host: &str, port: u16) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::InvalidAddress(e.to_string()))?;
        Self::with_client(host, port, client)
    }

    /// Create a client from saved connection parameters.
    pub fn from_config(config: &ConnectionConfig) -> Result<Self> {
        Self::new(&config.host, config.port)
    }

    /// Create a client with a custom reqwest [`Client`].
    pub fn with_client(host: &str, port: u16, client: Client) -> Result<Self> {
        let host = host.trim();
        if !Self::is_valid_host(host) {
            return Err(Error::InvalidAddress(format!(
                "host must be a non-empty bare hostname or address, got: {host:?}"
            )));
        }

        Ok(Self {
            client,
            base_url: format!("http://{host}:{port}"),
        })
    }

    /// Whether a string is usable as the host part of the device base URL:
    /// non-empty, with no path separator, port suffix, or whitespace.
    ///
    /// The preferences loader and the settings form apply the same check, so
    /// a host this client would reject is never persisted or loaded.
    pub fn is_valid_host(host: &str) -> bool {
        let host = host.trim();
        !host.is_empty()
            && !host.contains('/')
            && !host.contains(':')
            && !host.contains(char::is_whitespace)
    }

    /// The base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the current sensor values.
    pub async fn fetch_sensors(&self) -> Result<SensorSnapshot> {
        let url = format!("{}/sensors/all", self.base_url);
        let request = self.client.get(&url).query(&SENSOR_UNIT_QUERY);
        let body = Self::read_body(&url, request.send().await).await?;
        parse_json(&url, &body)
    }

    /// Fetch the full LED grid state.
    pub async fn fetch_leds(&self) -> Result<LedGridState> {
        let url = format!("{}/leds/get/all", self.base_url);
        let body = Self::read_body(&url, self.client.get(&url).send().await).await?;
        parse_json(&url, &body)
    }

    /// Push the full LED grid state in one request.
    ///
    /// The device expects the serialized array both as the `arr` query
    /// parameter and as the request body.
    pub async fn set_leds(&self, grid: &[LedColor]) -> Result<()> {
        let url = format!("{}/leds/set/all", self.base_url);
        let payload = serde_json::to_string(grid).map_err(|e| Error::Parse {
            url: url.clone(),
            message: e.to_string(),
        })?;

        let request = self
            .client
            .post(&url)
            .query(&[("arr", payload.as_str())])
            .header(CONTENT_TYPE, "application/json; charset=UTF-8")
            .body(payload.clone());

        Self::read_body(&url, request.send().await).await?;
        Ok(())
    }

    /// Resolve a send result into the response body, mapping transport and
    /// status failures to the client's error taxonomy.
    async fn read_body(
        url: &str,
        response: std::result::Result<reqwest::Response, reqwest::Error>,
    ) -> Result<String> {
        let response = response.map_err(|source| Error::Http {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| Error::Http {
            url: url.to_string(),
            source,
        })
    }
}

/// Deserialize a response body, surfacing failures as [`Error::Parse`].
fn parse_json<T: serde::de::DeserializeOwned>(url: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| Error::Parse {
        url: url.to_string(),
        message: e.to_string(),
    })
}

#[async_trait::async_trait]
impl SenseDevice for DeviceClient {
    async fn fetch_sensors(&self) -> Result<SensorSnapshot> {
        DeviceClient::fetch_sensors(self).await
    }

    async fn fetch_leds(&self) -> Result<LedGridState> {
        DeviceClient::fetch_leds(self).await
    }

    async fn set_leds(&self, grid: &[LedColor]) -> Result<()> {
        DeviceClient::set_leds(self, grid).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_base_url_from_host_and_port() {
        let client = DeviceClient::new("localhost", 8000).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");

        let client = DeviceClient::new("192.168.1.50", 8080).unwrap();
        assert_eq!(client.base_url(), "http://192.168.1.50:8080");
    }

    #[test]
    fn rejects_malformed_hosts() {
        assert!(matches!(
            DeviceClient::new("", 8000),
            Err(Error::InvalidAddress(_))
        ));
        assert!(matches!(
            DeviceClient::new("host/path", 8000),
            Err(Error::InvalidAddress(_))
        ));
        assert!(matches!(
            DeviceClient::new("host:9000", 8000),
            Err(Error::InvalidAddress(_))
        ));

        assert!(!DeviceClient::is_valid_host("pi.local:9000"));
        assert!(!DeviceClient::is_valid_host("   "));
        assert!(DeviceClient::is_valid_host("pi.local"));
        assert!(DeviceClient::is_valid_host("192.168.1.50"));
    }

    #[test]
    fn parses_sensor_body() {
        let url = "http://localhost:8000/sensors/all";
        let snapshot: SensorSnapshot = parse_json(
            url,
            r#"{ "temperature": { "value": 21.2, "unit": "C" } }"#,
        )
        .unwrap();
        assert_eq!(snapshot.get("temperature").unwrap().value, 21.2);

        let err = parse_json::<SensorSnapshot>(url, "not json").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn parses_led_body_in_order() {
        let url = "http://localhost:8000/leds/get/all";
        let grid: LedGridState = parse_json(url, "[[0,0,0],[10,20,30]]").unwrap();
        assert_eq!(grid, vec![LedColor(0, 0, 0), LedColor(10, 20, 30)]);

        // Shape mismatch (object instead of array) is a parse error.
        let err = parse_json::<LedGridState>(url, r#"{"leds": []}"#).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn grid_payload_matches_wire_format() {
        let grid = vec![LedColor(0, 0, 0), LedColor(10, 20, 30)];
        let payload = serde_json::to_string(&grid).unwrap();
        assert_eq!(payload, "[[0,0,0],[10,20,30]]");
    }
}
