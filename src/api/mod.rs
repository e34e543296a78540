//! HTTP client for the assistant backend.

pub mod types;

pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned status {0}")]
    Status(u16),

    #[error("Server rejected the request: {0}")]
    Rejected(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// User-facing message for init failures.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Rejected(_) | Self::Malformed(_) => {
                "Failed to initialize. Please check your API keys and try again."
            }
            Self::Network(_) | Self::Status(_) => {
                "Error connecting to server. Please check the log for details."
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn detect_location(&self) -> Result<DetectedLocation, ApiError> {
        let response = self
            .client
            .get(self.url("/api/detect-location"))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn init(&self, city: &str, country: &str) -> Result<Session, ApiError> {
        let request = InitRequest {
            city: city.to_string(),
            country: country.to_string(),
            timezone: "auto".to_string(),
        };

        let response = self
            .client
            .post(self.url("/api/init"))
            .json(&request)
            .send()
            .await?;
        let status = response.status();

        // The backend reports failures as JSON with a 500 status.
        let body: InitResponse = match response.json().await {
            Ok(body) => body,
            Err(_) if !status.is_success() => return Err(ApiError::Status(status.as_u16())),
            Err(e) => return Err(e.into()),
        };

        if !body.success {
            let reason = body.error.unwrap_or_else(|| "unknown error".to_string());
            return Err(ApiError::Rejected(reason));
        }

        let weather = body
            .weather
            .ok_or_else(|| ApiError::Malformed("init response has no weather".to_string()))?;
        let hour = body
            .hour
            .ok_or_else(|| ApiError::Malformed("init response has no hour".to_string()))?;

        Ok(Session {
            city: body.city.unwrap_or_else(|| city.to_string()),
            country: body.country.unwrap_or_else(|| country.to_string()),
            hour,
            weather,
        })
    }

    pub async fn chat(&self, message: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.url("/api/chat"))
            .json(&ChatRequest { message })
            .send()
            .await?
            .error_for_status()?;
        let body: ChatResponse = response.json().await?;
        Ok(body.response)
    }

    /// Server-side speed figure, used only when the client-side download fails.
    pub async fn speed_test(&self) -> Result<f64, ApiError> {
        let response = self
            .client
            .get(self.url("/api/speed-test"))
            .send()
            .await?
            .error_for_status()?;
        let body: SpeedTestResponse = response.json().await?;
        Ok(body.download_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn weather_json() -> serde_json::Value {
        serde_json::json!({
            "temp": 18,
            "description": "scattered clouds",
            "icon": "03d",
            "humidity": 62,
            "wind_speed": 4.1
        })
    }

    #[tokio::test]
    async fn init_success_returns_session() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/init"))
            .and(body_json(serde_json::json!({
                "city": "Rabat",
                "country": "Morocco",
                "timezone": "auto"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "hour": 9,
                "city": "Rabat",
                "country": "Morocco",
                "weather": weather_json()
            })))
            .mount(&mock_server)
            .await;

        let client = BackendClient::new(&format!("{}/", mock_server.uri())).unwrap();
        let session = client.init("Rabat", "Morocco").await.unwrap();

        assert_eq!(session.hour, 9);
        assert_eq!(session.city, "Rabat");
        assert_eq!(session.weather.description, "scattered clouds");
        assert_eq!(session.weather.feels_like, None);
    }

    #[tokio::test]
    async fn init_failure_body_is_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/init"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "success": false,
                "error": "bad key"
            })))
            .mount(&mock_server)
            .await;

        let client = BackendClient::new(&mock_server.uri()).unwrap();
        let err = client.init("Rabat", "Morocco").await.unwrap_err();

        assert!(matches!(err, ApiError::Rejected(ref reason) if reason == "bad key"));
        assert!(err.user_message().starts_with("Failed to initialize"));
    }

    #[tokio::test]
    async fn init_non_json_error_is_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/init"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&mock_server)
            .await;

        let client = BackendClient::new(&mock_server.uri()).unwrap();
        let err = client.init("Rabat", "Morocco").await.unwrap_err();

        assert!(matches!(err, ApiError::Status(502)));
        assert!(err.user_message().starts_with("Error connecting"));
    }

    #[tokio::test]
    async fn detect_location_tolerates_empty_object() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/detect-location"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&mock_server)
            .await;

        let client = BackendClient::new(&mock_server.uri()).unwrap();
        let location = client.detect_location().await.unwrap();

        assert!(location.city.is_none());
        assert!(location.country.is_none());
    }

    #[tokio::test]
    async fn chat_posts_message_and_returns_reply() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_json(serde_json::json!({ "message": "hello" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": "Hi there!",
                "timestamp": "2026-10-19T10:00:00"
            })))
            .mount(&mock_server)
            .await;

        let client = BackendClient::new(&mock_server.uri()).unwrap();
        assert_eq!(client.chat("hello").await.unwrap(), "Hi there!");
    }

    #[tokio::test]
    async fn speed_test_reads_download_speed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/speed-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "download_speed": 42.3,
                "unit": "Mbps",
                "quality": "Good"
            })))
            .mount(&mock_server)
            .await;

        let client = BackendClient::new(&mock_server.uri()).unwrap();
        assert_eq!(client.speed_test().await.unwrap(), 42.3);
    }
}
