use serde::{Deserialize, Serialize};

/// Location guessed by the backend from the caller's IP.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectedLocation {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InitRequest {
    pub city: String,
    pub country: String,
    pub timezone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InitResponse {
    pub success: bool,
    #[serde(default)]
    pub hour: Option<u32>,
    #[serde(default)]
    pub weather: Option<Weather>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Current conditions as reported by init.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub temp: f64,
    pub description: String,
    pub icon: String,
    pub humidity: f64,
    pub wind_speed: f64,
    #[serde(default)]
    pub feels_like: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeedTestResponse {
    pub download_speed: f64,
}

/// Successful init, with the fields the dashboard needs.
#[derive(Debug, Clone)]
pub struct Session {
    pub city: String,
    pub country: String,
    pub hour: u32,
    pub weather: Weather,
}
