pub mod download;
pub mod ping;

use crate::api::{ApiError, BackendClient};
use crate::settings::SpeedTestSettings;
use download::{DownloadProgress, DownloadTest};
use ping::PingTest;
use ratatui::style::Color;
use thiserror::Error;
use tokio::sync::mpsc;

/// Upload is not measured; it is estimated as this share of download.
const UPLOAD_RATIO: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityLabel {
    Excellent,
    VeryGood,
    Good,
    Fair,
    Slow,
}

impl QualityLabel {
    /// Thresholds are strict: exactly 50.0 Mbps is `VeryGood`.
    pub fn from_mbps(download_mbps: f64) -> Self {
        if download_mbps > 50.0 {
            Self::Excellent
        } else if download_mbps > 25.0 {
            Self::VeryGood
        } else if download_mbps > 10.0 {
            Self::Good
        } else if download_mbps > 5.0 {
            Self::Fair
        } else {
            Self::Slow
        }
    }

    pub fn display(self) -> &'static str {
        match self {
            Self::Excellent => "🚀 Excellent",
            Self::VeryGood => "✨ Very Good",
            Self::Good => "👍 Good",
            Self::Fair => "⚠️ Fair",
            Self::Slow => "🐌 Slow",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Excellent => Color::Rgb(16, 185, 129),
            Self::VeryGood => Color::Rgb(59, 130, 246),
            Self::Good => Color::Rgb(245, 158, 11),
            Self::Fair => Color::Rgb(249, 115, 22),
            Self::Slow => Color::Rgb(239, 68, 68),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeedMeasurement {
    pub download_mbps: f64,
    pub upload_mbps: f64,
    pub ping_ms: u32,
    pub quality: QualityLabel,
}

impl SpeedMeasurement {
    pub fn from_download(download_mbps: f64, ping_ms: u32) -> Self {
        let download_mbps = round_to_tenth(download_mbps.max(0.0));
        Self {
            download_mbps,
            upload_mbps: estimate_upload(download_mbps),
            ping_ms,
            quality: QualityLabel::from_mbps(download_mbps),
        }
    }
}

pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn estimate_upload(download_mbps: f64) -> f64 {
    round_to_tenth(download_mbps * UPLOAD_RATIO)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestPhase {
    Idle,
    Download,
    Ping,
    Complete,
    Failed,
}

impl TestPhase {
    pub fn is_running(self) -> bool {
        matches!(self, TestPhase::Download | TestPhase::Ping)
    }
}

#[derive(Error, Debug)]
pub enum SpeedTestError {
    #[error("could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("download failed ({primary}) and fallback failed ({fallback})")]
    Unavailable {
        primary: reqwest::Error,
        fallback: ApiError,
    },
}

/// Runs one download-then-ping measurement.
pub struct SpeedEstimator {
    client: reqwest::Client,
    backend: BackendClient,
    settings: SpeedTestSettings,
}

impl SpeedEstimator {
    pub fn new(settings: SpeedTestSettings, backend: BackendClient) -> Result<Self, SpeedTestError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            backend,
            settings,
        })
    }

    pub async fn measure(
        &self,
        progress_tx: mpsc::Sender<SpeedProgress>,
    ) -> Result<SpeedMeasurement, SpeedTestError> {
        let (download_tx, mut download_rx) = mpsc::channel::<DownloadProgress>(32);
        let forward_tx = progress_tx.clone();
        let forward = tokio::spawn(async move {
            while let Some(progress) = download_rx.recv().await {
                let _ = forward_tx.send(SpeedProgress::Download(progress)).await;
            }
        });

        let test = DownloadTest::new(&self.settings.download_url, self.settings.download_bytes);
        let download = test.run(&self.client, download_tx).await;
        let _ = forward.await;

        let download_mbps = match download {
            Ok(result) => {
                tracing::debug!(
                    bytes = result.bytes_received,
                    elapsed_ms = result.elapsed.as_millis() as u64,
                    "Download finished"
                );
                result.speed_mbps
            }
            Err(primary) => {
                tracing::warn!("Download measurement failed, asking backend: {}", primary);
                match self.backend.speed_test().await {
                    Ok(speed) => speed,
                    Err(fallback) => {
                        tracing::error!("Backend speed figure unavailable: {}", fallback);
                        return Err(SpeedTestError::Unavailable { primary, fallback });
                    }
                }
            }
        };

        let _ = progress_tx.send(SpeedProgress::Pinging).await;

        let ping = PingTest::new(&self.settings.ping_url).run(&self.client).await;
        let measurement = SpeedMeasurement::from_download(download_mbps, ping.ms);

        tracing::info!(
            download_mbps = measurement.download_mbps,
            upload_mbps = measurement.upload_mbps,
            ping_ms = measurement.ping_ms,
            ping_measured = ping.measured,
            "Speed test complete"
        );

        Ok(measurement)
    }
}

#[derive(Debug, Clone)]
pub enum SpeedProgress {
    Download(DownloadProgress),
    Pinging,
}
