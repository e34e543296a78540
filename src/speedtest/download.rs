use futures::StreamExt;
use reqwest::header::CACHE_CONTROL;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const BYTES_PER_MEGABYTE: f64 = 1_048_576.0;

pub struct DownloadTest {
    url: String,
    download_size: u64,
}

impl DownloadTest {
    pub fn new(url: &str, download_size: u64) -> Self {
        Self {
            url: url.to_string(),
            download_size,
        }
    }

    /// Downloads the payload once and times it end to end.
    pub async fn run(
        &self,
        client: &reqwest::Client,
        progress_tx: mpsc::Sender<DownloadProgress>,
    ) -> Result<DownloadResult, reqwest::Error> {
        let start = Instant::now();

        let response = client
            .get(&self.url)
            .query(&[("bytes", self.download_size)])
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?
            .error_for_status()?;
        let total_size = response.content_length().unwrap_or(self.download_size);
        let mut stream = response.bytes_stream();

        let mut downloaded: u64 = 0;
        let mut last_update = Instant::now();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            downloaded += chunk.len() as u64;

            if last_update.elapsed() >= Duration::from_millis(100) {
                let _ = progress_tx
                    .send(DownloadProgress {
                        downloaded_bytes: downloaded,
                        total_bytes: total_size,
                    })
                    .await;
                last_update = Instant::now();
            }
        }

        let elapsed = start.elapsed();
        let _ = progress_tx
            .send(DownloadProgress {
                downloaded_bytes: downloaded,
                total_bytes: total_size,
            })
            .await;

        Ok(DownloadResult {
            bytes_received: downloaded,
            elapsed,
            speed_mbps: throughput_mbps(downloaded, elapsed),
        })
    }
}

/// Megabits per second over binary megabytes, rounded to one decimal.
pub fn throughput_mbps(bytes: u64, elapsed: Duration) -> f64 {
    let seconds = elapsed.as_secs_f64().max(1e-6);
    let megabytes = bytes as f64 / BYTES_PER_MEGABYTE;
    super::round_to_tenth(megabytes * 8.0 / seconds)
}

#[derive(Debug, Clone)]
pub struct DownloadProgress {
    pub downloaded_bytes: u64,
    pub total_bytes: u64,
}

impl DownloadProgress {
    pub fn ratio(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        (self.downloaded_bytes as f64 / self.total_bytes as f64).min(1.0)
    }
}

#[derive(Debug, Clone)]
pub struct DownloadResult {
    pub bytes_received: u64,
    pub elapsed: Duration,
    pub speed_mbps: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throughput_uses_binary_megabytes() {
        // 5 MiB in one second is 40 Mbps.
        assert_eq!(throughput_mbps(5 * 1_048_576, Duration::from_secs(1)), 40.0);
        // 5,000,000 bytes in two seconds.
        assert_eq!(throughput_mbps(5_000_000, Duration::from_secs(2)), 19.1);
    }

    #[test]
    fn zero_elapsed_does_not_divide_by_zero() {
        assert!(throughput_mbps(1_000, Duration::ZERO).is_finite());
        assert_eq!(throughput_mbps(0, Duration::ZERO), 0.0);
    }

    #[test]
    fn progress_ratio_is_clamped() {
        let progress = DownloadProgress {
            downloaded_bytes: 150,
            total_bytes: 100,
        };
        assert_eq!(progress.ratio(), 1.0);

        let unknown = DownloadProgress {
            downloaded_bytes: 10,
            total_bytes: 0,
        };
        assert_eq!(unknown.ratio(), 0.0);
    }
}
