use rand::Rng;
use reqwest::header::CACHE_CONTROL;
use std::time::Instant;

/// Placeholder range used when the trace endpoint cannot be reached.
/// These values are not measurements.
pub const FALLBACK_PING_MS: std::ops::RangeInclusive<u32> = 20..=70;

pub struct PingTest {
    url: String,
}

impl PingTest {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
        }
    }

    /// Single round trip. Never fails: an unreachable endpoint yields a
    /// random placeholder from `FALLBACK_PING_MS`.
    pub async fn run(&self, client: &reqwest::Client) -> PingResult {
        let start = Instant::now();
        match client
            .get(&self.url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await
        {
            Ok(_) => {
                let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
                PingResult {
                    ms: elapsed_ms.round() as u32,
                    measured: true,
                }
            }
            Err(e) => {
                tracing::warn!("Ping failed, reporting placeholder latency: {}", e);
                PingResult {
                    ms: fallback_ping(),
                    measured: false,
                }
            }
        }
    }
}

pub fn fallback_ping() -> u32 {
    rand::thread_rng().gen_range(FALLBACK_PING_MS)
}

#[derive(Debug, Clone, Copy)]
pub struct PingResult {
    pub ms: u32,
    /// False when `ms` is the placeholder value.
    pub measured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_stays_in_range() {
        for _ in 0..1_000 {
            assert!(FALLBACK_PING_MS.contains(&fallback_ping()));
        }
    }

    #[tokio::test]
    async fn unreachable_endpoint_uses_placeholder() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = reqwest::Client::new();
        let result = PingTest::new(&format!("http://127.0.0.1:{port}/"))
            .run(&client)
            .await;

        assert!(!result.measured);
        assert!(FALLBACK_PING_MS.contains(&result.ms));
    }
}
