use log::{info, warn};
use std::{sync::Arc, time::Duration};
use tokio::sync::watch;

use crate::{
    config::AlertConfig,
    message::{Reply, current_embed},
    provider::WeatherProvider,
    sink::MessageSink,
};

/// Publishes the current weather for one city at a fixed interval.
///
/// The first alert goes out as soon as [`DailyAlert::run`] starts; the
/// schedule is not persisted, so a restart starts it over.
#[derive(Debug, Clone)]
pub struct DailyAlert {
    provider: Arc<dyn WeatherProvider>,
    sink: Arc<dyn MessageSink>,
    city: String,
    interval: Duration,
}

impl DailyAlert {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        sink: Arc<dyn MessageSink>,
        alert: &AlertConfig,
    ) -> Self {
        Self {
            provider,
            sink,
            city: alert.city.clone(),
            interval: alert.interval(),
        }
    }

    /// Send one alert. Returns `true` if a message was published.
    pub async fn fire(&self) -> bool {
        let snap = match self.provider.fetch_current(&self.city).await {
            Ok(snap) => snap,
            Err(e) => {
                warn!("Daily alert for '{}' skipped: {e}", self.city);
                return false;
            }
        };

        match self.sink.publish(&Reply::from(current_embed(&snap))).await {
            Ok(()) => {
                info!("Daily alert for '{}' published", self.city);
                true
            }
            Err(e) => {
                warn!("Failed to publish daily alert: {e:#}");
                false
            }
        }
    }

    /// Fire on every tick until `shutdown` changes or its sender is dropped.
    ///
    /// A due tick always wins over shutdown, so the first alert is sent even
    /// when shutdown is signalled right away.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Daily alert for '{}' every {}s",
            self.city,
            self.interval.as_secs()
        );
        let mut interval = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                biased;

                _ = interval.tick() => {
                    self.fire().await;
                }
                _ = shutdown.changed() => {
                    info!("Daily alert stopping");
                    break;
                }
            }
        }
    }
}
