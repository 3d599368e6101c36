//! Lifecycle hook for push-based re-detection.
//!
//! Pages are analyzed on demand today. The observer owns the start/stop
//! lifecycle a streaming source will plug into; when a tick interval is
//! configured it emits [`ObservationEvent::Tick`] from a tokio task.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use autofill_core::config::DetectionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationEvent {
    Tick,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObserverConfig {
    /// Emit ticks at this interval while watching; `None` emits nothing.
    pub tick_interval: Option<Duration>,
}

impl From<&DetectionConfig> for ObserverConfig {
    fn from(config: &DetectionConfig) -> Self {
        Self {
            tick_interval: config.observe_interval_ms.map(Duration::from_millis),
        }
    }
}

#[derive(Debug, Default)]
pub struct DynamicContentObserver {
    config: ObserverConfig,
    watching: bool,
    task: Option<JoinHandle<()>>,
}

impl DynamicContentObserver {
    pub fn new(config: ObserverConfig) -> Self {
        Self {
            config,
            watching: false,
            task: None,
        }
    }

    pub fn is_watching(&self) -> bool {
        self.watching
    }

    /// Begin watching. A second call while already watching is a no-op.
    ///
    /// Ticks need a tokio runtime; outside one the observer still enters the
    /// watching state but emits nothing.
    pub fn start_watching<F>(&mut self, callback: F)
    where
        F: Fn(ObservationEvent) + Send + 'static,
    {
        if self.watching {
            return;
        }
        self.watching = true;

        let Some(period) = self.config.tick_interval else {
            return;
        };
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(h) => h,
            Err(_) => {
                warn!("no tokio runtime; observer ticks disabled");
                return;
            }
        };

        debug!(interval_ms = period.as_millis() as u64, "observer ticking");
        self.task = Some(handle.spawn(async move {
            let mut interval = tokio::time::interval(period);
            // first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                callback(ObservationEvent::Tick);
            }
        }));
    }

    pub fn stop_watching(&mut self) {
        self.watching = false;
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for DynamicContentObserver {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
