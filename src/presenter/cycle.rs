//! Cycle Presenter
//!
//! Drives a `CycleWindow` from two triggers: roster snapshots and a periodic
//! timer. Both run as tokio tasks and meet at the window mutex; a tick never
//! awaits while holding it, so ticks are atomic.
//!
//! A snapshot stops the running timer before it touches the window and
//! starts a fresh one afterwards, so only one timer ever advances the cursor.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::sink::WindowSink;
use super::window::{CycleWindow, WindowFrame};
use crate::roster::{RosterError, Snapshot, Subscription};

/// Window size and cadence of the attendee display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleConfig {
    window_size: NonZeroUsize,
    interval: Duration,
}

impl CycleConfig {
    pub const DEFAULT_WINDOW_SIZE: usize = 3;
    pub const DEFAULT_INTERVAL_MS: u64 = 5000;
    /// Largest window a display can render
    pub const MAX_WINDOW_SIZE: usize = 100;

    /// Returns `None` if either value is zero or the window is larger than
    /// `MAX_WINDOW_SIZE`
    pub fn new(window_size: usize, interval_ms: u64) -> Option<Self> {
        if interval_ms == 0 || window_size > Self::MAX_WINDOW_SIZE {
            return None;
        }
        Some(Self {
            window_size: NonZeroUsize::new(window_size)?,
            interval: Duration::from_millis(interval_ms),
        })
    }

    pub fn window_size(&self) -> NonZeroUsize {
        self.window_size
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            window_size: NonZeroUsize::MIN.saturating_add(Self::DEFAULT_WINDOW_SIZE - 1),
            interval: Duration::from_millis(Self::DEFAULT_INTERVAL_MS),
        }
    }
}

/// Owns the window state, the render sink and the timer
pub struct CyclePresenter {
    config: CycleConfig,
    window: Arc<Mutex<CycleWindow>>,
    sink: Arc<dyn WindowSink>,
    timer: Option<JoinHandle<()>>,
    /// Set while `run` is consuming a subscription
    active: Arc<AtomicBool>,
}

/// Read-only handle onto a presenter's window
#[derive(Clone)]
pub struct PresenterView {
    window: Arc<Mutex<CycleWindow>>,
    active: Arc<AtomicBool>,
}

impl PresenterView {
    /// Whether the presenter is still consuming roster updates
    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Index of the record the next tick will show first
    pub async fn cursor(&self) -> usize {
        self.window.lock().await.cursor()
    }

    /// Records in the cached snapshot
    pub async fn len(&self) -> usize {
        self.window.lock().await.len()
    }

    /// Frame the next tick would display
    pub async fn preview(&self) -> WindowFrame {
        self.window.lock().await.render()
    }
}

impl CyclePresenter {
    pub fn new(config: CycleConfig, sink: Arc<dyn WindowSink>) -> Self {
        Self {
            config,
            window: Arc::new(Mutex::new(CycleWindow::new(config.window_size))),
            sink,
            timer: None,
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &CycleConfig {
        &self.config
    }

    pub fn view(&self) -> PresenterView {
        PresenterView {
            window: Arc::clone(&self.window),
            active: Arc::clone(&self.active),
        }
    }

    /// Whether a timer is currently driving the window
    pub fn is_running(&self) -> bool {
        self.timer.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }

    /// Apply a fresh snapshot, display it immediately and restart the timer
    pub async fn on_source_updated(&mut self, records: Snapshot) {
        self.stop();

        {
            let mut window = self.window.lock().await;
            window.replace(records);
            tracing::debug!(
                total = window.len(),
                cursor = window.cursor(),
                "Roster snapshot applied"
            );
            tick(&mut window, self.sink.as_ref());
        }

        self.start();
    }

    /// Keep showing the last snapshot; the timer is left alone
    pub fn on_source_failed(&self, error: &RosterError) {
        tracing::error!(error = %error, "Error fetching real-time RSVPs, keeping last snapshot");
    }

    /// Start the periodic timer, replacing any running one
    ///
    /// The first timer tick fires one full interval from now.
    pub fn start(&mut self) {
        self.stop();

        let window = Arc::clone(&self.window);
        let sink = Arc::clone(&self.sink);
        let period = self.config.interval;

        self.timer = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let mut window = window.lock().await;
                tick(&mut window, sink.as_ref());
            }
        }));
    }

    /// Cancel the timer if one is running
    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    /// Consume a roster subscription until the store goes away
    pub async fn run(mut self, mut subscription: Subscription) {
        let _active = ActiveGuard::set(&self.active);
        tracing::info!(
            window_size = self.config.window_size.get(),
            interval_ms = self.config.interval.as_millis() as u64,
            "Attendee display started"
        );

        while let Some(event) = subscription.next().await {
            match event {
                Ok(records) => self.on_source_updated(records).await,
                Err(error) => self.on_source_failed(&error),
            }
        }

        self.stop();
        tracing::info!("Roster subscription closed, attendee display stopped");
    }

    /// Run on a background task
    pub fn spawn(self, subscription: Subscription) -> JoinHandle<()> {
        tokio::spawn(self.run(subscription))
    }
}

impl Drop for CyclePresenter {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Clears the running flag when `run` returns or its task is aborted
struct ActiveGuard(Arc<AtomicBool>);

impl ActiveGuard {
    fn set(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::Release);
        Self(Arc::clone(flag))
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn tick(window: &mut CycleWindow, sink: &dyn WindowSink) {
    let frame = window.tick();
    sink.display(&frame);
}
