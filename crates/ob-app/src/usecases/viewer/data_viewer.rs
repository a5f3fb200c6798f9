//! Read-only user table with periodic refresh.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use ob_core::ports::{UserDirectoryError, UserDirectoryPort};
use ob_core::UserRecord;

/// What the table currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewerSnapshot {
    /// Last successfully fetched list, kept across failed refreshes.
    pub users: Vec<UserRecord>,
    /// Banner text for the most recent failure, cleared on success.
    pub error: Option<String>,
    pub loading: bool,
    pub last_updated: Option<DateTime<Utc>>,
}

impl ViewerSnapshot {
    pub fn count(&self) -> usize {
        self.users.len()
    }
}

struct ViewerInner {
    directory: Arc<dyn UserDirectoryPort>,
    state: watch::Sender<ViewerSnapshot>,
    /// Fetches started and not yet published; `loading` holds while nonzero.
    in_flight: AtomicUsize,
}

impl ViewerInner {
    async fn refresh(&self) -> ViewerSnapshot {
        self.state.send_modify(|snapshot| {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            snapshot.loading = true;
        });
        let result = self.directory.list_users().await;

        self.state.send_modify(|snapshot| {
            let remaining = self.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
            snapshot.loading = remaining > 0;
            match result {
                Ok(users) => {
                    debug!(count = users.len(), "user list refreshed");
                    snapshot.users = users;
                    snapshot.error = None;
                    snapshot.last_updated = Some(Utc::now());
                }
                Err(err) => {
                    warn!(error = %err, kept = snapshot.users.len(), "user list refresh failed");
                    snapshot.error = Some(banner(&err));
                }
            }
        });
        self.state.borrow().clone()
    }
}

fn banner(err: &UserDirectoryError) -> String {
    match err {
        UserDirectoryError::MalformedResponse(_) => "Invalid data format received".to_string(),
        other => format!("Failed to load users: {other}"),
    }
}

/// Polls the user directory and publishes [`ViewerSnapshot`]s.
///
/// The polling task is owned by the viewer: [`DataViewer::stop`] cancels it
/// and dropping the viewer cancels it as well.
pub struct DataViewer {
    inner: Arc<ViewerInner>,
    poll_interval: Duration,
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl DataViewer {
    pub fn new(directory: Arc<dyn UserDirectoryPort>, poll_interval: Duration) -> Self {
        let (state, _) = watch::channel(ViewerSnapshot::default());
        Self {
            inner: Arc::new(ViewerInner {
                directory,
                state,
                in_flight: AtomicUsize::new(0),
            }),
            poll_interval,
            poller: Mutex::new(None),
        }
    }

    /// Fetch now, sharing the code path with the periodic task.
    pub async fn refresh(&self) -> ViewerSnapshot {
        self.inner.refresh().await
    }

    pub fn snapshot(&self) -> ViewerSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every snapshot change.
    pub fn subscribe(&self) -> watch::Receiver<ViewerSnapshot> {
        self.inner.state.subscribe()
    }

    /// Start polling: one fetch right away, then one per interval.
    ///
    /// Calling `start` while already polling does nothing.
    pub async fn start(&self) {
        let mut poller = self.poller.lock().await;
        if poller.as_ref().is_some_and(|handle| !handle.is_finished()) {
            debug!("user list poller already running");
            return;
        }

        let inner = Arc::clone(&self.inner);
        let period = self.poll_interval;
        *poller = Some(tokio::spawn(async move {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                inner.refresh().await;
            }
        }));
        info!(interval_secs = period.as_secs(), "user list poller started");
    }

    pub async fn stop(&self) {
        if let Some(handle) = self.poller.lock().await.take() {
            handle.abort();
            info!("user list poller stopped");
        }
    }

    pub async fn is_polling(&self) -> bool {
        self.poller
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for DataViewer {
    fn drop(&mut self) {
        if let Some(handle) = self.poller.get_mut().take() {
            handle.abort();
        }
    }
}
