use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use ob_core::{StepConfig, WizardSession};

/// Shared wizard context: the session, the wizard's own copy of the step
/// layout, and the dispatch lock.
///
/// ## Lock Ordering
/// Acquire `dispatch_lock` first, then `session`.
/// - `dispatch_lock`: held for a whole transition + action run. Submit-style
///   operations only *try* to take it, which makes a second click while one
///   is in flight a no-op.
/// - `session`: short reads and the final write of each transition.
#[derive(Clone)]
pub struct WizardContext {
    session: Arc<Mutex<WizardSession>>,
    step_config: Arc<Mutex<StepConfig>>,
    dispatch_lock: Arc<Mutex<()>>,
}

impl WizardContext {
    pub fn new(session: WizardSession, step_config: StepConfig) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            step_config: Arc::new(Mutex::new(step_config)),
            dispatch_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub async fn session(&self) -> WizardSession {
        self.session.lock().await.clone()
    }

    /// Should only be called while holding the dispatch lock.
    pub async fn set_session(&self, session: WizardSession) {
        *self.session.lock().await = session;
    }

    pub async fn step_config(&self) -> StepConfig {
        self.step_config.lock().await.clone()
    }

    pub async fn set_step_config(&self, config: StepConfig) {
        *self.step_config.lock().await = config;
    }

    /// Waits for any in-flight dispatch to finish.
    pub async fn acquire_dispatch_lock(&self) -> MutexGuard<'_, ()> {
        self.dispatch_lock.lock().await
    }

    /// `None` when another dispatch is in flight.
    pub fn try_acquire_dispatch_lock(&self) -> Option<MutexGuard<'_, ()>> {
        self.dispatch_lock.try_lock().ok()
    }

    /// Loading flag: a dispatch is in flight.
    pub fn is_busy(&self) -> bool {
        self.dispatch_lock.try_lock().is_err()
    }
}

impl Default for WizardContext {
    fn default() -> Self {
        Self::new(WizardSession::default(), StepConfig::default_layout())
    }
}
