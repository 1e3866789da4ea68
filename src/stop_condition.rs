use crate::ping_error::PingError;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

/// One-shot stop request shared between an interrupt handler and the ping
/// session. Once set it stays set.
#[derive(Clone, Default)]
pub struct StopCondition {
    condition: Arc<(Mutex<bool>, Condvar)>,
}

impl StopCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_stop(&self) {
        let (lock, cvar) = &*self.condition;
        let mut should_stop = lock.lock().unwrap_or_else(PoisonError::into_inner);
        *should_stop = true;
        cvar.notify_all();
    }

    pub fn should_stop(&self) -> bool {
        let (lock, _) = &*self.condition;
        *lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Waits until a stop is requested or `timeout` elapses. Returns whether a
    /// stop was requested.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.condition;
        let guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (should_stop, _) = cvar
            .wait_timeout_while(guard, timeout, |should_stop| !*should_stop)
            .unwrap_or_else(PoisonError::into_inner);
        *should_stop
    }

    /// Routes SIGINT (Ctrl-C) to this stop condition. Can be installed once per
    /// process.
    pub fn stop_on_interrupt(&self) -> Result<(), PingError> {
        let stop_condition = self.clone();
        ctrlc::set_handler(move || {
            tracing::debug!("interrupt received");
            stop_condition.set_should_stop();
        })?;
        Ok(())
    }
}
