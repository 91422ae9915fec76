//! Session state shared by the control path and the recognition worker.
//!
//! Two pieces of state live here: the control flags (`recognizing`, plus the
//! stop and halt signals) and the single current-identity slot. The flags
//! sit behind a mutex paired with a condition variable so the worker blocks
//! instead of polling while recognition is paused. The identity slot is
//! replaced whole on every publish; readers never see a partial value.

use std::sync::{Condvar, Mutex, MutexGuard, RwLock};
use std::time::Duration;

use facegate_types::CurrentIdentity;

use crate::{FacegateError, Result};

#[derive(Debug, Default)]
struct Control {
    recognizing: bool,
    stopping: bool,
    halted: bool,
}

/// Explicitly owned session state.
#[derive(Debug, Default)]
pub struct SessionState {
    control: Mutex<Control>,
    wake: Condvar,
    current: RwLock<CurrentIdentity>,
}

impl SessionState {
    pub fn new(start_active: bool) -> Self {
        Self {
            control: Mutex::new(Control {
                recognizing: start_active,
                ..Control::default()
            }),
            ..Self::default()
        }
    }

    // Flags and identity stay meaningful after a panicking holder, so a
    // poisoned lock is recovered rather than propagated.
    fn control(&self) -> MutexGuard<'_, Control> {
        self.control
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_recognizing(&self) -> bool {
        self.control().recognizing
    }

    pub fn is_halted(&self) -> bool {
        self.control().halted
    }

    /// Flips `recognizing` and returns the new value. The worker picks the
    /// change up on its next wait.
    ///
    /// # Errors
    ///
    /// [`FacegateError::RecognizerHalted`] once the worker has died.
    pub fn toggle(&self) -> Result<bool> {
        let mut control = self.control();
        if control.halted {
            return Err(FacegateError::RecognizerHalted);
        }
        control.recognizing = !control.recognizing;
        let recognizing = control.recognizing;
        drop(control);

        self.wake.notify_all();
        Ok(recognizing)
    }

    /// Signals the worker to stop at its next wait point.
    pub(crate) fn request_stop(&self) {
        self.control().stopping = true;
        self.wake.notify_all();
    }

    /// Records that the worker stopped on a failure.
    pub(crate) fn mark_halted(&self) {
        let mut control = self.control();
        control.halted = true;
        control.recognizing = false;
    }

    /// Blocks until recognition is on or a stop is requested. Returns
    /// `false` on stop.
    pub(crate) fn wait_until_active(&self) -> bool {
        let mut control = self.control();
        while !control.recognizing && !control.stopping {
            control = self
                .wake
                .wait(control)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
        !control.stopping
    }

    /// Sleeps for `interval` unless a stop arrives first. Returns `false`
    /// on stop.
    pub(crate) fn pause(&self, interval: Duration) -> bool {
        let control = self.control();
        if interval.is_zero() {
            return !control.stopping;
        }
        let (control, _) = self
            .wake
            .wait_timeout_while(control, interval, |control| !control.stopping)
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        !control.stopping
    }

    /// Replaces the current identity.
    pub fn publish(&self, identity: CurrentIdentity) {
        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = identity;
    }

    /// The identity most recently published.
    pub fn current(&self) -> CurrentIdentity {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_starts_absent_and_paused() {
        let state = SessionState::new(false);
        assert_eq!(state.current(), CurrentIdentity::Absent);
        assert!(!state.is_recognizing());
    }

    #[test]
    fn test_toggle_flips() {
        let state = SessionState::new(false);
        assert!(state.toggle().unwrap());
        assert!(!state.toggle().unwrap());
    }

    #[test]
    fn test_toggle_after_halt_fails() {
        let state = SessionState::new(true);
        state.mark_halted();
        assert!(!state.is_recognizing());
        assert!(matches!(state.toggle(), Err(FacegateError::RecognizerHalted)));
    }

    #[test]
    fn test_stop_wakes_idle_waiter() {
        let state = Arc::new(SessionState::new(false));
        let waiter = {
            let state = Arc::clone(&state);
            thread::spawn(move || state.wait_until_active())
        };

        state.request_stop();
        assert!(!waiter.join().unwrap());
    }

    #[test]
    fn test_toggle_wakes_idle_waiter() {
        let state = Arc::new(SessionState::new(false));
        let waiter = {
            let state = Arc::clone(&state);
            thread::spawn(move || state.wait_until_active())
        };

        state.toggle().unwrap();
        assert!(waiter.join().unwrap());
    }

    #[test]
    fn test_stop_interrupts_pause() {
        let state = Arc::new(SessionState::new(true));
        let started = Instant::now();
        let sleeper = {
            let state = Arc::clone(&state);
            thread::spawn(move || state.pause(Duration::from_secs(30)))
        };

        thread::sleep(Duration::from_millis(20));
        state.request_stop();
        assert!(!sleeper.join().unwrap());
        assert!(started.elapsed() < Duration::from_secs(30));
    }

    #[test]
    fn test_publish_replaces_identity() {
        let state = SessionState::new(false);
        state.publish(CurrentIdentity::Role("CEO".to_string()));
        state.publish(CurrentIdentity::Unknown);
        assert_eq!(state.current(), CurrentIdentity::Unknown);
    }
}
