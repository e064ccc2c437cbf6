use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    Continue,
    Cancelled,
}

/// Timed suspension between consecutive sends.
pub trait Pacer {
    fn pause(&mut self, delay: Duration) -> Pace;

    fn is_cancelled(&self) -> bool {
        false
    }
}

impl<T: Pacer + ?Sized> Pacer for &mut T {
    fn pause(&mut self, delay: Duration) -> Pace {
        (**self).pause(delay)
    }

    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// Blocks the calling thread for the full delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct SleepPacer;

impl Pacer for SleepPacer {
    fn pause(&mut self, delay: Duration) -> Pace {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        Pace::Continue
    }
}

/// Shared flag that stops a bulk send, waking any pause in progress.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        let (lock, cvar) = &*self.inner;
        *lock.lock() = true;
        cvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.0.lock()
    }

    /// Waits up to `delay`; returns true if cancelled before or during the wait.
    pub fn wait(&self, delay: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut cancelled = lock.lock();
        if !*cancelled && !delay.is_zero() {
            cvar.wait_while_for(&mut cancelled, |cancelled| !*cancelled, delay);
        }
        *cancelled
    }
}

#[derive(Debug, Clone, Default)]
pub struct CancellablePacer {
    token: CancelToken,
}

impl CancellablePacer {
    pub fn new(token: CancelToken) -> Self {
        Self { token }
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }
}

impl Pacer for CancellablePacer {
    fn pause(&mut self, delay: Duration) -> Pace {
        if self.token.wait(delay) {
            Pace::Cancelled
        } else {
            Pace::Continue
        }
    }

    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
