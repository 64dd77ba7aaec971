//! Cancelable one-shot timers for the fallback release.

use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

/// Work to run when a timer fires.
pub type TimerTask = Box<dyn FnOnce() + Send + 'static>;

/// Schedules one-shot tasks.
pub trait FallbackTimer: Send + Sync {
    /// Run `task` once after `after`, unless the returned guard is canceled or dropped first.
    fn schedule(&self, after: Duration, task: TimerTask) -> TimerGuard;
}

/// Handle to a scheduled task. Canceling (or dropping) it prevents the task from running.
pub struct TimerGuard {
    cancel: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl TimerGuard {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Guard for a task that was never scheduled.
    pub fn inert() -> Self {
        Self { cancel: None }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for TimerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerGuard")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

/// Real-time timer running each task on its own short-lived thread (native only).
///
/// The thread waits on a channel with a timeout; canceling the guard sends on
/// (or drops) the channel and the thread exits without running the task.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadTimer;

#[cfg(not(target_arch = "wasm32"))]
impl FallbackTimer for ThreadTimer {
    fn schedule(&self, after: Duration, task: TimerTask) -> TimerGuard {
        use std::sync::mpsc::{self, RecvTimeoutError};

        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();

        let spawned = std::thread::Builder::new()
            .name("resource-fallback".to_string())
            .spawn(move || match cancel_rx.recv_timeout(after) {
                Err(RecvTimeoutError::Timeout) => task(),
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    log::trace!("Fallback timer canceled");
                }
            });

        match spawned {
            Ok(_) => TimerGuard::new(move || {
                let _ = cancel_tx.send(());
            }),
            Err(e) => {
                log::error!("Failed to spawn fallback timer thread: {}", e);
                TimerGuard::inert()
            }
        }
    }
}

struct PendingTask {
    id: u64,
    deadline: Duration,
    task: TimerTask,
}

#[derive(Default)]
struct TickState {
    elapsed: Duration,
    next_id: u64,
    pending: Vec<PendingTask>,
}

/// Timer driven by the host's event loop instead of wall-clock threads.
///
/// Single-threaded hosts (the browser, a frame loop) call [`TickTimer::advance`]
/// with the time that passed; due tasks run inside that call.
#[derive(Clone, Default)]
pub struct TickTimer {
    state: Arc<Mutex<TickState>>,
}

impl TickTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward and run every task that became due. Returns how many ran.
    pub fn advance(&self, by: Duration) -> usize {
        let due: Vec<PendingTask> = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.elapsed += by;
            let now = state.elapsed;
            let (due, waiting): (Vec<PendingTask>, Vec<PendingTask>) = std::mem::take(&mut state.pending)
                .into_iter()
                .partition(|p| p.deadline <= now);
            state.pending = waiting;
            due
        };

        // Run outside the lock so tasks may schedule again
        let count = due.len();
        for pending in due {
            log::trace!("Tick timer {} fired", pending.id);
            (pending.task)();
        }
        count
    }

    /// Tasks scheduled and neither fired nor canceled.
    pub fn pending_count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .len()
    }

    fn cancel(state: &Weak<Mutex<TickState>>, id: u64) {
        if let Some(state) = state.upgrade() {
            state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pending
                .retain(|p| p.id != id);
        }
    }
}

impl FallbackTimer for TickTimer {
    fn schedule(&self, after: Duration, task: TimerTask) -> TimerGuard {
        let id = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let id = state.next_id;
            state.next_id += 1;
            let deadline = state.elapsed + after;
            state.pending.push(PendingTask { id, deadline, task });
            id
        };

        let weak = Arc::downgrade(&self.state);
        TimerGuard::new(move || TickTimer::cancel(&weak, id))
    }
}
