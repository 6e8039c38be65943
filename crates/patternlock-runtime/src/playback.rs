#![forbid(unsafe_code)]

//! Timed replay of a password.
//!
//! A playback session runs on its own worker thread and never touches the
//! grid. It posts [`PlaybackMsg`] values over a channel; the owning
//! [`PatternLock`](crate::PatternLock) drains them in `poll()` and applies
//! them on its own thread.
//!
//! # Lifetime
//!
//! The worker holds only a `Sender`. Once the lock (and with it the
//! receiver) is gone, the next send fails and the worker exits without
//! invoking anything. Callers should still stop playback before discarding
//! the lock; dropping a [`PlaybackSession`] raises its stop flag but does not
//! join the thread.
//!
//! # Invariants
//!
//! 1. Every session ends with exactly one `Finished` message, unless the
//!    receiver is gone.
//! 2. The stop flag is checked before each repetition and before each step,
//!    and interrupts the inter-step sleep, so a stop is observed within one
//!    interval.
//! 3. Messages carry their session id; the lock ignores steps from any
//!    session other than the active one.

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, mpsc};
use std::thread;

use patternlock_core::{NodeId, Password};
use patternlock_core::config::DEFAULT_REPLAY_INTERVAL_MS;
use web_time::Duration;

/// Identifies one playback session within a lock.
pub type SessionId = u64;

/// Shortest interval between steps; keeps a zero interval from flooding the channel.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// How many times to replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatCount {
    /// Replay a fixed number of times; zero plays nothing.
    Times(u32),
    /// Replay until stopped.
    Infinite,
}

impl From<i32> for RepeatCount {
    /// Negative counts mean infinite repetition.
    fn from(count: i32) -> Self {
        u32::try_from(count).map_or(Self::Infinite, Self::Times)
    }
}

/// How a playback session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackEnd {
    /// Every repetition ran; the static password is on display.
    Completed,
    /// The session was stopped or superseded.
    Stopped,
}

impl PlaybackEnd {
    #[inline]
    pub fn was_stopped(self) -> bool {
        self == Self::Stopped
    }
}

/// Listener for the end of a playback session. Runs on the lock's thread.
pub type FinishListener = Box<dyn FnOnce(PlaybackEnd)>;

/// Parameters for one playback session.
pub struct PlaybackOptions {
    pub repeat: RepeatCount,
    pub interval: Duration,
    pub(crate) on_finish: Option<FinishListener>,
}

impl PlaybackOptions {
    /// Infinite repetition at the given interval.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            repeat: RepeatCount::Infinite,
            interval,
            on_finish: None,
        }
    }

    #[must_use]
    pub fn repeat(mut self, repeat: impl Into<RepeatCount>) -> Self {
        self.repeat = repeat.into();
        self
    }

    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn on_finish(mut self, listener: impl FnOnce(PlaybackEnd) + 'static) -> Self {
        self.on_finish = Some(Box::new(listener));
        self
    }
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_REPLAY_INTERVAL_MS))
    }
}

impl fmt::Debug for PlaybackOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackOptions")
            .field("repeat", &self.repeat)
            .field("interval", &self.interval)
            .field("on_finish", &self.on_finish.is_some())
            .finish()
    }
}

/// Worker-to-lock messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackMsg {
    /// A repetition begins; clear the grid.
    Restart { session: SessionId },
    /// Light the next node.
    Step { session: SessionId, id: NodeId },
    /// The worker is done.
    Finished { session: SessionId, stopped: bool },
}

/// Stop request shared by a session and its worker.
///
/// Raising never waits on the worker. A worker parked in
/// [`sleep`](Self::sleep) is woken at once.
#[derive(Default)]
struct StopFlag {
    raised: Mutex<bool>,
    wake: Condvar,
}

impl StopFlag {
    fn state(&self) -> MutexGuard<'_, bool> {
        self.raised.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn raise(&self) {
        *self.state() = true;
        self.wake.notify_all();
    }

    fn is_raised(&self) -> bool {
        *self.state()
    }

    /// Park for `duration` or until raised. Returns whether the flag is up.
    fn sleep(&self, duration: Duration) -> bool {
        let guard = self.state();
        let (guard, _) = self
            .wake
            .wait_timeout_while(guard, duration, |raised| !*raised)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

/// Handle to a running playback worker. The worker thread is detached.
pub(crate) struct PlaybackSession {
    id: SessionId,
    password: Password,
    flag: Arc<StopFlag>,
}

impl PlaybackSession {
    pub(crate) fn spawn(
        id: SessionId,
        password: Password,
        repeat: RepeatCount,
        interval: Duration,
        sender: mpsc::Sender<PlaybackMsg>,
    ) -> Self {
        let flag = Arc::new(StopFlag::default());
        let worker_flag = Arc::clone(&flag);
        let ids = password.ids().to_vec();
        let interval = interval.max(MIN_INTERVAL);

        tracing::debug!(session = id, password = %password, ?repeat, ?interval, "playback started");
        thread::spawn(move || run(id, &ids, repeat, interval, &sender, &worker_flag));

        Self { id, password, flag }
    }

    #[inline]
    pub(crate) fn id(&self) -> SessionId {
        self.id
    }

    #[inline]
    pub(crate) fn password(&self) -> &Password {
        &self.password
    }

    /// Raise the stop flag. Does not wait for the worker.
    pub(crate) fn stop(&self) {
        self.flag.raise();
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.flag.raise();
    }
}

fn run(
    session: SessionId,
    ids: &[NodeId],
    repeat: RepeatCount,
    interval: Duration,
    sender: &mpsc::Sender<PlaybackMsg>,
    stop: &StopFlag,
) {
    // An empty password has nothing to animate; play it at most once.
    let mut remaining = match repeat {
        RepeatCount::Infinite if ids.is_empty() => RepeatCount::Times(1),
        other => other,
    };

    'repetitions: loop {
        if stop.is_raised() {
            break;
        }
        match remaining {
            RepeatCount::Times(0) => break,
            RepeatCount::Times(n) => remaining = RepeatCount::Times(n - 1),
            RepeatCount::Infinite => {}
        }

        if sender.send(PlaybackMsg::Restart { session }).is_err() {
            return;
        }
        for &id in ids {
            if stop.is_raised() {
                break 'repetitions;
            }
            if sender.send(PlaybackMsg::Step { session, id }).is_err() {
                return;
            }
            if stop.sleep(interval) {
                break 'repetitions;
            }
        }
    }

    let stopped = stop.is_raised();
    // The receiver may already be gone; nothing left to notify then.
    let _ = sender.send(PlaybackMsg::Finished { session, stopped });
}
