#![forbid(unsafe_code)]

//! The gesture lock controller.
//!
//! [`PatternLock`] turns raw pointer events into a password. It owns the node
//! grid, the current path, the finish timer and at most one playback session.
//! Everything happens on the caller's thread: the host feeds pointer events
//! and calls [`PatternLock::poll`] from its frame loop, then paints
//! [`PatternLock::frame`].
//!
//! # State Machine
//!
//! ```text
//! Idle ──press on node──▶ Tracking ──release──▶ Finishing ──deadline──▶ Idle
//!   ▲                        │                      │
//!   └──release, empty path───┘                      └──press (interruptable)──▶ Idle/Tracking
//! ```
//!
//! # Invariants
//!
//! 1. A node appears in the path at most once per gesture.
//! 2. Path nodes are `Highlighted` while tracking; after release they are
//!    `Correct`, `Error` or left as they were, depending on the finish result.
//! 3. The finish callback runs at most once per gesture, and only for a
//!    non-empty path.
//! 4. Only the active playback session may change the grid; its end is
//!    reported exactly once to its listener.
//! 5. Time only comes from the `now` arguments; the lock never reads a clock.
//!
//! # Failure Modes
//!
//! - Pointer events while touch is disabled are dropped.
//! - Haptic errors are logged at debug level and otherwise ignored.
//! - A password that does not fit the grid is rejected before any state
//!   changes.

use std::fmt;
use std::sync::mpsc;

use patternlock_core::autolink::intermediate_nodes;
use patternlock_core::measure::{self, Constraint, Measurement};
use patternlock_core::{
    LockConfig, NodeGrid, NodeId, NodeState, Password, Point, PointerAction, PointerEvent,
};
use patternlock_core::config::check_grid_size;
use web_time::Instant;

use crate::error::Result;
use crate::frame::{Frame, LineTone, NodeVisual, Segment};
use crate::haptics::{Haptics, NoHaptics};
use crate::playback::{
    FinishListener, PlaybackEnd, PlaybackMsg, PlaybackOptions, PlaybackSession, SessionId,
};

/// Verdict returned by the finish callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinishResult {
    Correct,
    Error,
    /// Leave the path as drawn.
    None,
}

/// Where the gesture currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchState {
    /// No gesture in progress.
    Idle,
    /// The pointer is down and at least one node is lit.
    Tracking,
    /// Released; waiting for the auto-reset deadline.
    Finishing,
}

/// How a node joined the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LitBy {
    /// Directly under the pointer.
    Touch,
    /// Crossed between two touched nodes.
    AutoLink,
    /// Shown or replayed by the lock itself.
    Display,
}

type FinishCallback = Box<dyn FnMut(&Password) -> FinishResult>;
type NodeCallback = Box<dyn FnMut(NodeId)>;

/// Interactive N×N gesture lock.
pub struct PatternLock {
    config: LockConfig,
    grid: NodeGrid,
    measured: Option<Measurement>,
    path: Vec<NodeId>,
    current: Option<NodeId>,
    pointer: Point,
    touch_enabled: bool,
    finish_deadline: Option<Instant>,
    tone: LineTone,
    on_finish: Option<FinishCallback>,
    on_node_touched: Option<NodeCallback>,
    haptics: Box<dyn Haptics>,
    playback: Option<PlaybackSession>,
    playback_listeners: Vec<(SessionId, FinishListener)>,
    next_session: SessionId,
    sender: mpsc::Sender<PlaybackMsg>,
    receiver: mpsc::Receiver<PlaybackMsg>,
}

impl fmt::Debug for PatternLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternLock")
            .field("config", &self.config)
            .field("path", &self.path)
            .field("current", &self.current)
            .field("touch_enabled", &self.touch_enabled)
            .field("finish_deadline", &self.finish_deadline)
            .field("tone", &self.tone)
            .field("playing", &self.is_playing())
            .finish_non_exhaustive()
    }
}

impl PatternLock {
    /// Build a lock from a validated config.
    pub fn new(config: LockConfig) -> Result<Self> {
        config.validate()?;
        let (sender, receiver) = mpsc::channel();
        Ok(Self {
            grid: NodeGrid::new(config.grid_size),
            config,
            measured: None,
            path: Vec::new(),
            current: None,
            pointer: Point::default(),
            touch_enabled: true,
            finish_deadline: None,
            tone: LineTone::Default,
            on_finish: None,
            on_node_touched: None,
            haptics: Box::new(NoHaptics),
            playback: None,
            playback_listeners: Vec::new(),
            next_session: 0,
            sender,
            receiver,
        })
    }

    // --- Accessors ---

    #[inline]
    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    #[inline]
    pub fn grid(&self) -> &NodeGrid {
        &self.grid
    }

    /// Node ids of the current (or last) gesture, in order.
    #[inline]
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    #[inline]
    pub fn current_node(&self) -> Option<NodeId> {
        self.current
    }

    pub fn state(&self) -> TouchState {
        if self.current.is_some() {
            TouchState::Tracking
        } else if self.finish_deadline.is_some() {
            TouchState::Finishing
        } else {
            TouchState::Idle
        }
    }

    /// When the pending auto-reset is due, so the host can schedule a wakeup.
    #[inline]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.finish_deadline
    }

    #[inline]
    pub fn is_touch_enabled(&self) -> bool {
        self.touch_enabled
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playback.is_some()
    }

    // --- Settings ---

    pub fn set_touch_enabled(&mut self, enabled: bool) {
        self.touch_enabled = enabled;
    }

    /// Negative values are treated as zero.
    pub fn set_finish_timeout_ms(&mut self, ms: i64) {
        self.config.finish_timeout_ms = u64::try_from(ms).unwrap_or(0);
    }

    pub fn set_finish_interruptable(&mut self, interruptable: bool) {
        self.config.finish_interruptable = interruptable;
    }

    pub fn set_auto_link(&mut self, auto_link: bool) {
        self.config.auto_link = auto_link;
    }

    pub fn set_pattern_visible(&mut self, visible: bool) {
        self.config.pattern_visible = visible;
    }

    /// Rebuild the grid at a new size.
    ///
    /// Stops playback and clears the path. The old measurement no longer
    /// applies, so the host must measure and lay out again.
    pub fn set_grid_size(&mut self, size: usize) -> Result<()> {
        check_grid_size(size)?;
        self.stop_playback();
        self.config.grid_size = size;
        self.grid = NodeGrid::new(size);
        self.measured = None;
        self.reset();
        tracing::debug!(size, "grid rebuilt");
        Ok(())
    }

    /// Called with the finished password when a gesture is released.
    pub fn set_on_finish(&mut self, callback: impl FnMut(&Password) -> FinishResult + 'static) {
        self.on_finish = Some(Box::new(callback));
    }

    /// Called for every node a gesture adds, auto-linked nodes included.
    pub fn set_on_node_touched(&mut self, callback: impl FnMut(NodeId) + 'static) {
        self.on_node_touched = Some(Box::new(callback));
    }

    pub fn set_haptics(&mut self, haptics: impl Haptics + 'static) {
        self.haptics = Box::new(haptics);
    }

    // --- Geometry ---

    /// Resolve the lock's size and node size for the offered space.
    pub fn measure(&mut self, width: Constraint, height: Constraint) -> Measurement {
        let measured = measure::measure(width, height, &self.config.layout_params());
        self.measured = Some(measured);
        measured
    }

    /// Place every node using the last measurement. Does nothing before the
    /// first [`measure`](Self::measure).
    pub fn layout(&mut self) {
        if let Some(measured) = &self.measured {
            let rects = measure::layout(measured, &self.config.layout_params());
            self.grid.apply_layout(&rects);
        }
    }

    /// Measure with exact bounds and lay out in one step.
    pub fn resize(&mut self, width: u32, height: u32) -> Measurement {
        let measured = self.measure(Constraint::Exactly(width), Constraint::Exactly(height));
        self.layout();
        measured
    }

    // --- Touch ---

    /// Feed one pointer event. Returns `true` when the lock should be redrawn.
    pub fn handle_pointer(&mut self, event: PointerEvent, now: Instant) -> bool {
        if !self.touch_enabled {
            return false;
        }
        match event.action {
            PointerAction::Down => {
                let interrupted = self.config.finish_interruptable
                    && (self.finish_deadline.is_some() || !self.path.is_empty());
                if interrupted {
                    self.reset();
                }
                self.track(event.x, event.y) || interrupted
            }
            PointerAction::Move => self.track(event.x, event.y),
            PointerAction::Up => self.release(now),
        }
    }

    fn track(&mut self, x: f32, y: f32) -> bool {
        self.pointer = Point::new(x, y);
        let hit = self.grid.hit_test(x, y, self.config.touch_expand);

        match (self.current, hit) {
            (None, Some(id)) if !self.path.contains(&id) => {
                self.light(id, LitBy::Touch);
                self.current = Some(id);
                true
            }
            (Some(current), Some(id)) if !self.path.contains(&id) => {
                if self.config.auto_link {
                    self.link_between(current, id);
                }
                self.light(id, LitBy::Touch);
                self.current = Some(id);
                true
            }
            // The live segment follows the pointer.
            (Some(_), _) => true,
            (None, _) => false,
        }
    }

    fn link_between(&mut self, from: NodeId, to: NodeId) {
        let (Some(a), Some(b)) = (self.grid.get(from), self.grid.get(to)) else {
            return;
        };
        for pos in intermediate_nodes(a.pos(), b.pos()) {
            if let Some(mid) = self.grid.id_at(pos)
                && !self.path.contains(&mid)
            {
                self.light(mid, LitBy::AutoLink);
            }
        }
    }

    fn release(&mut self, now: Instant) -> bool {
        self.current = None;
        if self.path.is_empty() {
            return false;
        }
        if !self.config.finish_interruptable {
            self.touch_enabled = false;
        }

        let password = Password::new(self.path.iter().copied());
        let result = match self.on_finish.as_mut() {
            Some(callback) => callback(&password),
            None => FinishResult::None,
        };
        tracing::debug!(password = %password, ?result, "gesture finished");
        self.apply_result(result);

        self.finish_deadline = Some(now + self.config.finish_timeout());
        true
    }

    fn apply_result(&mut self, result: FinishResult) {
        let (state, tone) = match result {
            FinishResult::Correct => (NodeState::Correct, LineTone::Correct),
            FinishResult::Error => (NodeState::Error, LineTone::Error),
            FinishResult::None => return,
        };
        for &id in &self.path {
            if let Some(node) = self.grid.get_mut(id) {
                node.set_state(state);
            }
        }
        self.tone = tone;
    }

    fn light(&mut self, id: NodeId, by: LitBy) {
        let Some(node) = self.grid.get_mut(id) else {
            return;
        };
        node.set_state(NodeState::Highlighted);
        if by != LitBy::Display {
            node.animation = self.config.node_animation;
        }
        self.path.push(id);

        if by == LitBy::Display {
            return;
        }
        tracing::debug!(id, auto_linked = by == LitBy::AutoLink, "node added to path");
        if let Some(callback) = self.on_node_touched.as_mut() {
            callback(id);
        }
        if by == LitBy::Touch
            && self.config.vibrate
            && let Err(err) = self.haptics.vibrate(self.config.vibrate_duration())
        {
            tracing::debug!(error = %err, "haptic pulse failed");
        }
    }

    // --- Timers & playback ---

    /// Fire a due auto-reset and apply pending playback messages.
    ///
    /// Returns `true` when the lock should be redrawn.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut redraw = self.drain_playback();
        if let Some(deadline) = self.finish_deadline
            && now >= deadline
        {
            self.reset();
            tracing::debug!("auto-reset fired");
            redraw = true;
        }
        redraw
    }

    /// Clear the path and every node's appearance. Idempotent.
    ///
    /// A pending auto-reset is consumed, re-enabling touch if the release
    /// had disabled it.
    pub fn reset(&mut self) {
        if self.finish_deadline.take().is_some() {
            self.touch_enabled = true;
        }
        self.path.clear();
        self.current = None;
        self.grid.reset_states();
        self.tone = LineTone::Default;
    }

    /// Display a password statically, without callbacks or haptics.
    pub fn show_password(&mut self, password: &Password) -> Result<()> {
        password.ensure_fits(self.grid.len())?;
        self.stop_playback();
        self.display(password);
        Ok(())
    }

    fn display(&mut self, password: &Password) {
        self.reset();
        for &id in password.ids() {
            self.light(id, LitBy::Display);
        }
    }

    /// Replay a password forever at the configured interval.
    pub fn play_password(&mut self, password: &Password) -> Result<()> {
        let options = PlaybackOptions::new(self.config.replay_interval());
        self.play_password_with(password, options)
    }

    /// Replay a password on a worker thread.
    ///
    /// Any running session is stopped first and reports
    /// [`PlaybackEnd::Stopped`]. Touch input stays disabled until the
    /// session ends.
    pub fn play_password_with(
        &mut self,
        password: &Password,
        options: PlaybackOptions,
    ) -> Result<()> {
        password.ensure_fits(self.grid.len())?;
        self.stop_playback();
        self.reset();
        self.touch_enabled = false;

        let session = self.next_session;
        self.next_session += 1;
        if let Some(listener) = options.on_finish {
            self.playback_listeners.push((session, listener));
        }
        self.playback = Some(PlaybackSession::spawn(
            session,
            password.clone(),
            options.repeat,
            options.interval,
            self.sender.clone(),
        ));
        Ok(())
    }

    /// Stop the running session, if any, and clear the grid now.
    ///
    /// The session's listener runs from a later [`poll`](Self::poll).
    pub fn stop_playback(&mut self) {
        if let Some(session) = self.playback.take() {
            session.stop();
            self.reset();
            tracing::debug!(session = session.id(), "playback stopped");
        }
    }

    fn drain_playback(&mut self) -> bool {
        let mut redraw = false;
        while let Ok(msg) = self.receiver.try_recv() {
            redraw |= self.apply_playback(msg);
        }
        redraw
    }

    fn apply_playback(&mut self, msg: PlaybackMsg) -> bool {
        let active = self.playback.as_ref().map(PlaybackSession::id);
        match msg {
            PlaybackMsg::Restart { session } if active == Some(session) => {
                self.reset();
                true
            }
            PlaybackMsg::Step { session, id } if active == Some(session) => {
                self.light(id, LitBy::Display);
                true
            }
            PlaybackMsg::Finished { session, stopped } => {
                self.finish_playback(session, stopped, active == Some(session));
                true
            }
            other => {
                tracing::trace!(?other, "dropping stale playback message");
                false
            }
        }
    }

    fn finish_playback(&mut self, session: SessionId, stopped: bool, active: bool) {
        let end = if stopped || !active {
            PlaybackEnd::Stopped
        } else {
            PlaybackEnd::Completed
        };

        if active && let Some(finished) = self.playback.take() {
            match end {
                PlaybackEnd::Completed => self.display(finished.password()),
                PlaybackEnd::Stopped => self.reset(),
            }
        }
        if self.playback.is_none() {
            self.touch_enabled = true;
        }
        tracing::debug!(session, ?end, "playback finished");

        if let Some(pos) = self
            .playback_listeners
            .iter()
            .position(|(id, _)| *id == session)
        {
            let (_, listener) = self.playback_listeners.swap_remove(pos);
            listener(end);
        }
    }

    // --- Drawing ---

    /// Snapshot of everything the renderer needs for one frame.
    pub fn frame(&self) -> Frame {
        let nodes = self
            .grid
            .iter()
            .map(|node| NodeVisual {
                id: node.id(),
                rect: node.rect,
                state: node.state,
                animation: node.animation,
            })
            .collect();

        let mut segments = Vec::new();
        if self.config.pattern_visible {
            let center = |id: NodeId| self.grid.get(id).map(|n| n.rect.center());
            for pair in self.path.windows(2) {
                if let (Some(from), Some(to)) = (center(pair[0]), center(pair[1])) {
                    segments.push(Segment { from, to });
                }
            }
            if let Some(from) = self.current.and_then(center) {
                segments.push(Segment {
                    from,
                    to: self.pointer,
                });
            }
        }

        Frame {
            nodes,
            segments,
            tone: self.tone,
        }
    }
}
