//! Cancelable task scheduling with deterministic ordering.
//!
//! Models never schedule themselves. A [`ModelRunner`](crate::engine::runner::ModelRunner)
//! asks an injected [`FrameScheduler`] for either an animation frame or a
//! one-shot timer and keeps the returned [`TaskToken`]. Every lifecycle
//! transition cancels that token, and a fired task whose token is no longer
//! pending is ignored by the runner.
//!
//! [`ManualScheduler`] is the in-process host: a priority queue ordered by
//! due time, with ties broken by insertion order so runs are reproducible.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::engine::SimTime;
use crate::error::{SimError, SimResult};

/// Handle identifying one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskToken(u64);

impl TaskToken {
    /// Raw sequence number behind the token.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// What kind of facility produced a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    /// Next animation frame.
    Frame,
    /// One-shot timer.
    Timer,
}

/// A task waiting in (or popped from) the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// Due time.
    pub time: SimTime,
    /// Token handed out when the task was scheduled.
    pub token: TaskToken,
    /// Facility that produced the task.
    pub kind: TaskKind,
}

// Min-heap ordering by (time, token sequence)
impl PartialEq for ScheduledTask {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.token == other.token
    }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTask {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.time.cmp(&other.time) {
            std::cmp::Ordering::Equal => self.token.cmp(&other.token),
            ord => ord,
        }
    }
}

/// Host scheduling facility injected into a runner.
pub trait FrameScheduler {
    /// Current host time.
    fn now(&self) -> SimTime;

    /// Request the next animation frame.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::CapabilityMissing`] if the host has no
    /// animation-frame facility.
    fn request_frame(&mut self) -> SimResult<TaskToken>;

    /// Schedule a one-shot timer `delay` after now.
    fn schedule_after(&mut self, delay: SimTime) -> TaskToken;

    /// Cancel a pending task. Cancelling an unknown or already-fired token is
    /// a no-op. Returns whether a task was removed.
    fn cancel(&mut self, token: TaskToken) -> bool;

    /// Pop the earliest task due at or before `until`, moving host time to
    /// its due time.
    fn pop_due(&mut self, until: SimTime) -> Option<ScheduledTask>;

    /// Move host time forward to `time` (never backwards).
    fn advance_to(&mut self, time: SimTime);
}

/// Deterministic in-process scheduler with a virtual frame clock.
///
/// Animation frames land on multiples of `frame_interval` (a virtual vsync).
///
/// # Example
///
/// ```rust
/// use edusim::engine::scheduler::{FrameScheduler, ManualScheduler};
/// use edusim::engine::SimTime;
///
/// let mut scheduler = ManualScheduler::new(SimTime::from_millis(16));
/// let token = scheduler.schedule_after(SimTime::from_millis(500));
/// assert!(scheduler.cancel(token));
/// assert!(!scheduler.cancel(token));
/// ```
#[derive(Debug)]
pub struct ManualScheduler {
    now: SimTime,
    frame_interval: SimTime,
    animation_frames: bool,
    queue: BinaryHeap<Reverse<ScheduledTask>>,
    sequence: u64,
}

impl ManualScheduler {
    /// Create a scheduler whose frames arrive every `frame_interval`.
    #[must_use]
    pub fn new(frame_interval: SimTime) -> Self {
        Self {
            now: SimTime::ZERO,
            frame_interval: frame_interval.max(SimTime::from_nanos(1)),
            animation_frames: true,
            queue: BinaryHeap::new(),
            sequence: 0,
        }
    }

    /// Create a scheduler for a host that only offers timers.
    #[must_use]
    pub fn without_animation_frames(frame_interval: SimTime) -> Self {
        Self {
            animation_frames: false,
            ..Self::new(frame_interval)
        }
    }

    /// Frame interval of the virtual display.
    #[must_use]
    pub const fn frame_interval(&self) -> SimTime {
        self.frame_interval
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Due time of the earliest pending task.
    #[must_use]
    pub fn next_due(&self) -> Option<SimTime> {
        self.queue.peek().map(|Reverse(t)| t.time)
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    fn push(&mut self, time: SimTime, kind: TaskKind) -> TaskToken {
        let token = TaskToken(self.sequence);
        self.sequence += 1;
        self.queue.push(Reverse(ScheduledTask { time, token, kind }));
        tracing::trace!(token = token.id(), ?kind, due = %time, "task scheduled");
        token
    }

    fn next_frame_boundary(&self) -> SimTime {
        let interval = self.frame_interval.as_nanos();
        let frames = self.now.as_nanos() / interval + 1;
        SimTime::from_nanos(frames * interval)
    }
}

impl Default for ManualScheduler {
    /// 60 Hz virtual display.
    fn default() -> Self {
        Self::new(SimTime::from_nanos(16_666_667))
    }
}

impl FrameScheduler for ManualScheduler {
    fn now(&self) -> SimTime {
        self.now
    }

    fn request_frame(&mut self) -> SimResult<TaskToken> {
        if !self.animation_frames {
            return Err(SimError::capability_missing("animation-frame"));
        }
        let due = self.next_frame_boundary();
        Ok(self.push(due, TaskKind::Frame))
    }

    fn schedule_after(&mut self, delay: SimTime) -> TaskToken {
        let due = self.now + delay;
        self.push(due, TaskKind::Timer)
    }

    fn cancel(&mut self, token: TaskToken) -> bool {
        let before = self.queue.len();
        self.queue.retain(|Reverse(t)| t.token != token);
        let removed = self.queue.len() != before;
        if removed {
            tracing::trace!(token = token.id(), "task cancelled");
        }
        removed
    }

    fn pop_due(&mut self, until: SimTime) -> Option<ScheduledTask> {
        if let Some(Reverse(task)) = self.queue.peek() {
            if task.time <= until {
                let task = self.queue.pop().map(|Reverse(t)| t)?;
                self.now = self.now.max(task.time);
                return Some(task);
            }
        }
        None
    }

    fn advance_to(&mut self, time: SimTime) {
        self.now = self.now.max(time);
    }
}
