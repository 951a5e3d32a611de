//! Model lifecycle owner.
//!
//! A [`ModelRunner`] pairs one model with a clock, an injected scheduler and
//! an injected renderer. It holds at most one pending scheduler token at a
//! time; every lifecycle transition cancels it before doing anything else, so
//! a paused or unmounted model is never stepped by a stray callback.
//!
//! ```text
//! Idle --mount--> Running <--pause/resume--> Paused
//!                    |                          |
//!                    +--------unmount-----------+--> Idle
//! Running --reset (delayed)--> Restarting --timer--> Running
//! ```

use serde::{Deserialize, Serialize};

use super::clock::SimulationClock;
use super::scheduler::{FrameScheduler, ScheduledTask, TaskToken};
use super::SimTime;
use crate::error::{SimError, SimResult};
use crate::scenarios::{Cadence, Simulation};
use crate::visualization::Renderer;

/// Observable runner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunnerPhase {
    /// Not mounted.
    Idle,
    /// Stepping on its cadence.
    Running,
    /// Mounted but not stepping.
    Paused,
    /// Cleared, waiting for the restart timer.
    Restarting,
}

/// What the pending token is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Purpose {
    Frame,
    Interval,
    Restart,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    token: TaskToken,
    purpose: Purpose,
}

/// Drives one model on a host scheduler.
#[derive(Debug)]
pub struct ModelRunner<M, S, R> {
    model: M,
    clock: SimulationClock,
    scheduler: S,
    renderer: R,
    pending: Option<Pending>,
    mounted: bool,
    capability_reported: bool,
    restart_delay: Option<SimTime>,
    anomaly: Option<SimError>,
}

impl<M, S, R> ModelRunner<M, S, R>
where
    M: Simulation,
    S: FrameScheduler,
    R: Renderer<M::Frame>,
{
    /// Create an unmounted runner. Resets are synchronous.
    pub fn new(model: M, scheduler: S, renderer: R) -> Self {
        Self {
            model,
            clock: SimulationClock::new(false),
            scheduler,
            renderer,
            pending: None,
            mounted: false,
            capability_reported: false,
            restart_delay: None,
            anomaly: None,
        }
    }

    /// Use the two-phase reset: clear now, reinitialize after `delay`.
    /// `None` keeps resets synchronous.
    #[must_use]
    pub fn with_restart_delay(mut self, delay: Option<SimTime>) -> Self {
        self.restart_delay = delay;
        self
    }

    /// Start the runner: the clock starts and the first step is scheduled.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::CapabilityMissing`] the first time a frame-driven
    /// model finds no animation-frame facility. The runner stays mounted and
    /// can still be driven with [`Self::step`].
    pub fn mount(&mut self) -> SimResult<()> {
        if self.mounted {
            return Ok(());
        }
        self.mounted = true;
        self.anomaly = None;
        self.clock.reset();
        self.clock.start();
        tracing::debug!(model = self.model.name(), "mounted");
        self.present();
        self.arm()
    }

    /// Stop stepping. Model state is kept.
    pub fn pause(&mut self) {
        if !self.mounted {
            return;
        }
        self.finish_restart();
        self.disarm();
        self.clock.pause();
        tracing::debug!(model = self.model.name(), "paused");
    }

    /// Resume stepping. The first step after a resume has a zero delta.
    ///
    /// # Errors
    ///
    /// See [`Self::mount`].
    pub fn resume(&mut self) -> SimResult<()> {
        if !self.mounted || self.is_restarting() {
            return Ok(());
        }
        if self.clock.is_running() && self.pending.is_some() {
            return Ok(());
        }
        self.anomaly = None;
        self.clock.start();
        tracing::debug!(model = self.model.name(), "resumed");
        self.arm()
    }

    /// Flip between running and paused. Returns whether the runner is now
    /// running.
    ///
    /// A pending delayed restart counts as running: toggling completes the
    /// reset and leaves the runner paused.
    ///
    /// # Errors
    ///
    /// See [`Self::mount`].
    pub fn toggle_running(&mut self) -> SimResult<bool> {
        if self.clock.is_running() || self.is_restarting() {
            self.pause();
        } else {
            self.resume()?;
        }
        Ok(self.is_running())
    }

    /// Stop and release the scheduler slot. The runner can be mounted again.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.finish_restart();
        self.disarm();
        self.clock.pause();
        self.mounted = false;
        tracing::debug!(model = self.model.name(), "unmounted");
    }

    /// Set a model parameter and redraw.
    ///
    /// # Errors
    ///
    /// Propagates the model's rejection of unknown names or non-finite values.
    pub fn set_parameter(&mut self, name: &str, value: f64) -> SimResult<f64> {
        let stored = self.model.set_parameter(name, value)?;
        tracing::debug!(model = self.model.name(), name, value = stored, "parameter set");
        self.present();
        Ok(stored)
    }

    /// Restore the model's initial state.
    ///
    /// With a restart delay configured and the runner mounted, the model is
    /// cleared and stopped now and reinitialized when the delay elapses.
    /// Otherwise the reset happens in place and the run state is unchanged.
    pub fn reset(&mut self) {
        match self.restart_delay {
            Some(delay) if self.mounted => {
                self.disarm();
                self.clock.pause();
                self.model.clear();
                self.present();
                let token = self.scheduler.schedule_after(delay);
                self.pending = Some(Pending {
                    token,
                    purpose: Purpose::Restart,
                });
                tracing::debug!(model = self.model.name(), delay = %delay, "restart scheduled");
            }
            _ => {
                self.model.reset();
                self.anomaly = None;
                self.present();
                tracing::debug!(model = self.model.name(), "reset");
            }
        }
    }

    /// Handle a task popped from the scheduler.
    ///
    /// Returns `false` for tasks this runner no longer owns.
    ///
    /// # Errors
    ///
    /// Only a restart can fail, when re-arming hits a missing capability for
    /// the first time.
    pub fn dispatch(&mut self, task: &ScheduledTask) -> SimResult<bool> {
        let pending = match self.pending {
            Some(p) if p.token == task.token => p,
            _ => {
                tracing::trace!(token = task.token.id(), "stale task ignored");
                return Ok(false);
            }
        };
        self.pending = None;

        match pending.purpose {
            Purpose::Frame => {
                let dt = self.clock.tick(task.time);
                self.advance(dt);
                self.rearm()?;
            }
            Purpose::Interval => {
                self.clock.tick(task.time);
                let dt = match self.model.cadence() {
                    Cadence::FixedInterval(interval) => interval.as_secs_f64(),
                    Cadence::AnimationFrame => 0.0,
                };
                self.advance(dt);
                self.rearm()?;
            }
            Purpose::Restart => {
                self.model.reset();
                self.anomaly = None;
                self.clock.start();
                self.present();
                tracing::debug!(model = self.model.name(), "restarted");
                self.arm()?;
            }
        }
        Ok(true)
    }

    /// Dispatch every task due up to `until`, then move host time there.
    /// Returns the number of tasks handled.
    ///
    /// # Errors
    ///
    /// See [`Self::dispatch`].
    pub fn run_until(&mut self, until: SimTime) -> SimResult<usize> {
        let mut handled = 0;
        while let Some(task) = self.scheduler.pop_due(until) {
            if self.dispatch(&task)? {
                handled += 1;
            }
        }
        self.scheduler.advance_to(until);
        Ok(handled)
    }

    /// Step by `dt` seconds without the scheduler. Does nothing while
    /// paused except redraw.
    pub fn step(&mut self, dt: f64) {
        self.advance(dt);
    }

    /// Current frame.
    pub fn snapshot(&self) -> M::Frame {
        self.model.frame()
    }

    /// Observable state.
    pub fn phase(&self) -> RunnerPhase {
        if !self.mounted {
            RunnerPhase::Idle
        } else if self.is_restarting() {
            RunnerPhase::Restarting
        } else if self.clock.is_running() {
            RunnerPhase::Running
        } else {
            RunnerPhase::Paused
        }
    }

    /// Whether the model is being stepped.
    pub const fn is_running(&self) -> bool {
        self.mounted && self.clock.is_running()
    }

    /// Whether the runner is mounted.
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Token of the task this runner is waiting on.
    pub fn pending_token(&self) -> Option<TaskToken> {
        self.pending.map(|p| p.token)
    }

    /// Last stop-on-anomaly error, cleared on resume or reset.
    pub const fn anomaly(&self) -> Option<&SimError> {
        self.anomaly.as_ref()
    }

    /// The driven model.
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// The clock.
    pub const fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// The scheduler.
    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Mutable scheduler access for hosts that share it.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// The renderer.
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable renderer access.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    fn is_restarting(&self) -> bool {
        matches!(
            self.pending,
            Some(Pending {
                purpose: Purpose::Restart,
                ..
            })
        )
    }

    /// Step if running, stop on divergence, then draw.
    fn advance(&mut self, dt: f64) {
        if self.clock.is_running() {
            self.model.advance(dt);
            if !self.model.is_finite() {
                self.stop_on_anomaly();
            }
        }
        self.present();
    }

    fn stop_on_anomaly(&mut self) {
        let name = self.model.name();
        tracing::warn!(model = name, "non-finite state, pausing");
        self.disarm();
        self.clock.pause();
        self.anomaly = Some(SimError::NonFiniteState {
            model: name.to_string(),
        });
    }

    fn present(&mut self) {
        if self.renderer.is_available() {
            self.renderer.draw(&self.model.frame());
        } else {
            tracing::trace!(model = self.model.name(), "no render surface, frame skipped");
        }
    }

    fn rearm(&mut self) -> SimResult<()> {
        if self.mounted && self.clock.is_running() {
            self.arm()
        } else {
            Ok(())
        }
    }

    fn arm(&mut self) -> SimResult<()> {
        self.disarm();
        match self.model.cadence() {
            Cadence::AnimationFrame => {
                if self.capability_reported {
                    return Ok(());
                }
                match self.scheduler.request_frame() {
                    Ok(token) => {
                        self.pending = Some(Pending {
                            token,
                            purpose: Purpose::Frame,
                        });
                        Ok(())
                    }
                    Err(err) => {
                        self.capability_reported = true;
                        tracing::warn!(model = self.model.name(), error = %err, "cannot schedule frames");
                        Err(err)
                    }
                }
            }
            Cadence::FixedInterval(interval) => {
                let token = self.scheduler.schedule_after(interval);
                self.pending = Some(Pending {
                    token,
                    purpose: Purpose::Interval,
                });
                Ok(())
            }
        }
    }

    fn disarm(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.scheduler.cancel(pending.token);
        }
    }

    /// Complete an in-flight delayed restart immediately.
    fn finish_restart(&mut self) {
        if self.is_restarting() {
            self.disarm();
            self.model.reset();
            self.present();
        }
    }
}
