//! The multi-frame execution contract shared by behavior tree nodes and GOAP actions.
//!
//! A ticked unit goes through `Idle -> Running -> Idle`. The first tick of a fresh run calls
//! `on_start`; if that reports `Running`, the same tick continues into `on_tick`. Every tick that
//! produces a terminal status returns the unit to `Idle` and calls `on_finish`. `halt` is only
//! effective while `Running`.

use crate::Status;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    #[default]
    Idle,
    Running,
    /// Held only while `halt` runs `on_halt`; `halt` always returns with the unit `Idle`.
    Halted,
}

/// Per-unit callbacks driven by [`Lifecycle`].
///
/// `S` is whatever scope the owning subsystem threads through a tick (a node context, an action
/// context, a plain data context in tests).
pub trait Hooks<S: ?Sized> {
    fn on_start(&mut self, _scope: &mut S) -> Status {
        Status::Running
    }

    fn on_tick(&mut self, scope: &mut S) -> Status;

    fn on_finish(&mut self, _status: Status, _scope: &mut S) {}

    fn on_halt(&mut self, _scope: &mut S) {}
}

/// Lifecycle bookkeeping for one ticked unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lifecycle {
    state: LifecycleState,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LifecycleState::Running
    }

    pub fn tick<H, S>(&mut self, hooks: &mut H, scope: &mut S) -> Status
    where
        H: Hooks<S> + ?Sized,
        S: ?Sized,
    {
        // `Halted` never survives a `halt` call, so anything but `Running` is a fresh run.
        if self.state != LifecycleState::Running {
            self.state = LifecycleState::Running;
            let status = hooks.on_start(scope);
            if status.is_terminal() {
                self.state = LifecycleState::Idle;
                hooks.on_finish(status, scope);
                return status;
            }
        }

        let status = hooks.on_tick(scope);
        if status.is_terminal() {
            self.state = LifecycleState::Idle;
            hooks.on_finish(status, scope);
        }
        status
    }

    pub fn halt<H, S>(&mut self, hooks: &mut H, scope: &mut S)
    where
        H: Hooks<S> + ?Sized,
        S: ?Sized,
    {
        if self.state != LifecycleState::Running {
            return;
        }
        self.state = LifecycleState::Halted;
        hooks.on_halt(scope);
        self.state = LifecycleState::Idle;
    }
}
