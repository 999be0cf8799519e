use std::slice;

use ai_core::Status;

use crate::bt::{Node, NodeCx, NodeId};

/// Swaps the child's `Success` and `Failure`.
pub struct Inverter {
    child: NodeId,
}

impl Inverter {
    pub fn new(child: NodeId) -> Self {
        Self { child }
    }
}

impl Node for Inverter {
    fn kind(&self) -> &'static str {
        "Inverter"
    }

    fn children(&self) -> &[NodeId] {
        slice::from_ref(&self.child)
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        cx.tick_child(self.child).invert()
    }
}

pub struct ForceSuccess {
    child: NodeId,
}

impl ForceSuccess {
    pub fn new(child: NodeId) -> Self {
        Self { child }
    }
}

impl Node for ForceSuccess {
    fn kind(&self) -> &'static str {
        "ForceSuccess"
    }

    fn children(&self) -> &[NodeId] {
        slice::from_ref(&self.child)
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        match cx.tick_child(self.child) {
            Status::Running => Status::Running,
            _ => Status::Success,
        }
    }
}

pub struct ForceFailure {
    child: NodeId,
}

impl ForceFailure {
    pub fn new(child: NodeId) -> Self {
        Self { child }
    }
}

impl Node for ForceFailure {
    fn kind(&self) -> &'static str {
        "ForceFailure"
    }

    fn children(&self) -> &[NodeId] {
        slice::from_ref(&self.child)
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        match cx.tick_child(self.child) {
            Status::Running => Status::Running,
            _ => Status::Failure,
        }
    }
}

/// Ticks the child and reports `Success` in the same frame, whatever the child returned.
pub struct FireAndForget {
    child: NodeId,
}

impl FireAndForget {
    pub fn new(child: NodeId) -> Self {
        Self { child }
    }
}

impl Node for FireAndForget {
    fn kind(&self) -> &'static str {
        "FireAndForget"
    }

    fn children(&self) -> &[NodeId] {
        slice::from_ref(&self.child)
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        cx.tick_child(self.child);
        Status::Success
    }
}

/// Halts the child and returns `on_expire` once `seconds` have elapsed in the current run.
pub struct Timeout {
    child: NodeId,
    seconds: f32,
    on_expire: Status,
    remaining: f32,
}

impl Timeout {
    pub fn new(child: NodeId, seconds: f32) -> Self {
        Self {
            child,
            seconds,
            on_expire: Status::Failure,
            remaining: seconds,
        }
    }

    pub fn with_expire_status(mut self, status: Status) -> Self {
        assert!(
            status.is_terminal(),
            "Timeout expiry status must be Success or Failure"
        );
        self.on_expire = status;
        self
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

impl Node for Timeout {
    fn kind(&self) -> &'static str {
        "Timeout"
    }

    fn children(&self) -> &[NodeId] {
        slice::from_ref(&self.child)
    }

    fn on_start(&mut self, _cx: &mut NodeCx<'_>) -> Status {
        self.remaining = self.seconds;
        Status::Running
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        self.remaining -= cx.dt();
        if self.remaining <= 0.0 {
            cx.halt_child(self.child);
            return self.on_expire;
        }
        cx.tick_child(self.child)
    }
}

/// Re-runs the child until it reports `target`.
///
/// `max_attempts <= 0` retries forever. When attempts run out the child's last terminal status is
/// returned, so `RetryUntilSuccess` fails and `RetryUntilFailure` succeeds on exhaustion.
pub struct Retry {
    child: NodeId,
    target: Status,
    max_attempts: i32,
    attempts: i32,
}

impl Retry {
    pub fn until_success(child: NodeId, max_attempts: i32) -> Self {
        Self {
            child,
            target: Status::Success,
            max_attempts,
            attempts: 0,
        }
    }

    pub fn until_failure(child: NodeId, max_attempts: i32) -> Self {
        Self {
            child,
            target: Status::Failure,
            max_attempts,
            attempts: 0,
        }
    }

    pub fn attempts(&self) -> i32 {
        self.attempts
    }
}

impl Node for Retry {
    fn kind(&self) -> &'static str {
        match self.target {
            Status::Failure => "RetryUntilFailure",
            _ => "RetryUntilSuccess",
        }
    }

    fn children(&self) -> &[NodeId] {
        slice::from_ref(&self.child)
    }

    fn on_start(&mut self, _cx: &mut NodeCx<'_>) -> Status {
        self.attempts = 0;
        Status::Running
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        let status = cx.tick_child(self.child);
        if status.is_running() || status == self.target {
            return status;
        }

        self.attempts = self.attempts.saturating_add(1);
        if self.max_attempts > 0 && self.attempts >= self.max_attempts {
            return status;
        }
        Status::Running
    }
}

/// Which child completions count towards a [`Repeat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatCondition {
    Always,
    OnSuccess,
    OnFailure,
}

impl RepeatCondition {
    fn matches(self, status: Status) -> bool {
        match self {
            RepeatCondition::Always => true,
            RepeatCondition::OnSuccess => status == Status::Success,
            RepeatCondition::OnFailure => status == Status::Failure,
        }
    }
}

/// Runs the child `count` times (`0` = forever). A completion that does not match `condition`
/// ends the loop early with `Success`.
pub struct Repeat {
    child: NodeId,
    count: u32,
    condition: RepeatCondition,
    done: u32,
}

impl Repeat {
    pub fn new(child: NodeId, count: u32, condition: RepeatCondition) -> Self {
        Self {
            child,
            count,
            condition,
            done: 0,
        }
    }

    pub fn completed(&self) -> u32 {
        self.done
    }
}

impl Node for Repeat {
    fn kind(&self) -> &'static str {
        "Repeat"
    }

    fn children(&self) -> &[NodeId] {
        slice::from_ref(&self.child)
    }

    fn on_start(&mut self, _cx: &mut NodeCx<'_>) -> Status {
        self.done = 0;
        Status::Running
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        let status = cx.tick_child(self.child);
        if status.is_running() {
            return Status::Running;
        }
        if !self.condition.matches(status) {
            return Status::Success;
        }

        self.done = self.done.saturating_add(1);
        if self.count != 0 && self.done >= self.count {
            Status::Success
        } else {
            Status::Running
        }
    }
}

/// Gates the child behind a countdown that restarts every time the child finishes.
///
/// While cooling down the node fails immediately instead of reporting `Running`.
pub struct Cooldown {
    child: NodeId,
    seconds: f32,
    reset_on_halt: bool,
    remaining: f32,
    cooling: bool,
}

impl Cooldown {
    pub fn new(child: NodeId, seconds: f32) -> Self {
        Self {
            child,
            seconds,
            reset_on_halt: false,
            remaining: 0.0,
            cooling: false,
        }
    }

    pub fn with_reset_on_halt(mut self, reset: bool) -> Self {
        self.reset_on_halt = reset;
        self
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

impl Node for Cooldown {
    fn kind(&self) -> &'static str {
        "Cooldown"
    }

    fn children(&self) -> &[NodeId] {
        slice::from_ref(&self.child)
    }

    fn on_start(&mut self, cx: &mut NodeCx<'_>) -> Status {
        self.remaining -= cx.dt();
        if self.remaining > 0.0 {
            self.cooling = true;
            return Status::Failure;
        }
        Status::Running
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        cx.tick_child(self.child)
    }

    fn on_finish(&mut self, _status: Status, _cx: &mut NodeCx<'_>) {
        if self.cooling {
            self.cooling = false;
        } else {
            self.remaining = self.seconds;
        }
    }

    fn on_halt(&mut self, cx: &mut NodeCx<'_>) {
        cx.halt_child(self.child);
        if self.reset_on_halt {
            self.remaining = self.seconds;
        }
    }
}
