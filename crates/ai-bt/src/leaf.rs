use ai_core::{Blackboard, Status, TickContext, Value};

use crate::bt::{Node, NodeCx};
use crate::tree::BehaviorTree;

type TickFn = Box<dyn FnMut(&TickContext, &mut Blackboard) -> Status>;

/// Leaf driven by a closure; may report `Running` across frames.
pub struct Action {
    tick: TickFn,
    start: Option<TickFn>,
    halt: Option<Box<dyn FnMut(&mut Blackboard)>>,
}

impl Action {
    pub fn new(tick: impl FnMut(&TickContext, &mut Blackboard) -> Status + 'static) -> Self {
        Self {
            tick: Box::new(tick),
            start: None,
            halt: None,
        }
    }

    /// Runs once per fresh run; a terminal result finishes the action without ticking it.
    pub fn with_start(
        mut self,
        start: impl FnMut(&TickContext, &mut Blackboard) -> Status + 'static,
    ) -> Self {
        self.start = Some(Box::new(start));
        self
    }

    pub fn with_halt(mut self, halt: impl FnMut(&mut Blackboard) + 'static) -> Self {
        self.halt = Some(Box::new(halt));
        self
    }
}

impl Node for Action {
    fn kind(&self) -> &'static str {
        "Action"
    }

    fn on_start(&mut self, cx: &mut NodeCx<'_>) -> Status {
        match self.start.as_mut() {
            Some(start) => start(cx.tick, cx.blackboard),
            None => Status::Running,
        }
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        (self.tick)(cx.tick, cx.blackboard)
    }

    fn on_halt(&mut self, cx: &mut NodeCx<'_>) {
        if let Some(halt) = self.halt.as_mut() {
            halt(cx.blackboard);
        }
    }
}

pub struct Condition {
    check: Box<dyn FnMut(&Blackboard) -> bool>,
}

impl Condition {
    pub fn new(check: impl FnMut(&Blackboard) -> bool + 'static) -> Self {
        Self {
            check: Box::new(check),
        }
    }
}

impl Node for Condition {
    fn kind(&self) -> &'static str {
        "Condition"
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        Status::from((self.check)(cx.blackboard))
    }
}

/// Runs a side effect and succeeds.
pub struct Callback {
    run: Box<dyn FnMut(&mut Blackboard)>,
}

impl Callback {
    pub fn new(run: impl FnMut(&mut Blackboard) + 'static) -> Self {
        Self { run: Box::new(run) }
    }
}

impl Node for Callback {
    fn kind(&self) -> &'static str {
        "Callback"
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        (self.run)(cx.blackboard);
        Status::Success
    }
}

/// `Running` until `seconds` of tick time have elapsed in the current run.
pub struct Wait {
    seconds: f32,
    remaining: f32,
}

impl Wait {
    pub fn new(seconds: f32) -> Self {
        Self {
            seconds,
            remaining: seconds,
        }
    }
}

impl Node for Wait {
    fn kind(&self) -> &'static str {
        "Wait"
    }

    fn on_start(&mut self, _cx: &mut NodeCx<'_>) -> Status {
        self.remaining = self.seconds;
        Status::Running
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        self.remaining -= cx.dt();
        if self.remaining <= 0.0 {
            Status::Success
        } else {
            Status::Running
        }
    }
}

/// Counts down the number stored under `key` in the blackboard.
///
/// Fails when the key is absent; panics when the stored value is not a number. An `Int` countdown
/// stays an `Int` while the elapsed time keeps it whole; otherwise it is rewritten as a `Float`.
pub struct Timer {
    key: String,
}

impl Timer {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Node for Timer {
    fn kind(&self) -> &'static str {
        "Timer"
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        let Some(value) = cx.blackboard.get(&self.key) else {
            return Status::Failure;
        };
        let Some(left) = value.as_number() else {
            panic!(
                "timer `{}` expects a number, found {}",
                self.key,
                value.kind()
            );
        };

        let left = left - f64::from(cx.dt());
        let next = match value {
            Value::Int(_) if left.fract() == 0.0 => Value::Int(left as i64),
            _ => Value::Float(left),
        };
        cx.blackboard.set(self.key.as_str(), next);
        if left <= 0.0 {
            Status::Success
        } else {
            Status::Running
        }
    }
}

/// Embeds a whole tree as a leaf. The embedded tree keeps its own active set.
pub struct SubTree {
    tree: BehaviorTree,
}

impl SubTree {
    pub fn new(tree: BehaviorTree) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &BehaviorTree {
        &self.tree
    }
}

impl Node for SubTree {
    fn kind(&self) -> &'static str {
        "SubTree"
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        self.tree.tick(cx.tick, cx.blackboard)
    }

    fn on_halt(&mut self, cx: &mut NodeCx<'_>) {
        self.tree.halt(cx.blackboard);
    }
}
